//! 规则意图识别（不调用 LLM）
//!
//! 关键词决定能力：天气类词 -> weather，住宿类词 -> hotel；
//! 行程类词（trip / travel / plan ...）或只给出目的地时选中全部能力。
//! 地点取介词（in / to / for ...）后面首字母大写的词串，可用 "," / "and" 连接多个地点。
//! 多个能力各自带地点时（"weather in Paris and hotels in London"），地点只归属前面最近的能力词。

use std::collections::BTreeSet;
use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;

use crate::capability::{Capability, CapabilityCall};
use crate::core::ResolveError;
use crate::resolver::{IntentResolver, Resolution};

const WEATHER_KEYWORDS: &[&str] = &[
    "weather",
    "forecast",
    "temperature",
    "rain",
    "sunny",
    "climate",
];

const HOTEL_KEYWORDS: &[&str] = &[
    "hotel",
    "hotels",
    "stay",
    "staying",
    "accommodation",
    "accommodations",
    "lodging",
    "room",
    "rooms",
    "hostel",
    "motel",
];

const COMPOSITE_KEYWORDS: &[&str] = &[
    "trip",
    "travel",
    "travelling",
    "traveling",
    "plan",
    "visit",
    "visiting",
    "vacation",
    "holiday",
    "journey",
    "getaway",
];

/// 不是地点的大写词（星期、月份、时间词、代词）
const NOT_A_PLACE: &[&str] = &[
    "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday",
    "january", "february", "march", "april", "may", "june", "july", "august",
    "september", "october", "november", "december", "today", "tomorrow", "tonight",
    "next", "this", "week", "weekend", "i", "me", "us", "hello", "hi", "hey", "thanks",
    "please", "help", "yes", "no", "ok",
];

const PLACE: &str = r"\p{Lu}[\p{L}'\-]*(?:[ \t]+\p{Lu}[\p{L}'\-]*)*";

static PREPOSITION_PLACE_RE: OnceLock<Regex> = OnceLock::new();
static CONTINUATION_RE: OnceLock<Regex> = OnceLock::new();
static LEADING_PLACE_RE: OnceLock<Regex> = OnceLock::new();
static BARE_PLACE_RE: OnceLock<Regex> = OnceLock::new();
static WORD_RE: OnceLock<Regex> = OnceLock::new();

fn preposition_place_re() -> &'static Regex {
    PREPOSITION_PLACE_RE.get_or_init(|| {
        Regex::new(&format!(
            r"(?i:\b(?:in|to|for|at|near|around|visit|visiting|from)\s+)({PLACE})"
        ))
        .expect("valid location regex")
    })
}

fn continuation_re() -> &'static Regex {
    CONTINUATION_RE.get_or_init(|| {
        Regex::new(&format!(
            r"^(?:\s*,\s*(?i:and\s+)?|\s+(?i:and)\s+|\s*&\s*)({PLACE})"
        ))
        .expect("valid continuation regex")
    })
}

fn leading_place_re() -> &'static Regex {
    LEADING_PLACE_RE.get_or_init(|| {
        Regex::new(&format!(
            r"^\s*({PLACE})\s+(?i:weather|forecast|hotels?|trip|travel)\b"
        ))
        .expect("valid leading place regex")
    })
}

fn bare_place_re() -> &'static Regex {
    BARE_PLACE_RE.get_or_init(|| {
        Regex::new(&format!(r"^\s*({PLACE})\s*[.!?]?\s*$")).expect("valid bare place regex")
    })
}

fn word_re() -> &'static Regex {
    WORD_RE.get_or_init(|| Regex::new(r"[\p{L}\p{N}]+").expect("valid word regex"))
}

/// 地点及其在请求中的起始偏移
#[derive(Debug, Clone, PartialEq, Eq)]
struct Place {
    name: String,
    offset: usize,
}

/// 规则识别器
#[derive(Debug, Default, Clone)]
pub struct KeywordResolver;

impl KeywordResolver {
    pub fn new() -> Self {
        Self
    }

    /// 请求中显式提到的能力（按出现位置），以及是否带有行程类意图
    fn select(&self, input: &str) -> (Vec<(usize, Capability)>, bool) {
        let mut mentions = Vec::new();
        let mut composite = false;
        for m in word_re().find_iter(input) {
            let word = m.as_str().to_lowercase();
            let word = word.as_str();
            if WEATHER_KEYWORDS.contains(&word) {
                mentions.push((m.start(), Capability::Weather));
            } else if HOTEL_KEYWORDS.contains(&word) {
                mentions.push((m.start(), Capability::Hotel));
            } else if COMPOSITE_KEYWORDS.contains(&word) {
                composite = true;
            }
        }
        (mentions, composite)
    }
}

/// 每个地点归属于它前面最近的能力词。
/// 只有每个地点都有归属、且每个点名的能力都分到地点时才按子句配对，否则返回 None。
fn pair_by_clause(
    mentions: &[(usize, Capability)],
    selected: &BTreeSet<Capability>,
    places: &[Place],
) -> Option<Vec<(Capability, String)>> {
    if selected.len() < 2 || places.len() < 2 {
        return None;
    }
    let mut pairs = Vec::with_capacity(places.len());
    for place in places {
        let (_, owner) = mentions
            .iter()
            .rev()
            .find(|(offset, _)| *offset < place.offset)?;
        pairs.push((*owner, place.name.clone()));
    }
    let all_owned = selected
        .iter()
        .all(|cap| pairs.iter().any(|(owner, _)| owner == cap));
    if !all_owned {
        return None;
    }
    // 能力规范顺序；同一能力内保持地点出现顺序
    pairs.sort_by_key(|(cap, _)| *cap);
    Some(pairs)
}

#[async_trait]
impl IntentResolver for KeywordResolver {
    async fn resolve(&self, request: &str) -> Result<Vec<Resolution>, ResolveError> {
        let input = request.trim();
        if input.is_empty() {
            return Err(ResolveError::EmptyRequest);
        }

        let (mentions, composite) = self.select(input);
        let places = locate(input);
        let mut selected: BTreeSet<Capability> = mentions.iter().map(|(_, cap)| *cap).collect();

        // 未点名任何能力：行程类请求或只给出目的地时选中全部
        if selected.is_empty() && (composite || !places.is_empty()) {
            selected.extend(Capability::ALL);
        }

        let mut resolutions = Vec::new();
        if let Some(pairs) = pair_by_clause(&mentions, &selected, &places) {
            for (capability, location) in pairs {
                resolutions.push(Resolution::Call(CapabilityCall::new(capability, location)));
            }
        } else {
            for capability in selected {
                if places.is_empty() {
                    resolutions.push(Resolution::NoLocation(capability));
                    continue;
                }
                for place in &places {
                    resolutions.push(Resolution::Call(CapabilityCall::new(
                        capability,
                        place.name.clone(),
                    )));
                }
            }
        }
        tracing::debug!(request = %input, ?resolutions, "keyword resolution");
        Ok(resolutions)
    }
}

/// 按出现顺序抽取不重复的地点
pub fn extract_locations(input: &str) -> Vec<String> {
    locate(input).into_iter().map(|p| p.name).collect()
}

fn locate(input: &str) -> Vec<Place> {
    let mut out = Vec::new();

    for caps in preposition_place_re().captures_iter(input) {
        let Some(m) = caps.get(1) else { continue };
        if !push_place(&mut out, m.as_str(), m.start()) {
            continue;
        }
        let mut offset = m.end();
        while let Some(next) = continuation_re()
            .captures(&input[offset..])
            .and_then(|c| c.get(1))
        {
            if !push_place(&mut out, next.as_str(), offset + next.start()) {
                break;
            }
            offset += next.end();
        }
    }

    if out.is_empty() {
        let fallback = leading_place_re()
            .captures(input)
            .or_else(|| bare_place_re().captures(input))
            .and_then(|c| c.get(1));
        if let Some(m) = fallback {
            push_place(&mut out, m.as_str(), m.start());
        }
    }
    out
}

fn push_place(out: &mut Vec<Place>, raw: &str, offset: usize) -> bool {
    match clean_place(raw) {
        Some(name) => {
            if !out.iter().any(|p| p.name == name) {
                out.push(Place { name, offset });
            }
            true
        }
        None => false,
    }
}

/// 去掉首尾的关键词与时间词，剩余为空则不是地点
fn clean_place(raw: &str) -> Option<String> {
    let is_noise = |w: &str| {
        let w = w.trim_matches(|c: char| c == '\'' || c == '-').to_lowercase();
        let w = w.strip_suffix("'s").unwrap_or(&w).to_string();
        NOT_A_PLACE.contains(&w.as_str())
            || WEATHER_KEYWORDS.contains(&w.as_str())
            || HOTEL_KEYWORDS.contains(&w.as_str())
            || COMPOSITE_KEYWORDS.contains(&w.as_str())
    };

    let words: Vec<&str> = raw.split_whitespace().collect();
    let start = words.iter().position(|w| !is_noise(*w))?;
    let end = words.iter().rposition(|w| !is_noise(*w))?;
    let place = words[start..=end]
        .join(" ")
        .trim_end_matches(|c: char| c == '\'' || c == '-')
        .to_string();
    let place = place.strip_suffix("'s").unwrap_or(&place).to_string();
    (!place.is_empty()).then_some(place)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(capability: Capability, location: &str) -> Resolution {
        Resolution::Call(CapabilityCall::new(capability, location))
    }

    async fn resolve(input: &str) -> Vec<Resolution> {
        KeywordResolver::new().resolve(input).await.unwrap()
    }

    #[tokio::test]
    async fn test_single_capability() {
        assert_eq!(
            resolve("What's the weather in Paris?").await,
            vec![call(Capability::Weather, "Paris")]
        );
        assert_eq!(
            resolve("Find me hotels in New York").await,
            vec![call(Capability::Hotel, "New York")]
        );
    }

    #[tokio::test]
    async fn test_composite_trip() {
        assert_eq!(
            resolve("Plan a trip to Paris").await,
            vec![
                call(Capability::Weather, "Paris"),
                call(Capability::Hotel, "Paris")
            ]
        );
    }

    #[tokio::test]
    async fn test_bare_destination_is_composite() {
        assert_eq!(
            resolve("Paris").await,
            vec![
                call(Capability::Weather, "Paris"),
                call(Capability::Hotel, "Paris")
            ]
        );
    }

    #[tokio::test]
    async fn test_explicit_capability_wins_over_composite() {
        assert_eq!(
            resolve("I'm visiting Lisbon, what's the forecast?").await,
            vec![call(Capability::Weather, "Lisbon")]
        );
    }

    #[tokio::test]
    async fn test_leading_place() {
        assert_eq!(
            resolve("Tokyo weather").await,
            vec![call(Capability::Weather, "Tokyo")]
        );
    }

    #[tokio::test]
    async fn test_multiple_locations() {
        assert_eq!(
            resolve("weather in Paris and London").await,
            vec![
                call(Capability::Weather, "Paris"),
                call(Capability::Weather, "London")
            ]
        );
    }

    #[tokio::test]
    async fn test_each_clause_keeps_its_location() {
        assert_eq!(
            resolve("weather in Paris and hotels in London").await,
            vec![
                call(Capability::Weather, "Paris"),
                call(Capability::Hotel, "London")
            ]
        );
        assert_eq!(
            resolve("Find hotels in Rome, then the forecast for Oslo and Bergen").await,
            vec![
                call(Capability::Weather, "Oslo"),
                call(Capability::Weather, "Bergen"),
                call(Capability::Hotel, "Rome")
            ]
        );
    }

    #[tokio::test]
    async fn test_shared_location_applies_to_every_capability() {
        assert_eq!(
            resolve("weather and hotels in Paris").await,
            vec![
                call(Capability::Weather, "Paris"),
                call(Capability::Hotel, "Paris")
            ]
        );
        // hotel 没有分到地点，按全部组合处理
        assert_eq!(
            resolve("weather in Paris and London, and a hotel").await,
            vec![
                call(Capability::Weather, "Paris"),
                call(Capability::Weather, "London"),
                call(Capability::Hotel, "Paris"),
                call(Capability::Hotel, "London")
            ]
        );
    }

    #[tokio::test]
    async fn test_weekday_is_not_a_place() {
        assert_eq!(
            resolve("hotels in Rome for Friday").await,
            vec![call(Capability::Hotel, "Rome")]
        );
    }

    #[tokio::test]
    async fn test_no_location() {
        assert_eq!(
            resolve("plan a trip").await,
            vec![
                Resolution::NoLocation(Capability::Weather),
                Resolution::NoLocation(Capability::Hotel)
            ]
        );
    }

    #[tokio::test]
    async fn test_nothing_applicable() {
        assert!(resolve("hello there").await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_request_fails() {
        let err = KeywordResolver::new().resolve("   ").await.unwrap_err();
        assert!(matches!(err, ResolveError::EmptyRequest));
    }
}
