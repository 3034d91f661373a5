//! 能力、能力调用与调用结果

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 已知的下游能力；声明顺序即聚合输出的规范顺序（天气在前）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Weather,
    Hotel,
}

impl Capability {
    /// 全部能力，按规范顺序
    pub const ALL: [Capability; 2] = [Capability::Weather, Capability::Hotel];

    pub fn name(&self) -> &'static str {
        match self {
            Capability::Weather => "weather",
            Capability::Hotel => "hotel",
        }
    }

    /// 失败提示，如 "Failed to get weather for Paris: <reason>"
    pub fn failure_notice(&self, argument: &str, reason: &str) -> String {
        match self {
            Capability::Weather => format!("Failed to get weather for {argument}: {reason}"),
            Capability::Hotel => format!("Failed to find hotels for {argument}: {reason}"),
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weather" => Ok(Capability::Weather),
            "hotel" | "hotels" => Ok(Capability::Hotel),
            other => Err(format!("Unknown capability: {other}")),
        }
    }
}

/// 一次能力调用：{能力, 参数（地点）}，只在单个请求内存在
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityCall {
    pub capability: Capability,
    pub argument: String,
}

impl CapabilityCall {
    pub fn new(capability: Capability, argument: impl Into<String>) -> Self {
        Self {
            capability,
            argument: argument.into(),
        }
    }
}

/// 能力调用结果：每个 CapabilityCall 恰好对应一个
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapabilityResult {
    Success {
        capability: Capability,
        text: String,
    },
    Failure {
        capability: Capability,
        argument: String,
        reason: String,
    },
}

impl CapabilityResult {
    pub fn capability(&self) -> Capability {
        match self {
            CapabilityResult::Success { capability, .. }
            | CapabilityResult::Failure { capability, .. } => *capability,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CapabilityResult::Success { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_capability() {
        assert_eq!("Weather".parse::<Capability>(), Ok(Capability::Weather));
        assert_eq!(" hotels ".parse::<Capability>(), Ok(Capability::Hotel));
        assert!("flights".parse::<Capability>().is_err());
    }

    #[test]
    fn test_canonical_order() {
        let mut caps = vec![Capability::Hotel, Capability::Weather];
        caps.sort();
        assert_eq!(caps, Capability::ALL.to_vec());
    }

    #[test]
    fn test_failure_notice() {
        assert_eq!(
            Capability::Hotel.failure_notice("Paris", "HTTP 500"),
            "Failed to find hotels for Paris: HTTP 500"
        );
        assert_eq!(
            Capability::Weather.failure_notice("Rome", "timeout"),
            "Failed to get weather for Rome: timeout"
        );
    }
}
