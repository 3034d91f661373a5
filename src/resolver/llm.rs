//! 基于 LLM 的意图识别
//!
//! 让模型输出 JSON：{"calls": [{"capability": "weather", "location": "Paris"}]}，
//! 容忍 Markdown 代码块包裹；未知能力忽略，location 为空视为找不到地点。

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::capability::{Capability, CapabilityCall};
use crate::core::ResolveError;
use crate::llm::{LlmClient, Message};
use crate::resolver::{normalize, IntentResolver, Resolution};

const SYSTEM_PROMPT: &str = r#"You are the intent classifier of a trip-planning assistant.
Available capabilities:
- weather: weather forecast for a location
- hotel: hotel suggestions for a location

Rules:
- Include every capability the user explicitly asks for.
- If the user asks to plan a trip (or only names a destination) without naming a capability, include all capabilities.
- Use one entry per (capability, location) pair. Use null as location when no location can be determined.
- If no capability applies, return an empty list.

Output ONLY JSON, no explanation:
{"calls": [{"capability": "weather", "location": "Paris"}]}"#;

#[derive(Debug, Deserialize)]
struct LlmPlan {
    #[serde(default)]
    calls: Vec<LlmCall>,
}

#[derive(Debug, Deserialize)]
struct LlmCall {
    capability: String,
    #[serde(default)]
    location: Option<String>,
}

/// LLM 识别器
pub struct LlmResolver {
    llm: Arc<dyn LlmClient>,
}

impl LlmResolver {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl IntentResolver for LlmResolver {
    async fn resolve(&self, request: &str) -> Result<Vec<Resolution>, ResolveError> {
        let input = request.trim();
        if input.is_empty() {
            return Err(ResolveError::EmptyRequest);
        }

        let messages = vec![
            Message::system(SYSTEM_PROMPT),
            Message::user(format!("User input: {input}")),
        ];
        let response = self
            .llm
            .complete(&messages)
            .await
            .map_err(ResolveError::Llm)?;

        let resolutions = parse_plan(&response)?;
        tracing::debug!(request = %input, ?resolutions, "llm resolution");
        Ok(resolutions)
    }
}

/// 解析模型输出为识别结果
fn parse_plan(response: &str) -> Result<Vec<Resolution>, ResolveError> {
    let json = extract_json_object(response)
        .ok_or_else(|| ResolveError::Parse(preview(response)))?;
    let plan: LlmPlan =
        serde_json::from_str(json).map_err(|e| ResolveError::Parse(e.to_string()))?;

    let mut resolutions = Vec::with_capacity(plan.calls.len());
    for call in plan.calls {
        let capability = match call.capability.parse::<Capability>() {
            Ok(c) => c,
            Err(e) => {
                tracing::debug!(error = %e, "ignoring capability from llm");
                continue;
            }
        };
        match call.location.map(|l| l.trim().to_string()) {
            Some(location) if !location.is_empty() => {
                resolutions.push(Resolution::Call(CapabilityCall::new(capability, location)))
            }
            _ => resolutions.push(Resolution::NoLocation(capability)),
        }
    }
    Ok(normalize(resolutions))
}

/// 去掉 ```json 代码块等包裹，取第一个 '{' 到最后一个 '}'
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn preview(text: &str) -> String {
    text.chars().take(120).collect()
}
