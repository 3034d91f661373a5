//! 结果聚合
//!
//! 按能力被请求的顺序（而非返回顺序）拼接：成功取原文，失败渲染为提示，
//! 找不到地点的能力渲染为跳过说明。下游全部失败时也正常返回。

use std::fmt;

use serde::Serialize;

use crate::capability::{Capability, CapabilityResult};

pub const NO_APPLICABLE_CAPABILITY: &str = "No applicable capability found for this request.";

/// 聚合结果中的一段
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    Answer {
        capability: Capability,
        text: String,
    },
    Failure {
        capability: Capability,
        argument: String,
        reason: String,
    },
    Skipped {
        capability: Capability,
    },
    NoApplicable,
}

impl Segment {
    pub fn render(&self) -> String {
        match self {
            Segment::Answer { text, .. } => text.clone(),
            Segment::Failure {
                capability,
                argument,
                reason,
            } => capability.failure_notice(argument, reason),
            Segment::Skipped { capability } => {
                format!("Skipped {capability}: no location found in the request")
            }
            Segment::NoApplicable => NO_APPLICABLE_CAPABILITY.to_string(),
        }
    }
}

impl From<CapabilityResult> for Segment {
    fn from(result: CapabilityResult) -> Self {
        match result {
            CapabilityResult::Success { capability, text } => Segment::Answer { capability, text },
            CapabilityResult::Failure {
                capability,
                argument,
                reason,
            } => Segment::Failure {
                capability,
                argument,
                reason,
            },
        }
    }
}

/// 返回给调用方的最终结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregatedResponse {
    segments: Vec<Segment>,
}

impl AggregatedResponse {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn no_applicable() -> Self {
        Self::new(vec![Segment::NoApplicable])
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn answered(&self) -> usize {
        self.count(|s| matches!(s, Segment::Answer { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, Segment::Failure { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, Segment::Skipped { .. }))
    }

    fn count(&self, pred: impl Fn(&Segment) -> bool) -> usize {
        self.segments.iter().filter(|s| pred(s)).count()
    }

    /// 渲染为纯文本；全部被跳过时合并为一行说明
    pub fn text(&self) -> String {
        if !self.segments.is_empty() && self.skipped() == self.segments.len() {
            let names: Vec<&str> = self
                .segments
                .iter()
                .filter_map(|s| match s {
                    Segment::Skipped { capability } => Some(capability.name()),
                    _ => None,
                })
                .collect();
            return format!(
                "No capability could be matched: no location found in the request ({}).",
                names.join(", ")
            );
        }
        self.segments
            .iter()
            .map(Segment::render)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for AggregatedResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}
