//! 单个请求的处理阶段
//!
//! 阶段只存在于一次 handle 调用内，请求结束后丢弃；仅用于日志。

use std::fmt;

/// 请求阶段：Init -> Resolving -> Dispatching -> Collecting -> Aggregating -> Terminal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestPhase {
    Init,
    Resolving,
    Dispatching,
    Collecting,
    Aggregating,
    Terminal,
}

impl RequestPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestPhase::Init => "init",
            RequestPhase::Resolving => "resolving",
            RequestPhase::Dispatching => "dispatching",
            RequestPhase::Collecting => "collecting",
            RequestPhase::Aggregating => "aggregating",
            RequestPhase::Terminal => "terminal",
        }
    }
}

impl fmt::Display for RequestPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
