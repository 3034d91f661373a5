//! 错误类型
//!
//! 只有意图识别失败（ResolutionFailed）会上升为请求级错误；
//! 下游能力错误（CapabilityError）在客户端内被吸收为 Failure 提示。

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// 请求级错误：唯一会让调用方看到硬失败的情况
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Resolution failed: {0}")]
    ResolutionFailed(#[from] ResolveError),
}

/// 意图识别器无法处理请求
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("empty request")]
    EmptyRequest,

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("unparseable resolver output: {0}")]
    Parse(String),
}

/// 调用下游能力时的错误；Unreachable / Timeout 属于 CapabilityUnreachable，
/// 其余属于 CapabilityBadResponse，两者处理方式相同
#[derive(Error, Debug)]
pub enum CapabilityError {
    #[error("unreachable: {0}")]
    Unreachable(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP {0}")]
    Status(StatusCode),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("no output returned")]
    NoOutput,
}

impl CapabilityError {
    /// 日志用的错误分类
    pub fn kind(&self) -> &'static str {
        match self {
            CapabilityError::Unreachable(_) | CapabilityError::Timeout(_) => {
                "capability_unreachable"
            }
            CapabilityError::Status(_)
            | CapabilityError::BadResponse(_)
            | CapabilityError::NoOutput => "capability_bad_response",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_error_display() {
        assert_eq!(
            CapabilityError::Status(StatusCode::INTERNAL_SERVER_ERROR).to_string(),
            "HTTP 500 Internal Server Error"
        );
        assert_eq!(
            CapabilityError::Timeout(Duration::from_secs(10)).to_string(),
            "timed out after 10s"
        );
        assert_eq!(CapabilityError::NoOutput.to_string(), "no output returned");
    }

    #[test]
    fn test_capability_error_kind() {
        assert_eq!(
            CapabilityError::Timeout(Duration::from_secs(1)).kind(),
            "capability_unreachable"
        );
        assert_eq!(CapabilityError::NoOutput.kind(), "capability_bad_response");
    }

    #[test]
    fn test_resolution_failed_display() {
        let err = PlannerError::from(ResolveError::EmptyRequest);
        assert_eq!(err.to_string(), "Resolution failed: empty request");
    }
}
