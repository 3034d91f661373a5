//! 意图识别
//!
//! IntentResolver 决定请求需要哪些能力，并为每个能力抽取地点参数。
//! 编排器只依赖该 trait，不关心背后是规则、LLM 还是两者结合。

pub mod hybrid;
pub mod keyword;
pub mod llm;

use std::sync::Arc;

use async_trait::async_trait;

use crate::capability::{Capability, CapabilityCall};
use crate::config::{AppConfig, ResolverMode};
use crate::core::ResolveError;
use crate::llm::LlmClient;

pub use hybrid::HybridResolver;
pub use keyword::KeywordResolver;
pub use llm::LlmResolver;

/// 对单个能力的识别结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// 需要调用的能力及其参数
    Call(CapabilityCall),
    /// 选中了该能力，但请求中找不到地点：跳过而非失败
    NoLocation(Capability),
}

impl Resolution {
    pub fn capability(&self) -> Capability {
        match self {
            Resolution::Call(call) => call.capability,
            Resolution::NoLocation(capability) => *capability,
        }
    }
}

/// 意图识别器：返回有序的识别结果；空列表表示没有适用的能力
#[async_trait]
pub trait IntentResolver: Send + Sync {
    async fn resolve(&self, request: &str) -> Result<Vec<Resolution>, ResolveError>;
}

/// 按配置创建识别器；LLM 模式下没有可用的 LLM 时退回规则匹配
pub fn create_resolver(
    cfg: &AppConfig,
    llm: Option<Arc<dyn LlmClient>>,
) -> Arc<dyn IntentResolver> {
    match (cfg.resolver.mode, llm) {
        (ResolverMode::Keyword, _) => Arc::new(KeywordResolver::new()),
        (ResolverMode::Llm, Some(llm)) => Arc::new(LlmResolver::new(llm)),
        (ResolverMode::Hybrid, Some(llm)) => Arc::new(HybridResolver::new(
            KeywordResolver::new(),
            LlmResolver::new(llm),
        )),
        (mode, None) => {
            tracing::warn!(?mode, "No API key set, falling back to keyword intent resolver");
            Arc::new(KeywordResolver::new())
        }
    }
}

/// 按能力规范顺序稳定排序，并去掉重复项
pub(crate) fn normalize(resolutions: Vec<Resolution>) -> Vec<Resolution> {
    let mut out: Vec<Resolution> = Vec::with_capacity(resolutions.len());
    for r in resolutions {
        if !out.contains(&r) {
            out.push(r);
        }
    }
    out.sort_by_key(|r| r.capability());
    out
}
