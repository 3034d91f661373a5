//! 混合识别：先走规则匹配，未命中任何能力时再交给 LLM
//!
//! LLM 不可用时沿用规则结果（通常为空，即没有适用的能力），只有空请求会硬失败。

use async_trait::async_trait;

use crate::core::ResolveError;
use crate::resolver::{IntentResolver, KeywordResolver, LlmResolver, Resolution};

pub struct HybridResolver {
    keyword: KeywordResolver,
    llm: LlmResolver,
}

impl HybridResolver {
    pub fn new(keyword: KeywordResolver, llm: LlmResolver) -> Self {
        Self { keyword, llm }
    }
}

#[async_trait]
impl IntentResolver for HybridResolver {
    async fn resolve(&self, request: &str) -> Result<Vec<Resolution>, ResolveError> {
        let fast = self.keyword.resolve(request).await?;
        if !fast.is_empty() {
            return Ok(fast);
        }
        tracing::debug!("keyword rules matched nothing, asking llm");
        match self.llm.resolve(request).await {
            Ok(resolutions) => Ok(resolutions),
            Err(e) => {
                tracing::warn!(error = %e, "LLM intent resolution failed, keeping keyword result");
                Ok(fast)
            }
        }
    }
}
