//! 编排器：处理单个行程规划请求
//!
//! 识别意图 -> 并发调用各能力（互不阻塞、单个失败不影响其余）-> 等全部结束 -> 按请求顺序聚合。
//! 只有意图识别失败会返回错误；请求之间不共享可变状态。

use std::sync::Arc;

use futures_util::future::join_all;
use tracing::Instrument;
use uuid::Uuid;

use crate::capability::{CapabilityCall, CapabilityRegistry};
use crate::config::AppConfig;
use crate::core::{AggregatedResponse, PlannerError, RequestPhase, Segment};
use crate::llm::create_llm_from_config;
use crate::resolver::{create_resolver, IntentResolver, Resolution};

/// 编排器：持有意图识别器与只读的能力注册表，可在并发请求间 clone 共享
#[derive(Clone)]
pub struct Orchestrator {
    resolver: Arc<dyn IntentResolver>,
    registry: Arc<CapabilityRegistry>,
}

impl Orchestrator {
    pub fn new(resolver: Arc<dyn IntentResolver>, registry: Arc<CapabilityRegistry>) -> Self {
        Self { resolver, registry }
    }

    /// 从配置构建：能力端点、超时与识别方式
    pub fn from_config(cfg: &AppConfig) -> Self {
        let llm = create_llm_from_config(cfg);
        let resolver = create_resolver(cfg, llm);
        let registry = Arc::new(CapabilityRegistry::from_config(cfg));
        tracing::info!(
            weather = %cfg.providers.weather_url,
            hotel = %cfg.providers.hotel_url,
            timeout_secs = cfg.client.timeout_secs,
            "orchestrator ready"
        );
        Self::new(resolver, registry)
    }

    /// 处理一个请求。丢弃返回的 future 即放弃所有尚未完成的下游调用。
    pub async fn handle(&self, request: &str) -> Result<AggregatedResponse, PlannerError> {
        let span = tracing::info_span!("plan", request_id = %Uuid::new_v4());
        self.handle_inner(request).instrument(span).await
    }

    async fn handle_inner(&self, request: &str) -> Result<AggregatedResponse, PlannerError> {
        tracing::info!(phase = %RequestPhase::Init, query = %request, "user query");

        tracing::debug!(phase = %RequestPhase::Resolving);
        let resolutions = match self.resolver.resolve(request).await {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(phase = %RequestPhase::Terminal, error = %e, "intent resolution failed");
                return Err(PlannerError::ResolutionFailed(e));
            }
        };

        if resolutions.is_empty() {
            tracing::info!(phase = %RequestPhase::Terminal, "no applicable capability");
            return Ok(AggregatedResponse::no_applicable());
        }

        let calls: Vec<&CapabilityCall> = resolutions
            .iter()
            .filter_map(|r| match r {
                Resolution::Call(call) => Some(call),
                Resolution::NoLocation(_) => None,
            })
            .collect();

        tracing::debug!(phase = %RequestPhase::Dispatching, calls = calls.len());
        let pending = calls.iter().map(|call| self.registry.dispatch(call));

        tracing::debug!(phase = %RequestPhase::Collecting);
        let results = join_all(pending).await;

        tracing::debug!(phase = %RequestPhase::Aggregating);
        let mut results = results.into_iter();
        let mut segments = Vec::with_capacity(resolutions.len());
        for resolution in &resolutions {
            let segment = match resolution {
                Resolution::Call(call) => match results.next() {
                    Some(result) => Segment::from(result),
                    None => Segment::Failure {
                        capability: call.capability,
                        argument: call.argument.clone(),
                        reason: "no result collected".to_string(),
                    },
                },
                Resolution::NoLocation(capability) => Segment::Skipped {
                    capability: *capability,
                },
            };
            segments.push(segment);
        }

        let response = AggregatedResponse::new(segments);
        tracing::info!(
            phase = %RequestPhase::Terminal,
            answered = response.answered(),
            failed = response.failed(),
            skipped = response.skipped(),
            "request complete"
        );
        Ok(response)
    }
}
