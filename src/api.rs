//! 编排器 HTTP 接口
//!
//! POST /plan {"query": "..."} -> {"output", "answered", "failed", "skipped"}；
//! 下游故障体现在 output 的失败提示中，只有意图识别失败返回 422。

use std::net::SocketAddr;

use axum::{extract::State, http::StatusCode, routing::get, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::core::Orchestrator;

#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    pub query: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlanResponse {
    pub output: String,
    pub answered: usize,
    pub failed: usize,
    pub skipped: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub fn create_router(orchestrator: Orchestrator) -> Router {
    Router::new()
        .route("/plan", post(plan))
        .route("/health", get(|| async { "OK" }))
        .with_state(orchestrator)
}

/// POST /plan
async fn plan(
    State(orchestrator): State<Orchestrator>,
    Json(req): Json<PlanRequest>,
) -> Result<Json<PlanResponse>, (StatusCode, Json<ErrorResponse>)> {
    match orchestrator.handle(&req.query).await {
        Ok(response) => Ok(Json(PlanResponse {
            output: response.text(),
            answered: response.answered(),
            failed: response.failed(),
            skipped: response.skipped(),
        })),
        Err(e) => Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )),
    }
}

/// 运行编排 HTTP 服务，直到 token 被取消
pub async fn serve(
    orchestrator: Orchestrator,
    bind: &str,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let addr: SocketAddr = bind.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Trip planner listening on http://{}/plan", listener.local_addr()?);
    axum::serve(listener, create_router(orchestrator))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;
    Ok(())
}
