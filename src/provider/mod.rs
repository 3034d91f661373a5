//! 能力提供方桩服务
//!
//! 每个提供方只实现 A2A 协议：POST /a2a {"input"} -> {"output"}，无状态、结果确定。
//! 任何遵守同一协议的服务都可以替换它们，编排器无需改动。

use std::net::SocketAddr;

use axum::{extract::State, http::StatusCode, routing::get, routing::post, Json, Router};
use tokio_util::sync::CancellationToken;

use crate::capability::{A2aRequest, A2aResponse, Capability};

pub fn weather_answer(location: &str) -> String {
    format!("Weather in {location}: Sunny, 25°C")
}

pub fn hotel_answer(location: &str) -> String {
    format!("Hotel suggestions for {location}: Hotel A, Hotel B, Hotel C")
}

/// 能力对应的回答函数
pub fn answer_for(capability: Capability) -> fn(&str) -> String {
    match capability {
        Capability::Weather => weather_answer,
        Capability::Hotel => hotel_answer,
    }
}

/// 创建提供方路由
pub fn create_router(capability: Capability) -> Router {
    Router::new()
        .route("/a2a", post(handle_a2a))
        .route("/health", get(|| async { "OK" }))
        .with_state(capability)
}

/// POST /a2a
async fn handle_a2a(
    State(capability): State<Capability>,
    Json(req): Json<A2aRequest>,
) -> Result<Json<A2aResponse>, (StatusCode, String)> {
    let input = req.input.trim();
    if input.is_empty() {
        return Err((StatusCode::UNPROCESSABLE_ENTITY, "input must not be empty".to_string()));
    }
    tracing::info!(capability = %capability, input = %input, "a2a request");
    Ok(Json(A2aResponse {
        output: Some(answer_for(capability)(input)),
    }))
}

/// 在 bind 地址上运行提供方，直到 token 被取消
pub async fn serve(
    capability: Capability,
    bind: &str,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let addr: SocketAddr = bind.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("{} provider listening on http://{}/a2a", capability, listener.local_addr()?);
    axum::serve(listener, create_router(capability))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;
    Ok(())
}
