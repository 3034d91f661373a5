//! Trip Planner HTTP 服务
//!
//! 对上游服务暴露 POST /plan；监听地址取 [server].bind（默认 0.0.0.0:8000）。
//!
//! 启动: cargo run --bin trip-server

use std::sync::Arc;

use anyhow::Context;
use trip_planner::config::load_config;
use trip_planner::core::{Orchestrator, ShutdownManager};
use trip_planner::{api, observability};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init();

    let cfg = load_config(None).context("Failed to load config")?;
    let orchestrator = Orchestrator::from_config(&cfg);

    let shutdown = Arc::new(ShutdownManager::new());
    shutdown.install_signal_handlers();

    api::serve(orchestrator, &cfg.server.bind, shutdown.token())
        .await
        .context("Trip planner server failed")
}
