//! 天气能力桩服务
//!
//! 环境变量:
//! - TRIP_WEATHER_BIND: 监听地址（默认 0.0.0.0:8001）
//!
//! 启动: cargo run --bin trip-weather

use std::sync::Arc;

use anyhow::Context;
use trip_planner::capability::Capability;
use trip_planner::config::load_config;
use trip_planner::core::ShutdownManager;
use trip_planner::{observability, provider};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init();

    let cfg = load_config(None).context("Failed to load config")?;
    let shutdown = Arc::new(ShutdownManager::new());
    shutdown.install_signal_handlers();

    provider::serve(
        Capability::Weather,
        cfg.providers.bind(Capability::Weather),
        shutdown.token(),
    )
    .await
    .context("Weather provider failed")
}
