//! 酒店能力桩服务
//!
//! 环境变量:
//! - TRIP_HOTEL_BIND: 监听地址（默认 0.0.0.0:8002）
//!
//! 启动: cargo run --bin trip-hotel

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
        Capability::Hotel,
        cfg.providers.bind(Capability::Hotel),
        shutdown.token(),
    )
    .await
    .context("Hotel provider failed")
}
