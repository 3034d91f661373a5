//! Trip Planner REPL
//!
//! 入口：初始化日志、加载配置、创建编排器，并在标准输入上运行 REPL。

use std::sync::Arc;

use anyhow::Context;
use tokio::io::BufReader;
use trip_planner::config::load_config;
use trip_planner::core::{Orchestrator, ShutdownManager};
use trip_planner::observability;
use trip_planner::repl::run_repl;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init();

    let cfg = load_config(None).context("Failed to load config")?;
    let orchestrator = Orchestrator::from_config(&cfg);

    let shutdown = Arc::new(ShutdownManager::new());
    shutdown.install_signal_handlers();

    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();

    // Ctrl+C 时丢弃 REPL future，进行中的下游调用随之放弃
    tokio::select! {
        result = run_repl(&orchestrator, stdin, stdout) => {
            result.context("REPL failed")?;
        }
        _ = shutdown.wait_for_shutdown() => {
            tracing::info!("Shutdown signal received");
            // stdin 读取占用阻塞线程，运行时无法等它结束，直接退出
            std::process::exit(0);
        }
    }

    Ok(())
}
