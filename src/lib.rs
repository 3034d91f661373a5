//! Trip Planner - 行程规划编排器
//!
//! 模块划分：
//! - **api**: 编排器 HTTP 接口（POST /plan）
//! - **capability**: 能力枚举、A2A 线协议、能力客户端与注册表
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 错误分类、请求阶段、结果聚合、编排器、优雅关闭
//! - **llm**: LLM 客户端抽象与实现（OpenAI 兼容 / DeepSeek / Mock）
//! - **observability**: 日志初始化
//! - **provider**: 天气 / 酒店能力桩服务
//! - **repl**: 交互式命令行
//! - **resolver**: 意图识别（规则 / LLM / 混合）

pub mod api;
pub mod capability;
pub mod config;
pub mod core;
pub mod llm;
pub mod observability;
pub mod provider;
pub mod repl;
pub mod resolver;

pub use crate::core::{AggregatedResponse, Orchestrator, PlannerError};
