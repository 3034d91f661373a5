//! A2A 线协议：POST {"input": "..."} -> {"output": "..."}

use serde::{Deserialize, Serialize};

/// 请求体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct A2aRequest {
    pub input: String,
}

/// 响应体；output 缺失时客户端视为失败
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct A2aResponse {
    #[serde(default)]
    pub output: Option<String>,
}
