//! 能力客户端
//!
//! 通过统一的 A2A 协议调用任意下游能力：POST JSON、单次调用超时，
//! 网络错误 / 超时 / 非 2xx / 响应缺少 output 一律转为 CapabilityResult::Failure，
//! 不向调用方抛出传输层错误；每次调用输出结构化审计日志（JSON）。

use std::time::{Duration, Instant};

use reqwest::Client;
use tokio::time::timeout;

use crate::capability::{A2aRequest, A2aResponse, Capability, CapabilityResult};
use crate::core::CapabilityError;

/// 单个下游能力的客户端：端点与超时在启动时固定
#[derive(Debug, Clone)]
pub struct CapabilityClient {
    capability: Capability,
    endpoint: String,
    http: Client,
    timeout: Duration,
}

impl CapabilityClient {
    pub fn new(capability: Capability, endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            capability,
            endpoint: endpoint.into(),
            http: Client::new(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// 覆盖超时（测试中使用毫秒级超时）
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// 调用下游能力；永远返回 CapabilityResult，失败信息写入 Failure.reason
    pub async fn call(&self, argument: &str) -> CapabilityResult {
        let start = Instant::now();
        let result = match timeout(self.timeout, self.request(argument)).await {
            Ok(r) => r,
            Err(_) => Err(CapabilityError::Timeout(self.timeout)),
        };

        let outcome = match &result {
            Ok(_) => "ok",
            Err(CapabilityError::Timeout(_)) => "timeout",
            Err(_) => "error",
        };
        let audit = serde_json::json!({
            "event": "capability_audit",
            "capability": self.capability.name(),
            "endpoint": self.endpoint,
            "argument": argument_preview(argument),
            "outcome": outcome,
            "duration_ms": elapsed_ms(start.elapsed()),
        });
        match &result {
            Ok(_) => tracing::info!(audit = %audit, "capability"),
            Err(e) => tracing::warn!(audit = %audit, error = %e, kind = e.kind(), "capability"),
        }

        match result {
            Ok(text) => CapabilityResult::Success {
                capability: self.capability,
                text,
            },
            Err(e) => CapabilityResult::Failure {
                capability: self.capability,
                argument: argument.to_string(),
                reason: e.to_string(),
            },
        }
    }

    async fn request(&self, argument: &str) -> Result<String, CapabilityError> {
        let resp = self
            .http
            .post(&self.endpoint)
            .json(&A2aRequest {
                input: argument.to_string(),
            })
            .send()
            .await
            .map_err(|e| CapabilityError::Unreachable(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CapabilityError::Status(status));
        }

        let body: A2aResponse = resp
            .json()
            .await
            .map_err(|e| CapabilityError::BadResponse(e.to_string()))?;

        match body.output {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(CapabilityError::NoOutput),
        }
    }
}

fn argument_preview(argument: &str) -> String {
    if argument.chars().count() > 200 {
        format!("{}...", argument.chars().take(200).collect::<String>())
    } else {
        argument.to_string()
    }
}

/// 审计日志用的毫秒数，超出 u64 时饱和
fn elapsed_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer, capability: Capability) -> CapabilityClient {
        CapabilityClient::new(capability, format!("{}/a2a", server.uri()), 10)
    }

    #[tokio::test]
    async fn test_call_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/a2a"))
            .and(body_json(serde_json::json!({"input": "Paris"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"output": "Weather in Paris: Sunny, 25°C"})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server, Capability::Weather).await;
        let result = client.call("Paris").await;
        assert_eq!(
            result,
            CapabilityResult::Success {
                capability: Capability::Weather,
                text: "Weather in Paris: Sunny, 25°C".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_call_is_idempotent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"output": "same"})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server, Capability::Hotel).await;
        let first = client.call("Rome").await;
        let second = client.call("Rome").await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_non_2xx_is_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = client_for(&server, Capability::Hotel).await;
        match client.call("Paris").await {
            CapabilityResult::Failure {
                capability,
                argument,
                reason,
            } => {
                assert_eq!(capability, Capability::Hotel);
                assert_eq!(argument, "Paris");
                assert!(reason.contains("500"), "reason: {reason}");
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_output_is_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let client = client_for(&server, Capability::Weather).await;
        match client.call("Oslo").await {
            CapabilityResult::Failure { reason, .. } => assert_eq!(reason, "no output returned"),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = client_for(&server, Capability::Weather).await;
        assert!(!client.call("Oslo").await.is_success());
    }

    #[tokio::test]
    async fn test_timeout_is_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"output": "late"}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = client_for(&server, Capability::Weather)
            .await
            .with_timeout(Duration::from_millis(50));
        match client.call("Lima").await {
            CapabilityResult::Failure { reason, .. } => {
                assert!(reason.contains("timed out"), "reason: {reason}")
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_is_failure() {
        // 绑定后立即释放端口，确保无人监听
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = CapabilityClient::new(Capability::Hotel, format!("http://{addr}/a2a"), 2);
        match client.call("Paris").await {
            CapabilityResult::Failure { capability, reason, .. } => {
                assert_eq!(capability, Capability::Hotel);
                assert!(reason.starts_with("unreachable"), "reason: {reason}");
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn test_elapsed_ms_saturates() {
        assert_eq!(elapsed_ms(Duration::from_millis(1500)), 1500);
        assert_eq!(elapsed_ms(Duration::MAX), u64::MAX);
    }
}
