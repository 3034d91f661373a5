//! 能力注册表
//!
//! 启动时按配置为每个已知能力构建一个 CapabilityClient（能力 -> 客户端的静态映射），
//! 之后只读，可在并发请求间通过 Arc 共享。

use std::collections::BTreeMap;

use crate::capability::{Capability, CapabilityCall, CapabilityClient, CapabilityResult};
use crate::config::AppConfig;

/// 能力注册表：按 Capability 存储客户端
#[derive(Debug, Default, Clone)]
pub struct CapabilityRegistry {
    clients: BTreeMap<Capability, CapabilityClient>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从配置构建：每个已知能力一个客户端
    pub fn from_config(cfg: &AppConfig) -> Self {
        let mut registry = Self::new();
        for capability in Capability::ALL {
            registry.register(CapabilityClient::new(
                capability,
                cfg.providers.endpoint(capability),
                cfg.client.timeout_secs,
            ));
        }
        registry
    }

    pub fn register(&mut self, client: CapabilityClient) {
        self.clients.insert(client.capability(), client);
    }

    pub fn get(&self, capability: Capability) -> Option<&CapabilityClient> {
        self.clients.get(&capability)
    }

    /// 已注册的能力（规范顺序）
    pub fn capabilities(&self) -> Vec<Capability> {
        self.clients.keys().copied().collect()
    }

    /// 执行单次调用；未注册的能力同样产生一个 Failure
    pub async fn dispatch(&self, call: &CapabilityCall) -> CapabilityResult {
        match self.clients.get(&call.capability) {
            Some(client) => client.call(&call.argument).await,
            None => {
                tracing::warn!(capability = %call.capability, "capability not configured");
                CapabilityResult::Failure {
                    capability: call.capability,
                    argument: call.argument.clone(),
                    reason: "capability not configured".to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_registers_all() {
        let registry = CapabilityRegistry::from_config(&AppConfig::default());
        assert_eq!(registry.capabilities(), Capability::ALL.to_vec());
        assert_eq!(
            registry.get(Capability::Weather).map(|c| c.endpoint()),
            Some(crate::config::DEFAULT_WEATHER_URL)
        );
    }

    #[tokio::test]
    async fn test_dispatch_unconfigured() {
        let registry = CapabilityRegistry::new();
        let result = registry
            .dispatch(&CapabilityCall::new(Capability::Hotel, "Paris"))
            .await;
        assert_eq!(
            result,
            CapabilityResult::Failure {
                capability: Capability::Hotel,
                argument: "Paris".to_string(),
                reason: "capability not configured".to_string(),
            }
        );
    }
}
