//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `TRIP__*` 覆盖（双下划线表示嵌套，如 `TRIP__CLIENT__TIMEOUT_SECS=5`），
//! 最后兼容旧变量 `WEATHER_URL` / `HOTEL_URL`。启动时加载一次，之后只读。

use std::path::PathBuf;

use serde::Deserialize;

use crate::capability::Capability;

/// 默认天气服务端点
pub const DEFAULT_WEATHER_URL: &str = "http://localhost:8001/a2a";
/// 默认酒店服务端点
pub const DEFAULT_HOTEL_URL: &str = "http://localhost:8002/a2a";

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersSection,
    #[serde(default)]
    pub client: ClientSection,
    #[serde(default)]
    pub resolver: ResolverSection,
    #[serde(default)]
    pub llm: LlmSection,
    #[serde(default)]
    pub server: ServerSection,
}

/// [providers] 段：各能力的下游端点与桩服务监听地址
#[derive(Debug, Clone, Deserialize)]
pub struct ProvidersSection {
    #[serde(default = "default_weather_url")]
    pub weather_url: String,
    #[serde(default = "default_hotel_url")]
    pub hotel_url: String,
    #[serde(default = "default_weather_bind")]
    pub weather_bind: String,
    #[serde(default = "default_hotel_bind")]
    pub hotel_bind: String,
}

impl Default for ProvidersSection {
    fn default() -> Self {
        Self {
            weather_url: default_weather_url(),
            hotel_url: default_hotel_url(),
            weather_bind: default_weather_bind(),
            hotel_bind: default_hotel_bind(),
        }
    }
}

impl ProvidersSection {
    /// 能力对应的端点 URL
    pub fn endpoint(&self, capability: Capability) -> &str {
        match capability {
            Capability::Weather => &self.weather_url,
            Capability::Hotel => &self.hotel_url,
        }
    }

    /// 能力桩服务的监听地址
    pub fn bind(&self, capability: Capability) -> &str {
        match capability {
            Capability::Weather => &self.weather_bind,
            Capability::Hotel => &self.hotel_bind,
        }
    }
}

fn default_weather_url() -> String {
    DEFAULT_WEATHER_URL.to_string()
}

fn default_hotel_url() -> String {
    DEFAULT_HOTEL_URL.to_string()
}

fn default_weather_bind() -> String {
    "0.0.0.0:8001".to_string()
}

fn default_hotel_bind() -> String {
    "0.0.0.0:8002".to_string()
}

/// [client] 段：单次能力调用超时（秒）
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSection {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}

/// 意图识别方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResolverMode {
    /// 仅规则匹配
    Keyword,
    /// 仅 LLM
    Llm,
    /// 规则优先，未命中再问 LLM
    #[default]
    Hybrid,
}

/// [resolver] 段
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ResolverSection {
    #[serde(default)]
    pub mode: ResolverMode,
}

/// [llm] 段：后端选择（仅 LLM 意图识别使用）
#[derive(Debug, Clone, Deserialize)]
pub struct LlmSection {
    /// 后端：deepseek / openai
    #[serde(default = "default_provider")]
    pub provider: String,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            base_url: None,
        }
    }
}

fn default_provider() -> String {
    "deepseek".to_string()
}

/// [server] 段：编排 HTTP 接口监听地址
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_server_bind")]
    pub bind: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: default_server_bind(),
        }
    }
}

fn default_server_bind() -> String {
    "0.0.0.0:8000".to_string()
}

/// 从 config 目录加载配置，环境变量 TRIP__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 叠加环境变量 TRIP__*（双下划线表示嵌套键）
/// 4. 最后应用 WEATHER_URL / HOTEL_URL
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("TRIP")
            .separator("__")
            .try_parsing(true),
    );

    let mut cfg: AppConfig = builder.build()?.try_deserialize()?;
    apply_legacy_env(&mut cfg, |key| std::env::var(key).ok());
    validate(&cfg)?;
    Ok(cfg)
}

fn validate(cfg: &AppConfig) -> Result<(), config::ConfigError> {
    if cfg.client.timeout_secs == 0 {
        return Err(config::ConfigError::Message(
            "client.timeout_secs must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// WEATHER_URL / HOTEL_URL 优先级最高；空值忽略
fn apply_legacy_env(cfg: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(url) = lookup("WEATHER_URL").filter(|v| !v.trim().is_empty()) {
        cfg.providers.weather_url = url;
    }
    if let Some(url) = lookup("HOTEL_URL").filter(|v| !v.trim().is_empty()) {
        cfg.providers.hotel_url = url;
    }
    if let Some(bind) = lookup("TRIP_WEATHER_BIND").filter(|v| !v.trim().is_empty()) {
        cfg.providers.weather_bind = bind;
    }
    if let Some(bind) = lookup("TRIP_HOTEL_BIND").filter(|v| !v.trim().is_empty()) {
        cfg.providers.hotel_bind = bind;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.providers.weather_url, DEFAULT_WEATHER_URL);
        assert_eq!(cfg.providers.hotel_url, DEFAULT_HOTEL_URL);
        assert_eq!(cfg.client.timeout_secs, 10);
        assert_eq!(cfg.resolver.mode, ResolverMode::Hybrid);
        assert_eq!(cfg.providers.endpoint(Capability::Hotel), DEFAULT_HOTEL_URL);
    }

    #[test]
    fn test_legacy_env_overrides() {
        let mut cfg = AppConfig::default();
        let vars: HashMap<&str, &str> = [
            ("WEATHER_URL", "http://weather.internal/a2a"),
            ("HOTEL_URL", "  "),
        ]
        .into_iter()
        .collect();
        apply_legacy_env(&mut cfg, |k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.providers.weather_url, "http://weather.internal/a2a");
        // 空值不覆盖
        assert_eq!(cfg.providers.hotel_url, DEFAULT_HOTEL_URL);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[client]\ntimeout_secs = 3\n\n[resolver]\nmode = \"keyword\"\n\n[providers]\nhotel_url = \"http://h:9/a2a\""
        )
        .unwrap();

        let cfg = load_config(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(cfg.client.timeout_secs, 3);
        assert_eq!(cfg.resolver.mode, ResolverMode::Keyword);
        if std::env::var("HOTEL_URL").is_err() {
            assert_eq!(cfg.providers.hotel_url, "http://h:9/a2a");
        }
        if std::env::var("WEATHER_URL").is_err() {
            assert_eq!(cfg.providers.weather_url, DEFAULT_WEATHER_URL);
        }
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[client]\ntimeout_secs = 0").unwrap();

        let err = load_config(Some(file.path().to_path_buf())).unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }
}
