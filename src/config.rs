use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::service::MatchOptions;

/// 应用配置
///
/// 加载顺序: 内置默认值 → 工作目录下可选的 `matcher.toml` → `MATCHER__*` 环境变量
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub matching: MatchingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// LLM 抽取端点
#[derive(Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    /// 发送给模型的文本上限 (字符数)
    pub max_chars: usize,
}

// 避免在启动日志中打印密钥
impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("timeout_secs", &self.timeout_secs)
            .field("max_chars", &self.max_chars)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchingConfig {
    #[serde(default)]
    pub scan_invoice_surplus: bool,
}

impl MatchingConfig {
    pub fn options(&self) -> MatchOptions {
        MatchOptions {
            scan_invoice_surplus: self.scan_invoice_surplus,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            llm: LlmConfig {
                base_url: "http://localhost:11434/v1".to_string(),
                model: "qwen2.5:7b".to_string(),
                api_key: None,
                timeout_secs: 120,
                max_chars: 12_000,
            },
            matching: MatchingConfig::default(),
        }
    }
}

impl AppConfig {
    /// 从文件与环境变量加载配置
    pub fn load() -> Result<Self, ConfigError> {
        Self::builder(Environment::with_prefix("MATCHER").separator("__"))?
            .build()?
            .try_deserialize()
    }

    fn builder(
        env: Environment,
    ) -> Result<config::builder::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        let defaults = Self::default();
        Ok(Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default("llm.base_url", defaults.llm.base_url)?
            .set_default("llm.model", defaults.llm.model)?
            .set_default("llm.timeout_secs", defaults.llm.timeout_secs as i64)?
            .set_default("llm.max_chars", defaults.llm.max_chars as i64)?
            .set_default("matching.scan_invoice_surplus", defaults.matching.scan_invoice_surplus)?
            .add_source(File::with_name("matcher").required(false))
            .add_source(env))
    }
}
