use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://needle-ai.com/api/v1";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub needle: NeedleSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Clone, Deserialize)]
pub struct NeedleSettings {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Needle requests allowed per rate limit window
    #[serde(default = "default_rate_limit_calls")]
    pub rate_limit_calls: u32,
    #[serde(default = "default_rate_limit_period_ms")]
    pub rate_limit_period_ms: u64,
}

impl NeedleSettings {
    /// The API key, if one is set and not blank
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

impl Default for NeedleSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            rate_limit_calls: default_rate_limit_calls(),
            rate_limit_period_ms: default_rate_limit_period_ms(),
        }
    }
}

// Keeps the key out of logs.
impl std::fmt::Debug for NeedleSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NeedleSettings")
            .field("api_key", &self.api_key().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("rate_limit_calls", &self.rate_limit_calls)
            .field("rate_limit_period_ms", &self.rate_limit_period_ms)
            .finish()
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_rate_limit_calls() -> u32 {
    10
}

fn default_rate_limit_period_ms() -> u64 {
    1000
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}
