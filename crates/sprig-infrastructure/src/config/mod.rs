use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;
use url::Url;

pub const CONFIG_FILE_NAME: &str = "sprig.json";
pub const ENV_GQL_URL: &str = "SPRIG_GQL_URL";
pub const ENV_LOG_LEVEL: &str = "SPRIG_LOG_LEVEL";

/// Log level configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Retry behaviour for GraphQL requests answered with a 5xx status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Total attempts including the first one (default: 5)
    pub max_attempts: u32,
    /// Delay before the first retry in milliseconds (default: 300ms)
    pub initial_delay_ms: u64,
    /// Upper bound for any single delay in milliseconds (default: 3000ms)
    pub max_delay_ms: u64,
    /// Randomize each delay between zero and its computed value
    pub jitter: bool,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay_ms: 300,
            max_delay_ms: 3000,
            jitter: true,
        }
    }
}

/// Persistent application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// GraphQL endpoint of the CI server
    pub gql_url: String,
    pub log_level: LogLevel,
    /// Per-request timeout (default: 60 seconds)
    pub request_timeout_secs: u64,
    /// Open form sessions idle longer than this are dropped (default: 30 minutes)
    pub session_idle_timeout_secs: u64,
    pub retry: RetrySettings,
    /// Directory for rolling log files; platform data dir when unset
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gql_url: "http://localhost:9090/graphql/query".to_string(),
            log_level: LogLevel::Info,
            request_timeout_secs: 60,
            session_idle_timeout_secs: 30 * 60,
            retry: RetrySettings::default(),
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Platform config location, e.g. `~/.config/sprig/sprig.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sprig").join(CONFIG_FILE_NAME))
    }

    /// Load from disk, falling back to defaults when the file does not exist
    pub fn load(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str::<AppConfig>(&content)
                .with_context(|| format!("Invalid config file {}", path.display()))?
        } else {
            AppConfig::default()
        };

        info!("📁 Config loaded from: {:?}", path);
        Ok(config)
    }

    /// Load, apply environment overrides and validate
    pub fn resolve(path: &Path) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_overrides(
            std::env::var(ENV_GQL_URL).ok(),
            std::env::var(ENV_LOG_LEVEL).ok(),
        );
        config.validate()?;
        Ok(config)
    }

    pub fn apply_overrides(&mut self, gql_url: Option<String>, log_level: Option<String>) {
        if let Some(url) = gql_url.filter(|u| !u.trim().is_empty()) {
            self.gql_url = url;
        }
        if let Some(level) = log_level.as_deref().and_then(LogLevel::parse) {
            self.log_level = level;
        }
    }

    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.gql_url)
            .with_context(|| format!("Invalid GraphQL URL: {}", self.gql_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("GraphQL URL must be http or https: {}", self.gql_url);
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than 0");
        }
        if self.retry.max_attempts == 0 {
            anyhow::bail!("retry.max_attempts must be at least 1");
        }
        if self.retry.initial_delay_ms > self.retry.max_delay_ms {
            anyhow::bail!("retry.initial_delay_ms cannot exceed retry.max_delay_ms");
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("💾 Config saved to: {:?}", path);
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.session_idle_timeout_secs)
    }

    /// Where log files go when `log_dir` is not configured
    pub fn resolved_log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("sprig")
                .join("logs")
        })
    }
}
