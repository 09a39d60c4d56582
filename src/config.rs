use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

const ENV_PREFIX: &str = "SQLBOARD";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub connection: ConnectionDefaults,
    pub query: QueryConfig,
    pub llm: LlmConfig,
    pub ui: UiConfig,
    pub log: LogConfig,
}

/// Pre-filled values of the connection dialog.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConnectionDefaults {
    pub scheme: String,
    pub host: String,
    pub port: String,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl Default for ConnectionDefaults {
    fn default() -> Self {
        Self {
            scheme: "mysql".into(),
            host: "localhost".into(),
            port: "3306".into(),
            user: "newuser".into(),
            password: String::new(),
            database: "classicmodels".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub timeout_secs: u64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self { timeout_secs: 60 }
    }
}

impl QueryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Ollama server used for table analysis.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    /// Extra attempts after a transient failure.
    pub retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".into(),
            model: "phi4".into(),
            max_tokens: 4096,
            timeout_secs: 300,
            retries: 1,
        }
    }
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub alert_secs: u64,
    pub tick_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { alert_secs: 3, tick_ms: 50 }
    }
}

impl UiConfig {
    pub fn alert_duration(&self) -> Duration {
        Duration::from_secs(self.alert_secs)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: "info".into() }
    }
}

impl AppConfig {
    /// Defaults, then the TOML file, then `SQLBOARD__SECTION__KEY` variables.
    /// An explicitly given file must exist; the default one is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        match explicit {
            Some(path) => {
                builder = builder.add_source(config::File::from(path.to_path_buf()).required(true));
            }
            None => {
                if let Some(path) = default_config_path() {
                    builder = builder.add_source(config::File::from(path).required(false));
                }
            }
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        );

        builder
            .build()
            .context("reading configuration")?
            .try_deserialize()
            .context("invalid configuration")
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sqlboard").join("config.toml"))
}
