use std::time::Duration;

use serde::Deserialize;

use crate::infrastructure::batcher::{FetcherOptions, DEFAULT_DELAY};

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub batcher: BatcherConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BatcherConfig {
    pub endpoint: String,
    pub delay_ms: u64,
    pub debug: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for BatcherConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            delay_ms: DEFAULT_DELAY.as_millis() as u64,
            debug: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl BatcherConfig {
    pub fn to_options(&self) -> FetcherOptions {
        FetcherOptions::new(self.endpoint.clone())
            .with_delay(Duration::from_millis(self.delay_ms))
            .with_debug(self.debug)
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                // APP_BATCHER__ENDPOINT -> batcher.endpoint
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
