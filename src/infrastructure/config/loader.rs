//! Layered configuration loading and validation.

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Prefix for environment overrides, e.g. `FIO_QUEUE__TOPIC`.
pub const ENV_PREFIX: &str = "FIO_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    /// `logging.level` is not a known level.
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// `logging.format` is not `json` or `pretty`.
    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    /// `logging.rotation` is not a known policy.
    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),

    /// `database.path` is empty.
    #[error("Database path cannot be empty")]
    EmptyDatabasePath,

    /// `database.max_connections` is 0.
    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    /// `server.port` is 0.
    #[error("Invalid server port: {0}")]
    InvalidPort(u16),

    /// Empty, or written in bracketed URL form.
    #[error("Invalid server host: {0:?}. Use a hostname or a bare IP address")]
    InvalidHost(String),

    /// A provider base URL is empty.
    #[error("Provider URL for {0} cannot be empty")]
    EmptyProviderUrl(&'static str),

    /// `providers.timeout_ms` is 0.
    #[error("Provider timeout must be greater than 0 ms")]
    InvalidTimeout,

    /// `cache.max_capacity` is 0.
    #[error("Cache max_capacity must be at least 1")]
    InvalidCacheCapacity,

    /// A queue topic name is empty.
    #[error("Queue {0} cannot be empty")]
    EmptyTopic(&'static str),

    /// Dead letters would be fed back into the consumed topic.
    #[error("Queue topic and dead-letter topic must differ (both are '{0}')")]
    DeadLetterTopicCollision(String),

    /// A queue size or interval is 0.
    #[error("Invalid queue {0}: must be at least 1")]
    InvalidQueueSetting(&'static str),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .fio/config.yaml (project config)
    /// 3. .fio/local.yaml (local overrides, optional)
    /// 4. Environment variables (FIO_* prefix, `__` for nesting)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".fio/config.yaml"))
            .merge(Yaml::file(".fio/local.yaml"))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honouring env overrides
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// `load_from_file` when a path is given, `load` otherwise
    pub fn load_with(path: Option<&Path>) -> Result<Config> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Self::load(),
        }
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.server.port == 0 {
            return Err(ConfigError::InvalidPort(config.server.port));
        }

        let host = config.server.host.trim();
        if host.is_empty() || host.starts_with('[') {
            return Err(ConfigError::InvalidHost(config.server.host.clone()));
        }

        if config.database.path.is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }

        if config.database.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(config.database.max_connections));
        }

        if config.cache.max_capacity == 0 {
            return Err(ConfigError::InvalidCacheCapacity);
        }

        let providers = &config.providers;
        for (label, url) in [
            ("age", &providers.age_url),
            ("gender", &providers.gender_url),
            ("nationality", &providers.nationality_url),
        ] {
            if url.trim().is_empty() {
                return Err(ConfigError::EmptyProviderUrl(label));
            }
        }
        if providers.timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout);
        }

        let queue = &config.queue;
        if queue.topic.trim().is_empty() {
            return Err(ConfigError::EmptyTopic("topic"));
        }
        if queue.dead_letter_topic.trim().is_empty() {
            return Err(ConfigError::EmptyTopic("dead_letter_topic"));
        }
        if queue.consumer_group.trim().is_empty() {
            return Err(ConfigError::EmptyTopic("consumer_group"));
        }
        if queue.topic == queue.dead_letter_topic {
            return Err(ConfigError::DeadLetterTopicCollision(queue.topic.clone()));
        }
        if queue.batch_size == 0 {
            return Err(ConfigError::InvalidQueueSetting("batch_size"));
        }
        if queue.channel_capacity == 0 {
            return Err(ConfigError::InvalidQueueSetting("channel_capacity"));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidRotation(config.logging.rotation.clone()));
        }

        Ok(())
    }
}
