//! Service configuration model, deserialized by the config loader.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for fio-enricher
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Attribute cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// External enrichment providers
    #[serde(default)]
    pub providers: ProvidersConfig,

    /// Queue ingestion configuration
    #[serde(default)]
    pub queue: QueueConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Whether to enable permissive CORS
    #[serde(default)]
    pub enable_cors: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            enable_cors: false,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// Path to `SQLite` database file
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Maximum number of database connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> String {
    ".fio/fio.db".to_string()
}

const fn default_max_connections() -> u32 {
    10
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    /// sqlx connection URL for the configured path.
    pub fn url(&self) -> String {
        if self.path.starts_with("sqlite:") {
            self.path.clone()
        } else {
            format!("sqlite:{}", self.path)
        }
    }
}

/// Where attribute lookups are cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// In-process cache, lost on restart
    #[default]
    Memory,
    /// Table in the main database, shared by every process using it
    Sqlite,
}

/// Attribute cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CacheConfig {
    /// Where cached attributes live
    #[serde(default)]
    pub backend: CacheBackend,

    /// Maximum entries held by the in-process cache
    #[serde(default = "default_cache_capacity")]
    pub max_capacity: u64,
}

const fn default_cache_capacity() -> u64 {
    100_000
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            max_capacity: default_cache_capacity(),
        }
    }
}

/// External enrichment provider endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProvidersConfig {
    /// Age provider base URL
    #[serde(default = "default_age_url")]
    pub age_url: String,

    /// Gender provider base URL
    #[serde(default = "default_gender_url")]
    pub gender_url: String,

    /// Nationality provider base URL
    #[serde(default = "default_nationality_url")]
    pub nationality_url: String,

    /// Upper bound for every outbound provider call
    #[serde(default = "default_provider_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_age_url() -> String {
    "https://api.agify.io".to_string()
}

fn default_gender_url() -> String {
    "https://api.genderize.io".to_string()
}

fn default_nationality_url() -> String {
    "https://api.nationalize.io".to_string()
}

const fn default_provider_timeout_ms() -> u64 {
    5_000
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            age_url: default_age_url(),
            gender_url: default_gender_url(),
            nationality_url: default_nationality_url(),
            timeout_ms: default_provider_timeout_ms(),
        }
    }
}

/// Queue ingestion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct QueueConfig {
    /// Run the queue consumer alongside the HTTP server
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Topic carrying raw person records
    #[serde(default = "default_topic")]
    pub topic: String,

    /// Partition consumed by this process
    #[serde(default)]
    pub partition: i32,

    /// Topic receiving undecodable payloads
    #[serde(default = "default_dead_letter_topic")]
    pub dead_letter_topic: String,

    /// Name under which the consumer commits its offset
    #[serde(default = "default_consumer_group")]
    pub consumer_group: String,

    /// Delay between polls when the partition is drained
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Messages fetched per poll
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,

    /// Capacity of the poller -> consumer channel
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    /// Also dead-letter messages whose enrichment failed
    #[serde(default)]
    pub dead_letter_enrichment_failures: bool,
}

const fn default_true() -> bool {
    true
}

fn default_topic() -> String {
    "FIO".to_string()
}

fn default_dead_letter_topic() -> String {
    "FIO_FAILED".to_string()
}

fn default_consumer_group() -> String {
    "fio-enricher".to_string()
}

const fn default_poll_interval_ms() -> u64 {
    500
}

const fn default_batch_size() -> u32 {
    100
}

const fn default_channel_capacity() -> usize {
    256
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            topic: default_topic(),
            partition: 0,
            dead_letter_topic: default_dead_letter_topic(),
            consumer_group: default_consumer_group(),
            poll_interval_ms: default_poll_interval_ms(),
            batch_size: default_batch_size(),
            channel_capacity: default_channel_capacity(),
            dead_letter_enrichment_failures: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files (stdout only when unset)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Also log to stdout when writing files
    #[serde(default = "default_true")]
    pub enable_stdout: bool,

    /// File rotation: daily, hourly, never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            enable_stdout: true,
            rotation: default_rotation(),
        }
    }
}
