//! Configuration management for AuthorMaps
//!
//! Supports loading configuration from:
//! - Environment variables (prefixed with APP__)
//! - Configuration files (config/default.toml, config/{APP_ENV}.toml, config/local.toml)
//! - Default values

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// PubMed E-utilities configuration
    #[serde(default)]
    pub pubmed: PubMedConfig,

    /// Flat-file cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Co-author network limits
    #[serde(default)]
    pub network: NetworkConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds; a cold author lookup can take minutes
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PubMedConfig {
    /// E-utilities base URL
    #[serde(default = "default_pubmed_base_url")]
    pub base_url: String,

    /// Contact e-mail forwarded to NCBI
    pub email: Option<String>,

    /// NCBI API key (raises the rate limit)
    pub api_key: Option<String>,

    /// Tool name forwarded to NCBI
    #[serde(default = "default_tool")]
    pub tool: String,

    /// Request timeout in seconds
    #[serde(default = "default_pubmed_timeout")]
    pub timeout_secs: u64,

    /// Pause after every successful fetch in milliseconds
    #[serde(default = "default_request_delay")]
    pub request_delay_ms: u64,

    /// `retmax` for author searches
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Directory holding `{First}{Last}.xml` and `{pmid}.json` files
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
    /// Publications allowed for a target author before the query is refused
    #[serde(default = "default_max_publications")]
    pub max_publications: usize,

    /// Fewest authors a publication needs to count
    #[serde(default = "default_min_authors")]
    pub min_authors: usize,

    /// Most authors a publication may have to count
    #[serde(default = "default_max_authors")]
    pub max_authors: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging on stderr
    #[serde(default)]
    pub json_logging: bool,

    /// Directory for the JSON log file (disabled when unset)
    pub log_dir: Option<PathBuf>,
}

// Default value functions
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_request_timeout() -> u64 { 300 }
fn default_pubmed_base_url() -> String { "https://eutils.ncbi.nlm.nih.gov/entrez/eutils".to_string() }
fn default_tool() -> String { "authormaps".to_string() }
fn default_pubmed_timeout() -> u64 { 30 }
fn default_request_delay() -> u64 { crate::DEFAULT_REQUEST_DELAY_MS }
fn default_max_results() -> u32 { 9999 }
fn default_max_publications() -> usize { crate::DEFAULT_MAX_PUBLICATIONS }
fn default_min_authors() -> usize { 2 }
fn default_max_authors() -> usize { 50 }
fn default_log_level() -> String { "info".to_string() }

/// `~/.AuthorMaps/data`, falling back to the working directory without a home
fn default_cache_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".AuthorMaps")
        .join("data")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for PubMedConfig {
    fn default() -> Self {
        Self {
            base_url: default_pubmed_base_url(),
            email: None,
            api_key: None,
            tool: default_tool(),
            timeout_secs: default_pubmed_timeout(),
            request_delay_ms: default_request_delay(),
            max_results: default_max_results(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { dir: default_cache_dir() }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            max_publications: default_max_publications(),
            min_authors: default_min_authors(),
            max_authors: default_max_authors(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logging: false,
            log_dir: None,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            pubmed: PubMedConfig::default(),
            cache: CacheConfig::default(),
            network: NetworkConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment and files
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Load base config file
            .add_source(File::with_name("config/default").required(false))

            // Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))

            // Load local overrides
            .add_source(File::with_name("config/local").required(false))

            // Load from environment variables with APP__ prefix
            // e.g., APP__PUBMED__REQUEST_DELAY_MS=0
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
            )

            .build()?;

        config.try_deserialize()
    }

    /// Load from a specific TOML file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
            )
            .build()?;

        config.try_deserialize()
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }
}

impl PubMedConfig {
    /// Pause applied after each successful fetch
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    /// Get client timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
