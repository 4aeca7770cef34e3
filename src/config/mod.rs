//! Configuration management.
//!
//! Settings are layered, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. a TOML file (`--config`, `./pharma-papers.toml`, or
//!    `<config dir>/pharma-papers/config.toml`)
//! 3. `PHARMA_PAPERS_*` environment variables, `__` separating sections
//!    (e.g. `PHARMA_PAPERS_PUBMED__API_KEY`)
//!
//! Command-line flags are applied on top by the binary.
//!
//! # Configuration File Format
//!
//! ```toml
//! [pubmed]
//! base_url = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/"
//! email = "you@example.com"
//! api_key = "your-ncbi-key"
//! request_delay_ms = 340
//! timeout_secs = 30
//!
//! [keywords]
//! corporate_domains = ["pfizer.com", "novartis.com"]
//!
//! [logging]
//! level = "info"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::classify::KeywordSets;

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "pharma-papers.toml";

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "PHARMA_PAPERS";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// PubMed E-utilities settings
    #[serde(default)]
    pub pubmed: PubMedConfig,

    /// Keyword sets for affiliation classification
    #[serde(default)]
    pub keywords: KeywordSets,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// PubMed E-utilities client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PubMedConfig {
    /// E-utilities base URL (endpoint names are appended)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Contact email sent to NCBI (recommended for higher rate limits)
    #[serde(default)]
    pub email: Option<String>,

    /// NCBI API key (for higher rate limits)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Fixed delay before each request, in milliseconds
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Per-request timeout, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for PubMedConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            email: None,
            api_key: None,
            request_delay_ms: default_request_delay_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl PubMedConfig {
    /// Delay applied before every outbound request
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_base_url() -> String {
    "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/".to_string()
}

fn default_request_delay_ms() -> u64 {
    340 // ~3 requests per second
}

fn default_timeout_secs() -> u64 {
    30
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Load configuration from an optional file plus the environment.
///
/// A file passed here must exist.
pub fn load_config(path: Option<&Path>) -> Result<Config, config::ConfigError> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path).required(true));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize()
}

/// First existing default config file location, if any
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("pharma-papers").join("config.toml"))
        .filter(|path| path.is_file())
}
