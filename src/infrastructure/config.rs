//! Configuration infrastructure
//!
//! Scraper settings live in a single JSON file under the user config
//! directory. Missing sections and fields fall back to [`defaults`]; a file
//! that cannot be parsed is backed up and replaced with defaults.

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};
use url::Url;

use crate::domain::constants::site;

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Crawl budgets and extraction switches
    pub scraper: ScraperConfig,

    /// HTTP client behavior
    pub http: HttpConfig,

    /// Where result files are written
    pub output: OutputConfig,

    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Site root; category URLs are built from it
    pub base_url: String,

    /// Comprehensive mode budget per discovered main category
    pub max_products_per_category: usize,

    /// Per main category budget when the products follow a hierarchy crawl
    pub combined_products_per_category: usize,

    /// Product budget of the price-focused mode
    pub price_mode_max_products: usize,

    /// Product page links followed per category page in category crawls
    pub category_link_limit: usize,

    /// Product page links followed per category page in price-focused crawls
    pub price_link_limit: usize,

    /// Also drop records without a recognised brand or SKU
    pub strict_validation: bool,

    /// Minimum seconds between progress log lines
    pub progress_interval_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Token bucket rate; 0 disables rate limiting
    pub requests_per_second: u32,

    pub request_timeout_secs: u64,

    /// Attempts per URL, including the first
    pub max_retries: u32,

    /// Backoff base; attempt n waits base * 2^(n-1) plus jitter
    pub retry_base_delay_ms: u64,

    pub user_agent: String,

    pub follow_redirects: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub pretty_json: bool,
}

/// Logging configuration settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted file logs
    pub json_format: bool,

    /// Enable console output (stderr)
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Log directory; `logs/` beside the executable when unset
    pub directory: Option<PathBuf>,

    pub file_name: String,

    /// Number of log files to keep (older files will be deleted)
    pub max_files: u32,

    /// Enable automatic log cleanup on startup
    pub auto_cleanup_logs: bool,

    /// Module-specific log level filters (e.g., "reqwest": "info")
    pub module_filters: HashMap<String, String>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: site::BASE_URL.to_string(),
            max_products_per_category: defaults::MAX_PRODUCTS_PER_CATEGORY,
            combined_products_per_category: defaults::COMBINED_PRODUCTS_PER_CATEGORY,
            price_mode_max_products: defaults::PRICE_MODE_MAX_PRODUCTS,
            category_link_limit: defaults::CATEGORY_LINK_LIMIT,
            price_link_limit: defaults::PRICE_LINK_LIMIT,
            strict_validation: defaults::STRICT_VALIDATION,
            progress_interval_secs: defaults::PROGRESS_INTERVAL_SECONDS,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            requests_per_second: defaults::REQUESTS_PER_SECOND,
            request_timeout_secs: defaults::REQUEST_TIMEOUT_SECONDS,
            max_retries: defaults::MAX_RETRIES,
            retry_base_delay_ms: defaults::RETRY_BASE_DELAY_MS,
            user_agent: defaults::USER_AGENT.to_string(),
            follow_redirects: defaults::FOLLOW_REDIRECTS,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(defaults::OUTPUT_DIRECTORY),
            pretty_json: defaults::PRETTY_JSON,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: defaults::LOG_JSON_FORMAT,
            console_output: defaults::LOG_CONSOLE_OUTPUT,
            file_output: defaults::LOG_FILE_OUTPUT,
            directory: None,
            file_name: defaults::LOG_FILE_NAME.to_string(),
            max_files: defaults::LOG_MAX_FILES,
            auto_cleanup_logs: defaults::LOG_AUTO_CLEANUP,
            module_filters: {
                let mut filters = HashMap::new();
                filters.insert("reqwest".to_string(), "info".to_string());
                filters.insert("hyper".to_string(), "warn".to_string());
                filters.insert("html5ever".to_string(), "warn".to_string());
                filters
            },
        }
    }
}

impl AppConfig {
    /// Reject values the crawler cannot run with
    pub fn validate(&self) -> Result<()> {
        let base = Url::parse(&self.scraper.base_url)
            .with_context(|| format!("scraper.base_url is not a valid URL: {}", self.scraper.base_url))?;
        ensure!(base.has_host(), "scraper.base_url has no host: {}", self.scraper.base_url);
        ensure!(self.scraper.max_products_per_category > 0, "scraper.max_products_per_category must be positive");
        ensure!(
            self.scraper.combined_products_per_category > 0,
            "scraper.combined_products_per_category must be positive"
        );
        ensure!(self.scraper.price_mode_max_products > 0, "scraper.price_mode_max_products must be positive");
        ensure!(self.http.max_retries >= 1, "http.max_retries must be at least 1");
        ensure!(self.http.request_timeout_secs > 0, "http.request_timeout_secs must be positive");
        ensure!(!self.http.user_agent.trim().is_empty(), "http.user_agent must not be empty");
        ensure!(self.logging.max_files > 0, "logging.max_files must be positive");
        ensure!(
            self.logging.console_output || self.logging.file_output,
            "logging needs console_output or file_output"
        );
        Ok(())
    }
}

/// Configuration manager for loading and saving settings
pub struct ConfigManager {
    pub config_path: PathBuf,
}

impl ConfigManager {
    /// Get the application configuration directory
    pub fn get_config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get user config directory")?
            .join(defaults::APP_DIR_NAME);

        Ok(config_dir)
    }

    /// Configuration manager for the default location
    pub fn new() -> Result<Self> {
        let config_dir = Self::get_config_dir()?;
        Ok(Self::with_path(config_dir.join(defaults::CONFIG_FILE_NAME)))
    }

    /// Configuration manager for an explicit file
    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    /// Load configuration from file, creating default if it doesn't exist
    pub async fn load_config(&self) -> Result<AppConfig> {
        if !self.config_path.exists() {
            info!("Configuration file not found, creating default: {:?}", self.config_path);
            let default_config = AppConfig::default();
            self.save_config(&default_config).await?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(&self.config_path)
            .await
            .context("Failed to read configuration file")?;

        let config = match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => {
                info!("Loaded configuration from: {:?}", self.config_path);
                config
            }
            Err(parse_error) => {
                warn!("⚠️  Configuration parse error: {}", parse_error);
                warn!("⚠️  Resetting to default configuration");

                let backup_path = self.config_path.with_extension("json.corrupted");
                if let Err(e) = fs::copy(&self.config_path, &backup_path).await {
                    warn!("Failed to create backup of corrupted config: {}", e);
                } else {
                    info!("Backed up corrupted config to: {:?}", backup_path);
                }

                let default_config = AppConfig::default();
                self.save_config(&default_config)
                    .await
                    .context("Failed to save default configuration")?;

                info!("✅ Reset to default configuration");
                default_config
            }
        };

        config
            .validate()
            .with_context(|| format!("Invalid configuration in {}", self.config_path.display()))?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_config(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .context("Failed to create config directory")?;
        }

        let content = serde_json::to_string_pretty(config).context("Failed to serialize configuration")?;

        fs::write(&self.config_path, content)
            .await
            .context("Failed to write configuration file")?;

        info!("Saved configuration to: {:?}", self.config_path);
        Ok(())
    }

    /// Reset configuration to defaults (useful for troubleshooting)
    pub async fn reset_to_defaults(&self) -> Result<AppConfig> {
        info!("🔄 Resetting configuration to defaults");

        let default_config = AppConfig::default();
        self.save_config(&default_config).await?;

        info!("✅ Configuration reset to defaults");
        Ok(default_config)
    }

    /// Get the configuration file path
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}

/// Default configuration values
pub mod defaults {
    pub const APP_DIR_NAME: &str = "router-switch-scraper";
    pub const CONFIG_FILE_NAME: &str = "config.json";

    /// Comprehensive mode budget per main category
    pub const MAX_PRODUCTS_PER_CATEGORY: usize = 50;

    pub const COMBINED_PRODUCTS_PER_CATEGORY: usize = 50;

    pub const PRICE_MODE_MAX_PRODUCTS: usize = 1000;

    /// Product page links followed per category page
    pub const CATEGORY_LINK_LIMIT: usize = 20;

    /// Product page links followed per page in the price-focused mode
    pub const PRICE_LINK_LIMIT: usize = 10;

    pub const STRICT_VALIDATION: bool = false;

    pub const PROGRESS_INTERVAL_SECONDS: u64 = 5;

    pub const REQUESTS_PER_SECOND: u32 = 1;

    pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;

    /// Attempts per URL
    pub const MAX_RETRIES: u32 = 3;

    pub const RETRY_BASE_DELAY_MS: u64 = 1000;

    pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                                  (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

    pub const FOLLOW_REDIRECTS: bool = true;

    pub const OUTPUT_DIRECTORY: &str = "output";

    pub const PRETTY_JSON: bool = true;

    pub const LOG_LEVEL: &str = "info";

    pub const LOG_JSON_FORMAT: bool = false;

    pub const LOG_CONSOLE_OUTPUT: bool = true;

    pub const LOG_FILE_OUTPUT: bool = true;

    pub const LOG_FILE_NAME: &str = "router-switch-scraper.log";

    /// Default maximum log files to keep
    pub const LOG_MAX_FILES: u32 = 5;

    pub const LOG_AUTO_CLEANUP: bool = true;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.scraper.base_url, "https://www.router-switch.com");
        assert_eq!(config.scraper.category_link_limit, 20);
        assert_eq!(config.scraper.price_link_limit, 10);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"scraper": {"max_products_per_category": 7}}"#).unwrap();
        assert_eq!(config.scraper.max_products_per_category, 7);
        assert_eq!(config.scraper.price_mode_max_products, defaults::PRICE_MODE_MAX_PRODUCTS);
        assert_eq!(config.http, HttpConfig::default());
    }

    #[test]
    fn rejects_unusable_values() {
        let mut config = AppConfig::default();
        config.http.max_retries = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.scraper.base_url = "router-switch".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.logging.console_output = false;
        config.logging.file_output = false;
        assert!(config.validate().is_err());
    }
}
