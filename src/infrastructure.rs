//! Infrastructure layer: HTTP, HTML parsing, configuration and logging
//!
//! Everything that touches the network, the file system or raw HTML lives
//! here; the domain layer only sees owned records and the `PageFetcher` seam.

pub mod config;
pub mod logging;
pub mod parsing;
pub mod parsing_error;
pub mod simple_http_client;

pub use config::{AppConfig, ConfigManager, HttpConfig, LoggingConfig, OutputConfig, ScraperConfig};
pub use logging::{get_log_directory, init_logging_with_config};
pub use parsing::{
    CategoryParser, ContextualParser, ListingAnalysis, ListingContext, ParsingConfig, ParsingError, ParsingResult,
    ProductListParser, ProductPageContext, ProductPageParser, TextHeuristics,
};
pub use simple_http_client::{HttpClient, HttpClientConfig};
