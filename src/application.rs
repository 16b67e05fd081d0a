//! Application layer
//!
//! Crawl orchestration over the domain services and infrastructure parsers,
//! plus progress tracking and result export.

pub mod crawler_manager;
pub mod dto;
pub mod export;
pub mod listing_pipeline;
pub mod progress;

pub use crawler_manager::CatalogCrawler;
pub use dto::{CrawlMode, CrawlOutcome};
pub use export::{ResultWriter, RunSummary};
pub use listing_pipeline::ListingPipeline;
pub use progress::{ProgressStats, ProgressTracker};
