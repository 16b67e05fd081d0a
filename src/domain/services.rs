//! Domain services
//!
//! Business logic that doesn't naturally fit within entities: the fetch
//! seam, price parsing, field inference and cleanup.

pub mod crawling_services;
pub mod price_parser;
pub mod product_cleaner;
pub mod product_normalizer;

pub use crawling_services::{FetchError, FetchedPage, PageFetcher};
pub use price_parser::PriceParser;
pub use product_cleaner::{CleaningReport, ProductCleaner};
pub use product_normalizer::ProductNormalizer;
