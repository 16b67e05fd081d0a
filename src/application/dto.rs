//! Data transfer objects for crawl runs
//!
//! Crawl modes as chosen on the command line and the outcome handed to the
//! export layer.

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::application::progress::ProgressStats;
use crate::domain::category::HierarchyRow;
use crate::domain::product::ProductRecord;
use crate::domain::services::CleaningReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CrawlMode {
    /// Main category > subcategory > product type, then products
    #[default]
    Comprehensive,
    /// The six root category pages, aiming for priced records
    Price,
    /// Category tree only, no products
    Hierarchy,
    /// Hierarchy followed by comprehensive
    Combined,
}

impl CrawlMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Comprehensive => "comprehensive",
            Self::Price => "price",
            Self::Hierarchy => "hierarchy",
            Self::Combined => "combined",
        }
    }

    pub fn collects_products(self) -> bool {
        !matches!(self, Self::Hierarchy)
    }
}

impl fmt::Display for CrawlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything one crawl run produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlOutcome {
    pub run_id: Uuid,
    pub mode: CrawlMode,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub hierarchy: Vec<HierarchyRow>,
    pub products: Vec<ProductRecord>,
    pub stats: ProgressStats,
    pub cleaning: CleaningReport,
}

impl CrawlOutcome {
    pub fn is_empty(&self) -> bool {
        self.hierarchy.is_empty() && self.products.is_empty()
    }
}
