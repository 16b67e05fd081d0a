//! Final filtering and deduplication of extracted products

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use crate::domain::constants::limits;
use crate::domain::product::ProductRecord;

/// What the cleaner dropped and why
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningReport {
    pub input: usize,
    pub kept: usize,
    pub short_name: usize,
    pub no_identifying_data: usize,
    pub duplicates: usize,
    pub failed_strict_validation: usize,
}

impl CleaningReport {
    pub fn dropped(&self) -> usize {
        self.input - self.kept
    }
}

/// Drops unusable records and duplicates, preserving order
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductCleaner {
    /// Additionally require a real brand and a SKU
    pub strict: bool,
}

impl ProductCleaner {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    pub fn clean(&self, products: Vec<ProductRecord>) -> (Vec<ProductRecord>, CleaningReport) {
        let mut report = CleaningReport {
            input: products.len(),
            ..CleaningReport::default()
        };
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(products.len());

        for product in products {
            if product.name.chars().count() < limits::MIN_NAME_CHARS {
                report.short_name += 1;
                continue;
            }
            if !product.has_sku() && product.is_generic_brand() && !product.has_price() {
                report.no_identifying_data += 1;
                continue;
            }
            if self.strict && !Self::passes_strict_validation(&product) {
                report.failed_strict_validation += 1;
                continue;
            }
            if !seen.insert(Self::dedup_key(&product)) {
                report.duplicates += 1;
                continue;
            }
            kept.push(product);
        }

        report.kept = kept.len();
        debug!(
            "Cleaned products: {} in, {} kept ({} short, {} unidentified, {} duplicate, {} strict)",
            report.input,
            report.kept,
            report.short_name,
            report.no_identifying_data,
            report.duplicates,
            report.failed_strict_validation
        );
        (kept, report)
    }

    /// Lowercased 40 character name prefix joined with the SKU
    pub fn dedup_key(product: &ProductRecord) -> String {
        let prefix: String = product.name.chars().take(limits::DEDUP_PREFIX_CHARS).collect();
        format!("{}_{}", prefix.to_lowercase(), product.sku)
    }

    pub fn passes_strict_validation(product: &ProductRecord) -> bool {
        product.name.chars().count() >= limits::MIN_NAME_CHARS && !product.is_generic_brand() && product.has_sku()
    }
}
