//! Result files and run summaries

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::fs;
use tracing::info;

use crate::application::dto::{CrawlMode, CrawlOutcome};
use crate::domain::category::HierarchyRow;
use crate::domain::product::ProductRecord;

/// File name timestamp, local time
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

const TOP_ENTRIES: usize = 5;

#[derive(Serialize)]
struct CombinedFile<'a> {
    hierarchy: &'a [HierarchyRow],
    products: &'a [ProductRecord],
}

/// Writes crawl results as JSON files into one output directory
pub struct ResultWriter {
    directory: PathBuf,
    pretty: bool,
}

impl ResultWriter {
    pub fn new(directory: impl Into<PathBuf>, pretty: bool) -> Self {
        Self {
            directory: directory.into(),
            pretty,
        }
    }

    pub fn timestamp() -> String {
        Local::now().format(TIMESTAMP_FORMAT).to_string()
    }

    /// Write the files of a finished run, stamped with the current time
    pub async fn write_outcome(&self, outcome: &CrawlOutcome) -> Result<Vec<PathBuf>> {
        self.write_outcome_at(outcome, &Self::timestamp()).await
    }

    /// Write the files of a finished run; empty parts produce no file
    pub async fn write_outcome_at(&self, outcome: &CrawlOutcome, timestamp: &str) -> Result<Vec<PathBuf>> {
        let written = match outcome.mode {
            CrawlMode::Comprehensive | CrawlMode::Price => {
                self.write_products(outcome.mode.as_str(), &outcome.products, timestamp)
                    .await?
            }
            CrawlMode::Hierarchy => self.write_hierarchy(&outcome.hierarchy, timestamp).await?,
            CrawlMode::Combined => {
                self.write_combined(&outcome.hierarchy, &outcome.products, timestamp)
                    .await?
            }
        };
        Ok(written.into_iter().collect())
    }

    /// `{label}_products_{timestamp}.json`
    pub async fn write_products(
        &self,
        label: &str,
        products: &[ProductRecord],
        timestamp: &str,
    ) -> Result<Option<PathBuf>> {
        if products.is_empty() {
            info!("No products to save");
            return Ok(None);
        }
        let file_name = format!("{label}_products_{timestamp}.json");
        let path = self.write_json(&file_name, &products).await?;
        info!("💾 Saved {} products to {}", products.len(), path.display());
        Ok(Some(path))
    }

    pub async fn write_hierarchy(&self, rows: &[HierarchyRow], timestamp: &str) -> Result<Option<PathBuf>> {
        if rows.is_empty() {
            info!("No hierarchy rows to save");
            return Ok(None);
        }
        let path = self
            .write_json(&format!("category_hierarchy_{timestamp}.json"), &rows)
            .await?;
        info!("💾 Saved {} hierarchy rows to {}", rows.len(), path.display());
        Ok(Some(path))
    }

    pub async fn write_combined(
        &self,
        hierarchy: &[HierarchyRow],
        products: &[ProductRecord],
        timestamp: &str,
    ) -> Result<Option<PathBuf>> {
        if hierarchy.is_empty() && products.is_empty() {
            info!("Nothing to save");
            return Ok(None);
        }
        let path = self
            .write_json(&format!("combined_{timestamp}.json"), &CombinedFile { hierarchy, products })
            .await?;
        info!(
            "💾 Saved {} hierarchy rows and {} products to {}",
            hierarchy.len(),
            products.len(),
            path.display()
        );
        Ok(Some(path))
    }

    async fn write_json<T: Serialize + ?Sized>(&self, file_name: &str, value: &T) -> Result<PathBuf> {
        fs::create_dir_all(&self.directory)
            .await
            .with_context(|| format!("Failed to create output directory {}", self.directory.display()))?;

        let content = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        }
        .context("Failed to serialize results")?;

        let path = self.directory.join(file_name);
        fs::write(&path, content)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}

/// Coverage and category breakdown of a product set
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub with_price: usize,
    pub with_sku: usize,
    pub with_image: usize,
    pub price_rate: f64,
    pub sku_rate: f64,
    pub image_rate: f64,
    pub by_category1: HashMap<String, usize>,
    /// Keyed "level1 > level2"
    pub by_category2: HashMap<String, usize>,
    /// Keyed "level1 > level2 > level3"
    pub by_category3: HashMap<String, usize>,
    pub by_brand: HashMap<String, usize>,
}

impl RunSummary {
    pub fn from_products(products: &[ProductRecord]) -> Self {
        let mut summary = Self {
            total: products.len(),
            ..Self::default()
        };

        for product in products {
            summary.with_price += usize::from(product.has_price());
            summary.with_sku += usize::from(product.has_sku());
            summary.with_image += usize::from(product.has_image());

            if !product.category1.is_empty() {
                *summary.by_category1.entry(product.category1.clone()).or_default() += 1;
                if !product.category2.is_empty() {
                    let key = format!("{} > {}", product.category1, product.category2);
                    *summary.by_category2.entry(key).or_default() += 1;
                    if !product.category3.is_empty() {
                        let key = format!("{} > {} > {}", product.category1, product.category2, product.category3);
                        *summary.by_category3.entry(key).or_default() += 1;
                    }
                }
            }
            if !product.brand.is_empty() {
                *summary.by_brand.entry(product.brand.clone()).or_default() += 1;
            }
        }

        summary.price_rate = rate(summary.with_price, summary.total);
        summary.sku_rate = rate(summary.with_sku, summary.total);
        summary.image_rate = rate(summary.with_image, summary.total);
        summary
    }

    /// Largest entries first; ties by name
    pub fn top(counts: &HashMap<String, usize>, n: usize) -> Vec<(&str, usize)> {
        let mut entries: Vec<(&str, usize)> = counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries.truncate(n);
        entries
    }

    pub fn log(&self) {
        info!("📊 Products: {}", self.total);
        info!("  with price: {} ({:.1}%)", self.with_price, self.price_rate);
        info!("  with SKU:   {} ({:.1}%)", self.with_sku, self.sku_rate);
        info!("  with image: {} ({:.1}%)", self.with_image, self.image_rate);

        for (title, counts) in [
            ("Category 1", &self.by_category1),
            ("Category 1 > 2", &self.by_category2),
            ("Category 1 > 2 > 3", &self.by_category3),
            ("Brand", &self.by_brand),
        ] {
            if counts.is_empty() {
                continue;
            }
            info!("{} breakdown ({} distinct):", title, counts.len());
            for (name, count) in Self::top(counts, TOP_ENTRIES) {
                info!("  {}: {}", name, count);
            }
        }
    }
}

fn rate(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}
