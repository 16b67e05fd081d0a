use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::category::CategoryPath;
use super::constants::{brands, record_defaults};

/// Normalized product entry as written to the export files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(rename = "Product Link")]
    pub product_link: String,
    #[serde(rename = "product")]
    pub name: String,
    #[serde(rename = "price")]
    pub price: String,
    #[serde(rename = "Call For Price")]
    pub call_for_price: String,
    #[serde(rename = "SKU")]
    pub sku: String,
    #[serde(rename = "Brand")]
    pub brand: String,
    #[serde(rename = "Condition")]
    pub condition: String,
    #[serde(rename = "Availability")]
    pub availability: String,
    #[serde(rename = "Warranty")]
    pub warranty: String,
    #[serde(rename = "Product Description")]
    pub description: String,
    #[serde(rename = "image")]
    pub image: String,
    #[serde(rename = "category 1")]
    pub category1: String,
    #[serde(rename = "category 2")]
    pub category2: String,
    #[serde(rename = "category 3")]
    pub category3: String,
    #[serde(rename = "Source URL")]
    pub source_url: String,
    #[serde(rename = "Scraped At")]
    pub scraped_at: DateTime<Utc>,
}

impl ProductRecord {
    pub fn has_price(&self) -> bool {
        !self.price.trim().is_empty()
    }

    pub fn has_sku(&self) -> bool {
        !self.sku.trim().is_empty()
    }

    pub fn has_image(&self) -> bool {
        !self.image.trim().is_empty()
    }

    pub fn is_generic_brand(&self) -> bool {
        self.brand.is_empty() || self.brand == brands::GENERIC
    }

    pub fn is_call_for_price(&self) -> bool {
        self.call_for_price == record_defaults::CALL_FOR_PRICE_YES
    }

    pub fn categories(&self) -> CategoryPath {
        CategoryPath::new(&self.category1, &self.category2, &self.category3)
    }

    pub fn set_categories(&mut self, path: CategoryPath) {
        self.category1 = path.level1;
        self.category2 = path.level2;
        self.category3 = path.level3;
    }
}

/// Product candidate pulled from a page, before normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawProduct {
    pub name: String,
    /// Price text as found; empty when none was located
    pub price: String,
    pub link: String,
    /// Page the candidate was extracted from
    pub source_url: String,
    pub image: Option<String>,
    /// Explicit category path from the crawl, if any
    pub categories: Option<CategoryPath>,
}

impl RawProduct {
    pub fn new(name: impl Into<String>, source_url: impl Into<String>) -> Self {
        let source_url = source_url.into();
        Self {
            name: name.into(),
            price: String::new(),
            link: source_url.clone(),
            source_url,
            image: None,
            categories: None,
        }
    }

    pub fn with_price(mut self, price: Option<String>) -> Self {
        self.price = price.unwrap_or_default();
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = link.into();
        self
    }

    pub fn with_image(mut self, image: Option<String>) -> Self {
        self.image = image;
        self
    }

    pub fn with_categories(mut self, categories: Option<CategoryPath>) -> Self {
        self.categories = categories;
        self
    }
}
