//! Parsing configuration for HTML extraction
//!
//! Centralized CSS selectors for listing pages, product pages and category
//! navigation. Selector lists are ordered: earlier entries take precedence.

use serde::{Deserialize, Serialize};

/// Main parsing configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsingConfig {
    pub listing_selectors: ListingSelectors,
    pub product_page_selectors: ProductPageSelectors,
}

/// CSS selectors for category listing pages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingSelectors {
    pub table: Vec<String>,
    pub row: Vec<String>,
    pub cell: Vec<String>,
    pub link: Vec<String>,
    pub image: Vec<String>,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            table: vec!["table".to_string()],
            row: vec!["tr".to_string()],
            cell: vec!["td, th".to_string()],
            link: vec!["a[href]".to_string()],
            image: vec!["img[src]".to_string()],
        }
    }
}

/// CSS selectors for individual product pages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductPageSelectors {
    /// Product name candidates
    pub name: Vec<String>,
    /// Fallback when no name selector matches
    pub title: Vec<String>,
    /// Price containers
    pub price: Vec<String>,
    /// Main product image
    pub image: Vec<String>,
}

impl Default for ProductPageSelectors {
    fn default() -> Self {
        Self {
            name: vec![
                "h1".to_string(),
                ".product-name".to_string(),
                "#product-name".to_string(),
                ".title".to_string(),
            ],
            title: vec!["title".to_string()],
            price: vec![
                ".price".to_string(),
                "#price".to_string(),
                ".cost".to_string(),
                ".msrp".to_string(),
                ".list-price".to_string(),
                ".sale-price".to_string(),
                "[class*=\"price\"]".to_string(),
                "[id*=\"price\"]".to_string(),
            ],
            image: vec![
                ".product-image img".to_string(),
                "#product-image img".to_string(),
                ".main-image img".to_string(),
                ".product-photo img".to_string(),
            ],
        }
    }
}
