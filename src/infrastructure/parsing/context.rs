//! Parsing context for HTML extraction
//!
//! Carries the page URL, the crawl path and per-mode limits into the parsers.

use crate::domain::category::CategoryPath;

/// Context for a category listing page
#[derive(Debug, Clone)]
pub struct ListingContext {
    /// Page being parsed; relative links resolve against it
    pub source_url: String,

    /// Category path assigned by the crawl, if known
    pub categories: Option<CategoryPath>,

    /// Maximum product page links to collect
    pub link_limit: usize,
}

impl ListingContext {
    pub fn new(source_url: impl Into<String>, link_limit: usize) -> Self {
        Self {
            source_url: source_url.into(),
            categories: None,
            link_limit,
        }
    }

    /// Set the crawl path for products found on this page
    pub fn with_categories(mut self, categories: CategoryPath) -> Self {
        self.categories = Some(categories);
        self
    }
}

/// Context for an individual product page
#[derive(Debug, Clone)]
pub struct ProductPageContext {
    /// Product URL being parsed
    pub page_url: String,

    /// Category path inherited from the listing page
    pub categories: Option<CategoryPath>,
}

impl ProductPageContext {
    pub fn new(page_url: impl Into<String>) -> Self {
        Self {
            page_url: page_url.into(),
            categories: None,
        }
    }

    pub fn with_categories(mut self, categories: Option<CategoryPath>) -> Self {
        self.categories = categories;
        self
    }
}
