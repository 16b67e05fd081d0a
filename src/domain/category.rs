//! Category taxonomy types
//!
//! Products are filed under a three level path (e.g. `Networking > Routers >
//! Cisco Routers`). The crawler discovers the tree through category links and
//! records it as flat [`HierarchyRow`]s.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::constants::{record_defaults, site};

/// Three level category path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryPath {
    pub level1: String,
    pub level2: String,
    pub level3: String,
}

impl CategoryPath {
    pub fn new(level1: impl Into<String>, level2: impl Into<String>, level3: impl Into<String>) -> Self {
        Self {
            level1: level1.into(),
            level2: level2.into(),
            level3: level3.into(),
        }
    }

    /// True when every level is filled in
    pub fn is_complete(&self) -> bool {
        !self.level1.trim().is_empty() && !self.level2.trim().is_empty() && !self.level3.trim().is_empty()
    }
}

impl Default for CategoryPath {
    fn default() -> Self {
        Self::new(
            record_defaults::DEFAULT_LEVEL1,
            record_defaults::DEFAULT_LEVEL2,
            record_defaults::DEFAULT_LEVEL3,
        )
    }
}

impl fmt::Display for CategoryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} > {} > {}", self.level1, self.level2, self.level3)
    }
}

/// One of the fixed top-level landing pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootCategory {
    pub name: String,
    pub url: String,
}

impl RootCategory {
    /// The six fixed roots, in crawl order
    pub fn fixed_roots(base_url: &str) -> Vec<Self> {
        site::ROOT_CATEGORIES
            .iter()
            .map(|(name, slug)| Self {
                name: (*name).to_string(),
                url: site::category_url(base_url, slug),
            })
            .collect()
    }
}

/// Depth of a discovered category link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryLevel {
    Main,
    Sub,
    ProductType,
}

/// A category link found on a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryLink {
    pub name: String,
    pub url: String,
    pub level: CategoryLevel,
    pub parent: Option<String>,
    pub grandparent: Option<String>,
}

impl CategoryLink {
    pub fn main(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            level: CategoryLevel::Main,
            parent: None,
            grandparent: None,
        }
    }

    pub fn sub(name: impl Into<String>, url: impl Into<String>, parent: &str) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            level: CategoryLevel::Sub,
            parent: Some(parent.to_string()),
            grandparent: None,
        }
    }

    pub fn product_type(
        name: impl Into<String>,
        url: impl Into<String>,
        parent: &str,
        grandparent: &str,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            level: CategoryLevel::ProductType,
            parent: Some(parent.to_string()),
            grandparent: Some(grandparent.to_string()),
        }
    }
}

/// Flat row of the exported category hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyRow {
    #[serde(rename = "category 1")]
    pub category1: String,
    #[serde(rename = "category 2")]
    pub category2: String,
    #[serde(rename = "category 3")]
    pub category3: String,
    pub url: String,
}

impl HierarchyRow {
    /// Root without subcategories; levels 2 and 3 stay empty
    pub fn root_only(root: &RootCategory) -> Self {
        Self {
            category1: root.name.clone(),
            category2: String::new(),
            category3: String::new(),
            url: root.url.clone(),
        }
    }

    pub fn subcategory(root: &str, sub: &CategoryLink) -> Self {
        Self {
            category1: root.to_string(),
            category2: sub.name.clone(),
            category3: String::new(),
            url: sub.url.clone(),
        }
    }

    pub fn product_type(root: &str, sub: &str, product_type: &CategoryLink) -> Self {
        Self {
            category1: root.to_string(),
            category2: sub.to_string(),
            category3: product_type.name.clone(),
            url: product_type.url.clone(),
        }
    }

    /// Deepest populated level (1..=3)
    pub fn depth(&self) -> u8 {
        if !self.category3.is_empty() {
            3
        } else if !self.category2.is_empty() {
            2
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_roots_are_the_six_landing_pages() {
        let roots = RootCategory::fixed_roots("https://www.router-switch.com");
        assert_eq!(roots.len(), 6);
        assert_eq!(roots[0].name, "Routers");
        assert_eq!(roots[0].url, "https://www.router-switch.com/routers-price.html");
        assert_eq!(roots[5].url, "https://www.router-switch.com/storages-price.html");
    }

    #[test]
    fn path_display_and_completeness() {
        let path = CategoryPath::new("Networking", "Routers", "Cisco Routers");
        assert!(path.is_complete());
        assert_eq!(path.to_string(), "Networking > Routers > Cisco Routers");
        assert!(!CategoryPath::new("Networking", " ", "x").is_complete());
    }

    #[test]
    fn hierarchy_row_serializes_with_export_keys() {
        let sub = CategoryLink::sub("Cisco Routers", "https://x/cisco-routers.html", "Routers");
        let row = HierarchyRow::subcategory("Routers", &sub);
        assert_eq!(row.depth(), 2);

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["category 1"], "Routers");
        assert_eq!(json["category 2"], "Cisco Routers");
        assert_eq!(json["category 3"], "");
        assert_eq!(json["url"], "https://x/cisco-routers.html");
    }
}
