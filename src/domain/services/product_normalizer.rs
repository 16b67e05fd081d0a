//! Field inference and normalization for product records
//!
//! Brand, SKU and the three level category are inferred from the product
//! name and the URL of the page it was found on. [`ProductNormalizer::normalize`]
//! is idempotent: running it on its own output changes nothing.

use chrono::Utc;
use regex::Regex;
use url::Url;

use crate::domain::category::CategoryPath;
use crate::domain::constants::{brands, limits, record_defaults};
use crate::domain::product::{ProductRecord, RawProduct};
use crate::domain::services::price_parser::PriceParser;

/// Model number shapes, most specific first
const SKU_PATTERNS: [&str; 2] = [r"\b[A-Z]{2,}[-\s]*\d+[A-Z\d\-]*\b", r"\b\d{4}[A-Z]+\b"];

/// URL keywords -> (level 1, level 2); first hit wins
const TOP_LEVEL_RULES: [(&[&str], &str, &str); 9] = [
    (&["routers"], "Networking", "Routers"),
    (&["switches"], "Networking", "Switches"),
    (&["firewalls", "security"], "Security", "Firewalls"),
    (&["wireless", "wlan"], "Networking", "Wireless"),
    (&["servers"], "Servers", "Servers"),
    (&["storages", "storage"], "Storage", "Storage Systems"),
    (&["ip-phones", "unified-communications"], "Unified Communications", "IP Phones"),
    (&["optical-network", "olt", "ont"], "Optical Network", "Optical Equipment"),
    (&["accessories"], "Networking", "Accessories"),
];

/// Brand specific product type rule for level 3
struct ProductTypeRule {
    /// Triggers searched in both URL and name
    triggers: &'static [&'static str],
    /// Triggers searched in the URL only
    url_triggers: &'static [&'static str],
    /// Device word -> level 3 label; first hit wins
    types: &'static [(&'static str, &'static str)],
}

const PRODUCT_TYPE_RULES: [ProductTypeRule; 5] = [
    ProductTypeRule {
        triggers: &["cisco"],
        url_triggers: &[],
        types: &[
            ("router", "Cisco Routers"),
            ("switch", "Cisco Switches"),
            ("firewall", "Cisco Firewalls"),
            ("wireless", "Cisco Wireless"),
        ],
    },
    ProductTypeRule {
        triggers: &["huawei"],
        url_triggers: &[],
        types: &[
            ("router", "Huawei Routers"),
            ("switch", "Huawei Switches"),
            ("firewall", "Huawei Firewalls"),
            ("wireless", "Huawei Wireless"),
        ],
    },
    ProductTypeRule {
        triggers: &["juniper"],
        url_triggers: &[],
        types: &[
            ("router", "Juniper Routers"),
            ("switch", "Juniper Switches"),
            ("firewall", "Juniper Firewalls"),
        ],
    },
    ProductTypeRule {
        triggers: &["dell"],
        url_triggers: &[],
        types: &[("server", "Dell Servers"), ("switch", "Dell Switches")],
    },
    ProductTypeRule {
        triggers: &["hpe"],
        url_triggers: &["aruba"],
        types: &[
            ("server", "HPE Servers"),
            ("switch", "HPE Switches"),
            ("wireless", "HPE Aruba Wireless"),
        ],
    },
];

/// Builds and normalizes [`ProductRecord`]s
#[derive(Debug, Clone)]
pub struct ProductNormalizer {
    sku_patterns: Vec<Regex>,
    prices: PriceParser,
}

impl ProductNormalizer {
    pub fn new() -> Result<Self, regex::Error> {
        let sku_patterns = SKU_PATTERNS
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            sku_patterns,
            prices: PriceParser::new()?,
        })
    }

    /// Longest model number in `text` (first one on ties), or empty
    pub fn extract_sku(&self, text: &str) -> String {
        let upper = text.to_uppercase();

        for pattern in &self.sku_patterns {
            let longest = pattern.find_iter(&upper).fold(None::<&str>, |best, m| match best {
                Some(b) if b.chars().count() >= m.as_str().chars().count() => Some(b),
                _ => Some(m.as_str()),
            });
            if let Some(sku) = longest {
                return sku.to_string();
            }
        }

        String::new()
    }

    /// Canonical brand of the first alias contained in `text`
    pub fn extract_brand(text: &str) -> String {
        let lower = text.to_lowercase();
        brands::ALIASES
            .iter()
            .find(|(alias, _)| lower.contains(alias))
            .map_or(brands::GENERIC, |(_, canonical)| *canonical)
            .to_string()
    }

    /// Infer the category path from the page URL and the product name.
    /// Only the URL path and query are searched; the site host itself
    /// contains "router" and "switch".
    pub fn determine_categories(name: &str, url: &str) -> CategoryPath {
        let name_lower = name.to_lowercase();
        let url_lower = url_keyword_text(url).to_lowercase();
        let mut path = CategoryPath::default();

        if let Some((_, level1, level2)) = TOP_LEVEL_RULES
            .iter()
            .find(|(keywords, _, _)| keywords.iter().any(|k| url_lower.contains(k)))
        {
            path.level1 = (*level1).to_string();
            path.level2 = (*level2).to_string();
        }

        let mentions = |word: &str| url_lower.contains(word) || name_lower.contains(word);

        let rule = PRODUCT_TYPE_RULES.iter().find(|rule| {
            rule.triggers.iter().copied().any(mentions)
                || rule.url_triggers.iter().any(|t| url_lower.contains(*t))
        });
        if let Some(label) = rule.and_then(|rule| {
            rule.types
                .iter()
                .find(|(word, _)| mentions(word))
                .map(|(_, label)| *label)
        }) {
            path.level3 = label.to_string();
        }

        path
    }

    /// `"Brand | Model: SKU"`, or the start of the name when neither is known
    pub fn describe(name: &str, sku: &str, brand: &str) -> String {
        let mut parts = Vec::new();
        if brand != brands::GENERIC && !brand.is_empty() {
            parts.push(brand.to_string());
        }
        if !sku.is_empty() {
            parts.push(format!("Model: {sku}"));
        }

        if parts.is_empty() {
            name.chars().take(limits::DESCRIPTION_FALLBACK_CHARS).collect()
        } else {
            parts.join(" | ")
        }
    }

    pub fn warranty_for(_brand: &str) -> String {
        record_defaults::WARRANTY.to_string()
    }

    /// Turn an extracted candidate into a normalized record
    pub fn build(&self, raw: RawProduct) -> ProductRecord {
        let name = collapse_whitespace(&raw.name);
        let sku = self.extract_sku(&name);
        let brand = Self::extract_brand(&name);
        let categories = match raw.categories {
            Some(path) if path.is_complete() => path,
            _ => Self::determine_categories(&name, &raw.source_url),
        };
        let description = Self::describe(&name, &sku, &brand);

        let mut record = ProductRecord {
            product_link: raw.link,
            call_for_price: call_for_price(&raw.price).to_string(),
            price: raw.price,
            warranty: Self::warranty_for(&brand),
            sku,
            brand,
            condition: record_defaults::CONDITION.to_string(),
            availability: record_defaults::AVAILABILITY.to_string(),
            description,
            image: raw.image.unwrap_or_default(),
            category1: String::new(),
            category2: String::new(),
            category3: String::new(),
            source_url: raw.source_url,
            scraped_at: Utc::now(),
            name,
        };
        record.set_categories(categories);

        self.normalize(record)
    }

    /// Canonicalize a record's fields and fill anything that can be inferred
    pub fn normalize(&self, mut record: ProductRecord) -> ProductRecord {
        record.name = collapse_whitespace(&record.name);
        for field in [
            &mut record.product_link,
            &mut record.sku,
            &mut record.brand,
            &mut record.condition,
            &mut record.availability,
            &mut record.warranty,
            &mut record.description,
            &mut record.image,
            &mut record.category1,
            &mut record.category2,
            &mut record.category3,
            &mut record.source_url,
        ] {
            trim_in_place(field);
        }

        record.price = self.prices.clean(record.price.trim());
        record.call_for_price = call_for_price(&record.price).to_string();

        if record.sku.is_empty() {
            record.sku = self.extract_sku(&record.name);
        }
        if record.is_generic_brand() {
            record.brand = Self::extract_brand(&record.name);
        }
        if record.product_link.is_empty() {
            record.product_link.clone_from(&record.source_url);
        }
        if record.condition.is_empty() {
            record.condition = record_defaults::CONDITION.to_string();
        }
        if record.availability.is_empty() {
            record.availability = record_defaults::AVAILABILITY.to_string();
        }
        if record.warranty.is_empty() {
            record.warranty = Self::warranty_for(&record.brand);
        }
        if record.description.is_empty() {
            record.description = Self::describe(&record.name, &record.sku, &record.brand);
        }
        if !record.categories().is_complete() {
            let inferred = Self::determine_categories(&record.name, &record.source_url);
            record.set_categories(inferred);
        }

        record
    }
}

fn url_keyword_text(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => match parsed.query() {
            Some(query) => format!("{}?{}", parsed.path(), query),
            None => parsed.path().to_string(),
        },
        Err(_) => url.to_string(),
    }
}

fn call_for_price(price: &str) -> &'static str {
    if price.trim().is_empty() {
        record_defaults::CALL_FOR_PRICE_YES
    } else {
        record_defaults::CALL_FOR_PRICE_NO
    }
}

fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

/// Collapse runs of whitespace into single spaces and trim
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
