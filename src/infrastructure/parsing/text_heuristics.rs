//! String heuristics shared by the extraction strategies
//!
//! router-switch.com pages mix product names with header chrome (currency
//! and language pickers, shipping banners) and often run several product
//! names together inside one table cell. These helpers strip the chrome,
//! split run-together names and decide whether a string looks like a product.

use regex::{Regex, RegexBuilder};

use super::ParsingResult;
use crate::domain::constants::{brands, limits, vocabulary};

/// Header and navigation blocks removed before any text matching
const CHROME_PATTERNS: [&str; 8] = [
    r"JavaScript seems to be disabled.*?turn on Javascript in your browser\.",
    r"Express shipping to.*?Contact Us.*?Track Order",
    r"USD.*?AED.*?English.*?العربية.*?日本語.*?한국어.*?Polski.*?Slovenčina.*?Kiswahili",
    r"Router-Switch\.com.*?Shop By Categories",
    r"Contact Us.*?Track Order",
    r"Shop By Categories.*?Routers",
    r"USD.*?CHF.*?AED",
    r"English.*?Kiswahili",
];

/// Product series shapes found inside run-together cell text
const SERIES_PATTERNS: [&str; 4] = [
    r"Cisco\s+[A-Z\d\-\s]+(?:Router|Switch|Server)s?",
    r"Huawei\s+[A-Z\d\-\s]+(?:Router|Switch|Server)s?",
    r"Dell\s+[A-Z\d\-\s]+(?:Router|Switch|Server)s?",
    r"[A-Z]{2,}\d+[A-Z\d\-]*\s+[A-Za-z\s]{5,40}",
];

/// Product mentions in free page text
const TEXT_PRODUCT_PATTERNS: [&str; 6] = [
    r"(?:Cisco|Huawei|Dell|HPE|Juniper|Aruba)\s+[A-Z\d][^\n]{10,80}",
    r"[A-Z]{2,}\d+[A-Z\d\-]*\s+[^\n]{10,60}",
    r"NetEngine\s+[^\n]{5,40}",
    r"Catalyst\s+[^\n]{5,40}",
    r"PowerEdge\s+[^\n]{5,40}",
    r"ProLiant\s+[^\n]{5,40}",
];

const MODEL_NUMBER_PATTERN: &str = r"\b[A-Z]{2,}\d+\b";

/// Compiled text heuristics
#[derive(Debug, Clone)]
pub struct TextHeuristics {
    chrome: Vec<Regex>,
    series: Vec<Regex>,
    text_products: Vec<Regex>,
    brand_transition: Regex,
    model_number: Regex,
}

impl TextHeuristics {
    pub fn new() -> ParsingResult<Self> {
        let chrome = CHROME_PATTERNS
            .iter()
            .map(|p| {
                RegexBuilder::new(p)
                    .case_insensitive(true)
                    .dot_matches_new_line(true)
                    .build()
            })
            .collect::<Result<Vec<_>, _>>()?;
        let series = SERIES_PATTERNS
            .iter()
            .map(|p| RegexBuilder::new(p).case_insensitive(true).build())
            .collect::<Result<Vec<_>, _>>()?;
        let text_products = TEXT_PRODUCT_PATTERNS
            .iter()
            .map(|p| {
                RegexBuilder::new(p)
                    .case_insensitive(true)
                    .multi_line(true)
                    .build()
            })
            .collect::<Result<Vec<_>, _>>()?;

        // brand transitions are case sensitive
        let brand_transition = Regex::new(&format!("(?:{})", brands::SPLIT_BRANDS.join("|")))?;

        Ok(Self {
            chrome,
            series,
            text_products,
            brand_transition,
            model_number: Regex::new(MODEL_NUMBER_PATTERN)?,
        })
    }

    /// Strip header chrome and collapse whitespace
    pub fn clean_page_text(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let mut cleaned = text.to_string();
        for pattern in &self.chrome {
            if pattern.is_match(&cleaned) {
                cleaned = pattern.replace_all(&cleaned, "").into_owned();
            }
        }
        collapse(&cleaned)
    }

    pub fn is_navigation_text(text: &str) -> bool {
        let lower = text.to_lowercase();
        vocabulary::NAVIGATION_INDICATORS
            .iter()
            .any(|indicator| lower.contains(indicator))
    }

    fn has_model_number(&self, text: &str) -> bool {
        self.model_number.is_match(&text.to_uppercase())
    }

    fn has_brand(text_lower: &str) -> bool {
        brands::ALIASES.iter().any(|(alias, _)| text_lower.contains(alias))
    }

    /// Length, chrome, and product signal checks for a candidate name
    pub fn is_valid_product_name(&self, name: &str) -> bool {
        let len = name.chars().count();
        if !(limits::MIN_NAME_CHARS..=limits::MAX_NAME_CHARS).contains(&len) {
            return false;
        }
        if Self::is_navigation_text(name) {
            return false;
        }

        let lower = name.to_lowercase();
        let has_indicator = vocabulary::PRODUCT_INDICATORS
            .iter()
            .any(|indicator| lower.contains(indicator));
        has_indicator || Self::has_brand(&lower) || self.has_model_number(name)
    }

    /// Stricter check used for the single name fallback
    pub fn looks_like_single_product(&self, text: &str) -> bool {
        let len = text.chars().count();
        if !(limits::MIN_SINGLE_PRODUCT_CHARS..=limits::MAX_SINGLE_PRODUCT_CHARS).contains(&len) {
            return false;
        }
        if Self::is_navigation_text(text) {
            return false;
        }

        let lower = text.to_lowercase();
        Self::has_brand(&lower)
            || self.has_model_number(text)
            || vocabulary::DEVICE_WORDS.iter().any(|word| lower.contains(word))
    }

    /// Split a text block that may hold several product names run together
    pub fn split_concatenated_products(&self, text: &str) -> Vec<String> {
        if text.chars().count() < limits::MIN_SPLIT_NAME_CHARS {
            return Vec::new();
        }
        let cleaned = self.clean_page_text(text);
        if cleaned.chars().count() < limits::MIN_SPLIT_NAME_CHARS {
            return Vec::new();
        }

        let mut names = Vec::new();

        for pattern in &self.series {
            for m in pattern.find_iter(&cleaned) {
                let candidate = collapse(m.as_str());
                if split_length_ok(&candidate) {
                    names.push(candidate);
                }
            }
        }

        let mut current_brand: Option<&str> = None;
        let mut segment_start = 0;
        for m in self.brand_transition.find_iter(&cleaned) {
            if let Some(name) = Self::name_after_brand(current_brand, &cleaned[segment_start..m.start()]) {
                names.push(name);
            }
            current_brand = Some(m.as_str());
            segment_start = m.end();
        }
        if let Some(name) = Self::name_after_brand(current_brand, &cleaned[segment_start..]) {
            names.push(name);
        }

        if names.is_empty() {
            if let Some(line) = cleaned
                .lines()
                .map(str::trim)
                .find(|line| self.looks_like_single_product(line))
            {
                names.push(line.to_string());
            }
        }

        names.truncate(limits::MAX_NAMES_PER_BLOCK);
        names
    }

    fn name_after_brand(brand: Option<&str>, segment: &str) -> Option<String> {
        let brand = brand?;
        let segment = segment.trim();
        if segment.chars().count() <= limits::MIN_SPLIT_NAME_CHARS {
            return None;
        }

        let line = segment
            .lines()
            .map(str::trim)
            .find(|line| split_length_ok(line) && !Self::is_navigation_text(line))?;
        let name = format!("{brand} {line}");
        (name.chars().count() <= limits::MAX_SPLIT_NAME_CHARS).then_some(name)
    }

    /// Product mentions in cleaned page text, in pattern order
    pub fn find_text_products(&self, cleaned_text: &str) -> Vec<String> {
        self.text_products
            .iter()
            .flat_map(|pattern| pattern.find_iter(cleaned_text))
            .map(|m| collapse(m.as_str()))
            .filter(|candidate| self.is_valid_product_name(candidate))
            .collect()
    }

    /// Whether a link points at an individual product page
    pub fn is_product_page_link(&self, href: &str, text: &str) -> bool {
        if href.trim().is_empty() || text.trim().is_empty() {
            return false;
        }
        let href_lower = href.to_lowercase();
        vocabulary::PRODUCT_LINK_MARKERS
            .iter()
            .any(|marker| href_lower.contains(marker))
            || self.is_valid_product_name(text)
    }

    /// Whether an image looks like product imagery rather than chrome
    pub fn is_product_image(src: &str, alt: &str) -> bool {
        let all_text = format!("{src} {alt}").to_lowercase();
        if vocabulary::IMAGE_EXCLUDE_TERMS
            .iter()
            .any(|term| all_text.contains(term))
        {
            return false;
        }
        vocabulary::IMAGE_INCLUDE_TERMS
            .iter()
            .any(|term| all_text.contains(term))
            || src.chars().count() > limits::MIN_IMAGE_SRC_CHARS
    }
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn split_length_ok(text: &str) -> bool {
    (limits::MIN_SPLIT_NAME_CHARS..=limits::MAX_SPLIT_NAME_CHARS).contains(&text.chars().count())
}
