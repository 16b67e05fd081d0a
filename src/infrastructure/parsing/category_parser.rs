//! Category navigation discovery
//!
//! Finds main categories on the home page, subcategories on a main category
//! page and product type pages below a subcategory. Every level is a plain
//! link scan with keyword rules; results are deduplicated by URL.

use scraper::{Html, Selector};
use std::collections::HashSet;
use tracing::debug;

use super::{ParsingResult, compile_selectors, element_text, resolve_url};
use crate::domain::category::CategoryLink;
use crate::domain::constants::{site, vocabulary};

const MIN_SUBCATEGORY_TEXT_CHARS: usize = 3;
const MIN_PRODUCT_TYPE_TEXT_CHARS: usize = 5;

pub struct CategoryParser {
    link_selectors: Vec<Selector>,
}

impl CategoryParser {
    pub fn new() -> ParsingResult<Self> {
        Self::with_link_selectors(&["a[href]".to_string()])
    }

    pub fn with_link_selectors(selectors: &[String]) -> ParsingResult<Self> {
        Ok(Self {
            link_selectors: compile_selectors(selectors)?,
        })
    }

    /// (href, trimmed text) of every link on the page
    fn links<'a>(&'a self, html: &'a Html) -> impl Iterator<Item = (&'a str, String)> + 'a {
        self.link_selectors
            .iter()
            .flat_map(move |selector| html.select(selector))
            .filter_map(|anchor| Some((anchor.value().attr("href")?, element_text(anchor))))
    }

    /// Navigation links naming a main category, plus the known category pages
    pub fn discover_main_categories(&self, html: &Html, base_url: &str) -> Vec<CategoryLink> {
        let mut categories: Vec<CategoryLink> = self
            .links(html)
            .filter(|(href, text)| is_main_category_link(href, text))
            .filter_map(|(href, text)| resolve_or_skip(base_url, href).map(|url| CategoryLink::main(text, url)))
            .collect();

        categories.extend(
            site::PATTERN_CATEGORY_SLUGS
                .iter()
                .map(|slug| CategoryLink::main(title_case(&slug.replace('-', " ")), site::category_url(base_url, slug))),
        );

        let categories = dedup_by_url(categories);
        debug!("Discovered {} main categories", categories.len());
        categories
    }

    pub fn discover_subcategories(&self, html: &Html, page_url: &str, parent: &str) -> Vec<CategoryLink> {
        let subcategories = self
            .links(html)
            .filter(|(href, text)| is_subcategory_link(href, text, parent))
            .filter_map(|(href, text)| resolve_or_skip(page_url, href).map(|url| CategoryLink::sub(text, url, parent)))
            .collect();

        let subcategories = dedup_by_url(subcategories);
        debug!("Discovered {} subcategories under {}", subcategories.len(), parent);
        subcategories
    }

    pub fn discover_product_types(
        &self,
        html: &Html,
        page_url: &str,
        parent: &str,
        grandparent: &str,
    ) -> Vec<CategoryLink> {
        let product_types = self
            .links(html)
            .filter(|(href, text)| is_product_type_link(href, text, parent))
            .filter_map(|(href, text)| {
                resolve_or_skip(page_url, href).map(|url| CategoryLink::product_type(text, url, parent, grandparent))
            })
            .collect();

        let product_types = dedup_by_url(product_types);
        debug!("Discovered {} product types under {} > {}", product_types.len(), grandparent, parent);
        product_types
    }
}

fn is_main_category_link(href: &str, text: &str) -> bool {
    if href.is_empty() || text.is_empty() {
        return false;
    }
    let href_lower = href.to_lowercase();
    let text_lower = text.to_lowercase();
    vocabulary::MAIN_CATEGORY_KEYWORDS
        .iter()
        .any(|keyword| href_lower.contains(keyword) || text_lower.contains(keyword))
}

fn is_subcategory_link(href: &str, text: &str, parent: &str) -> bool {
    if href.is_empty() || text.chars().count() < MIN_SUBCATEGORY_TEXT_CHARS {
        return false;
    }
    let text_lower = text.to_lowercase();
    if text_lower == parent.to_lowercase() {
        return false;
    }
    vocabulary::SUBCATEGORY_KEYWORDS.iter().any(|term| text_lower.contains(term)) && !points_at_product(href)
}

fn is_product_type_link(href: &str, text: &str, parent: &str) -> bool {
    if href.is_empty() || text.chars().count() < MIN_PRODUCT_TYPE_TEXT_CHARS {
        return false;
    }
    let text_lower = text.to_lowercase();
    if text_lower == parent.to_lowercase() {
        return false;
    }
    let named = vocabulary::PRODUCT_TYPE_BRANDS
        .iter()
        .chain(vocabulary::PRODUCT_TYPE_MODELS.iter())
        .any(|indicator| text_lower.contains(indicator));
    named && !points_at_product(href)
}

fn points_at_product(href: &str) -> bool {
    let href_lower = href.to_lowercase();
    vocabulary::PRODUCT_HREF_EXCLUSIONS
        .iter()
        .any(|marker| href_lower.contains(marker))
}

fn resolve_or_skip(base: &str, href: &str) -> Option<String> {
    resolve_url(base, href)
        .map_err(|e| debug!("Skipping category link: {}", e))
        .ok()
}

fn dedup_by_url(links: Vec<CategoryLink>) -> Vec<CategoryLink> {
    let mut seen = HashSet::new();
    links.into_iter().filter(|link| seen.insert(link.url.clone())).collect()
}

/// Upper-case the first letter of every word, lower-case the rest
fn title_case(text: &str) -> String {
    let mut titled = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                titled.extend(c.to_uppercase());
            } else {
                titled.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            titled.push(c);
            at_word_start = true;
        }
    }
    titled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::CategoryLevel;
    use rstest::rstest;

    const BASE: &str = "https://www.router-switch.com";

    fn parser() -> CategoryParser {
        CategoryParser::new().unwrap()
    }

    #[test]
    fn main_categories_include_navigation_and_known_pages() {
        let html = Html::parse_document(
            r#"<html><body><nav>
                <a href="/routers-price.html">Routers</a>
                <a href="/wireless-price.html">Wireless</a>
                <a href="/blog.html">Servers blog</a>
                <a href="/about.html">About us</a>
                <a href="/switches-price.html"></a>
            </nav></body></html>"#,
        );

        let categories = parser().discover_main_categories(&html, BASE);
        let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Routers",
                "Wireless",
                "Servers blog",
                "Switches",
                "Firewalls",
                "Servers",
                "Storages",
                "Ip Phones",
                "Accessories",
                "Optical Network",
            ]
        );
        assert_eq!(categories[0].url, "https://www.router-switch.com/routers-price.html");
        assert_eq!(categories[7].url, "https://www.router-switch.com/ip-phones-price.html");
        assert!(categories.iter().all(|c| c.level == CategoryLevel::Main));
    }

    #[test]
    fn subcategories_skip_parent_and_product_links() {
        let html = Html::parse_document(
            r#"<html><body>
                <a href="/routers-price.html">Routers</a>
                <a href="cisco-routers-price.html">Cisco Routers</a>
                <a href="/huawei-routers-price.html">Huawei Routers</a>
                <a href="/product/isr4331.html">Cisco ISR4331 Router</a>
                <a href="/contact.html">Contact</a>
                <a href="/cisco-routers-price.html">Cisco Routers</a>
            </body></html>"#,
        );

        let subs = parser().discover_subcategories(&html, "https://www.router-switch.com/routers-price.html", "Routers");
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].name, "Cisco Routers");
        assert_eq!(subs[0].url, "https://www.router-switch.com/cisco-routers-price.html");
        assert_eq!(subs[0].parent.as_deref(), Some("Routers"));
        assert_eq!(subs[1].name, "Huawei Routers");
    }

    #[test]
    fn product_types_need_brand_or_family() {
        let html = Html::parse_document(
            r#"<html><body>
                <a href="/cisco-isr-4000-price.html">Cisco ISR 4000</a>
                <a href="/catalyst-9200-price.html">Catalyst 9200 Series</a>
                <a href="/cisco-routers-price.html">Cisco Routers</a>
                <a href="/generic-routers.html">Other Routers</a>
                <a href="/item/isr4331.html">Cisco ISR4331</a>
            </body></html>"#,
        );

        let types = parser().discover_product_types(
            &html,
            "https://www.router-switch.com/cisco-routers-price.html",
            "Cisco Routers",
            "Routers",
        );
        let names: Vec<&str> = types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Cisco ISR 4000", "Catalyst 9200 Series"]);
        assert_eq!(types[0].grandparent.as_deref(), Some("Routers"));
        assert_eq!(types[0].level, CategoryLevel::ProductType);
    }

    #[rstest]
    #[case("routers", "Routers")]
    #[case("ip phones", "Ip Phones")]
    #[case("optical network", "Optical Network")]
    #[case("wLAN", "Wlan")]
    fn titles_words(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(title_case(input), expected);
    }
}
