//! Category listing page parser
//!
//! Runs the three listing strategies over one page:
//!
//! 1. table rows, where the first cell holds one or more product names and
//!    the price may sit anywhere in the row or around it
//! 2. links to individual product pages, returned for the crawler to fetch
//! 3. free page text, matched against product name shapes
//!
//! Product images found on the page are collected alongside.

use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::debug;

use super::config::{ListingSelectors, ParsingConfig};
use super::context::ListingContext;
use super::text_heuristics::TextHeuristics;
use super::{ContextualParser, ParsingResult, compile_selectors, element_text, raw_text, resolve_url, visible_text};
use crate::domain::constants::limits;
use crate::domain::product::RawProduct;
use crate::domain::services::PriceParser;

/// Everything a listing page yields without further requests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingAnalysis {
    pub table_products: Vec<RawProduct>,
    pub text_products: Vec<RawProduct>,
    /// Absolute product page URLs, deduplicated, in page order
    pub product_page_links: Vec<String>,
    /// Absolute product image URLs in page order
    pub images: Vec<String>,
}

pub struct ProductListParser {
    table_selectors: Vec<Selector>,
    row_selectors: Vec<Selector>,
    cell_selectors: Vec<Selector>,
    link_selectors: Vec<Selector>,
    image_selectors: Vec<Selector>,
    heuristics: TextHeuristics,
    prices: PriceParser,
}

impl ProductListParser {
    /// Create a listing parser with default selectors
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&ParsingConfig::default().listing_selectors)
    }

    pub fn with_config(selectors: &ListingSelectors) -> ParsingResult<Self> {
        Ok(Self {
            table_selectors: compile_selectors(&selectors.table)?,
            row_selectors: compile_selectors(&selectors.row)?,
            cell_selectors: compile_selectors(&selectors.cell)?,
            link_selectors: compile_selectors(&selectors.link)?,
            image_selectors: compile_selectors(&selectors.image)?,
            heuristics: TextHeuristics::new()?,
            prices: PriceParser::new()?,
        })
    }

    /// Run every listing strategy over the page
    pub fn analyze(&self, html: &Html, context: &ListingContext) -> ListingAnalysis {
        let analysis = ListingAnalysis {
            table_products: self.extract_table_products(html, context),
            text_products: self.extract_text_products(html, context),
            product_page_links: self.collect_product_links(html, context),
            images: self.collect_images(html, &context.source_url),
        };
        debug!(
            "Listing {}: {} table, {} text candidates, {} product links, {} images",
            context.source_url,
            analysis.table_products.len(),
            analysis.text_products.len(),
            analysis.product_page_links.len(),
            analysis.images.len()
        );
        analysis
    }

    /// Strategy 1: product names from the first cell of every table row
    pub fn extract_table_products(&self, html: &Html, context: &ListingContext) -> Vec<RawProduct> {
        let mut products = Vec::new();

        for table in self.table_selectors.iter().flat_map(|s| html.select(s)) {
            for row in self.row_selectors.iter().flat_map(|s| table.select(s)) {
                let cells: Vec<ElementRef<'_>> = self.cell_selectors.iter().flat_map(|s| row.select(s)).collect();
                let Some(first_cell) = cells.first().copied() else {
                    continue;
                };

                let product_text = element_text(first_cell);
                let mut row_price: Option<Option<String>> = None;
                for name in self.heuristics.split_concatenated_products(&product_text) {
                    if !self.heuristics.is_valid_product_name(&name) {
                        continue;
                    }
                    let price = row_price
                        .get_or_insert_with(|| self.find_price_around_row(row, &cells))
                        .clone();
                    let link = self.first_link(first_cell, &context.source_url);
                    products.push(
                        RawProduct::new(name, context.source_url.as_str())
                            .with_price(price)
                            .with_link(link)
                            .with_categories(context.categories.clone()),
                    );
                }
            }
        }

        products
    }

    /// Row cells first, then the enclosing element, then the following siblings
    fn find_price_around_row(&self, row: ElementRef<'_>, cells: &[ElementRef<'_>]) -> Option<String> {
        cells
            .iter()
            .find_map(|cell| self.prices.extract(&raw_text(*cell)))
            .or_else(|| {
                row.parent()
                    .and_then(ElementRef::wrap)
                    .and_then(|parent| self.prices.extract(&raw_text(parent)))
            })
            .or_else(|| {
                row.next_siblings()
                    .filter_map(ElementRef::wrap)
                    .take(limits::PRICE_SIBLING_LOOKAHEAD)
                    .find_map(|sibling| self.prices.extract(&raw_text(sibling)))
            })
    }

    fn first_link(&self, cell: ElementRef<'_>, source_url: &str) -> String {
        self.link_selectors
            .iter()
            .flat_map(|s| cell.select(s))
            .find_map(|anchor| anchor.value().attr("href"))
            .and_then(|href| match resolve_url(source_url, href) {
                Ok(url) => Some(url),
                Err(e) => {
                    debug!("Keeping source URL for product link: {}", e);
                    None
                }
            })
            .unwrap_or_else(|| source_url.to_string())
    }

    /// Strategy 2: links that look like individual product pages
    pub fn collect_product_links(&self, html: &Html, context: &ListingContext) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut links = Vec::new();

        for anchor in self.link_selectors.iter().flat_map(|s| html.select(s)) {
            if links.len() >= context.link_limit {
                break;
            }
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            if !self.heuristics.is_product_page_link(href, &element_text(anchor)) {
                continue;
            }
            match resolve_url(&context.source_url, href) {
                Ok(url) => {
                    if seen.insert(url.clone()) {
                        links.push(url);
                    }
                }
                Err(e) => debug!("Skipping product link: {}", e),
            }
        }

        links
    }

    /// Strategy 3: product mentions in the visible page text
    pub fn extract_text_products(&self, html: &Html, context: &ListingContext) -> Vec<RawProduct> {
        let cleaned = self.heuristics.clean_page_text(&visible_text(html));

        self.heuristics
            .find_text_products(&cleaned)
            .into_iter()
            .map(|name| {
                let price = self.prices.find_near(&name, &cleaned);
                RawProduct::new(name, context.source_url.as_str())
                    .with_price(price)
                    .with_categories(context.categories.clone())
            })
            .collect()
    }

    pub fn collect_images(&self, html: &Html, source_url: &str) -> Vec<String> {
        self.image_selectors
            .iter()
            .flat_map(|s| html.select(s))
            .filter_map(|img| {
                let src = img.value().attr("src")?;
                let alt = img.value().attr("alt").unwrap_or_default();
                if !TextHeuristics::is_product_image(src, alt) {
                    return None;
                }
                resolve_url(source_url, src).ok()
            })
            .collect()
    }
}

impl ContextualParser for ProductListParser {
    type Output = ListingAnalysis;
    type Context = ListingContext;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output> {
        Ok(self.analyze(html, context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::CategoryPath;

    const PAGE_URL: &str = "https://www.router-switch.com/routers-price.html";

    fn parser() -> ProductListParser {
        ProductListParser::new().unwrap()
    }

    #[test]
    fn table_rows_yield_named_priced_products() {
        let html = Html::parse_document(
            r#"<html><body><table>
                <tr><td><a href="/isr4331-k9-p-101.html">Cisco ISR4331/K9 Router</a></td><td>$1,299.00</td></tr>
                <tr><td></td></tr>
                <tr><td>Menu</td><td>Contact Us</td></tr>
            </table></body></html>"#,
        );
        let context = ListingContext::new(PAGE_URL, 20);

        let products = parser().extract_table_products(&html, &context);
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Cisco ISR4331/K9 Router");
        assert_eq!(products[0].price, "$1,299.00");
        assert_eq!(products[0].link, "https://www.router-switch.com/isr4331-k9-p-101.html");
        assert_eq!(products[0].source_url, PAGE_URL);
    }

    #[test]
    fn row_without_price_borrows_from_enclosing_rows() {
        let html = Html::parse_document(
            r#"<html><body><table>
                <tr><td>Cisco ISR4331/K9 Router</td><td>Call for price</td></tr>
                <tr><td>Bundle</td><td>$2,050</td></tr>
            </table></body></html>"#,
        );
        let context = ListingContext::new(PAGE_URL, 20);

        let products = parser().extract_table_products(&html, &context);
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].price, "$2,050");
        assert_eq!(products[0].link, PAGE_URL);
    }

    #[test]
    fn crawl_categories_are_carried() {
        let html = Html::parse_document(
            "<html><body><table><tr><td>Cisco ISR4331/K9 Router</td></tr></table></body></html>",
        );
        let path = CategoryPath::new("Routers", "Cisco Routers", "Cisco ISR 4000");
        let context = ListingContext::new(PAGE_URL, 20).with_categories(path.clone());

        let products = parser().extract_table_products(&html, &context);
        assert_eq!(products[0].categories, Some(path));
        assert_eq!(products[0].price, "");
    }

    #[test]
    fn product_links_are_resolved_deduplicated_and_capped() {
        let html = Html::parse_document(
            r#"<html><body>
                <a href="/isr4331-k9-p-101.html">Cisco ISR4331/K9 Router</a>
                <a href="/isr4331-k9-p-101.html">Cisco ISR4331/K9 Router</a>
                <a href="/contact.html">Contact Us</a>
                <a href="/catalog/c9200.html">Details</a>
                <a href="/product/ar6140.html">Huawei AR6140</a>
                <a href="">Cisco Catalyst switch</a>
            </body></html>"#,
        );

        let links = parser().collect_product_links(&html, &ListingContext::new(PAGE_URL, 20));
        assert_eq!(
            links,
            vec![
                "https://www.router-switch.com/isr4331-k9-p-101.html".to_string(),
                "https://www.router-switch.com/catalog/c9200.html".to_string(),
                "https://www.router-switch.com/product/ar6140.html".to_string(),
            ]
        );

        let capped = parser().collect_product_links(&html, &ListingContext::new(PAGE_URL, 2));
        assert_eq!(capped.len(), 2);
    }

    #[test]
    fn text_products_are_priced_from_surrounding_text() {
        let html = Html::parse_document(
            "<html><body><p>Catalyst 9200L access switch</p>\n<p>$2,450</p></body></html>",
        );

        let products = parser().extract_text_products(&html, &ListingContext::new(PAGE_URL, 20));
        assert!(!products.is_empty());
        assert!(products[0].name.starts_with("Catalyst 9200L access switch"));
        assert_eq!(products[0].price, "$2,450");
        assert_eq!(products[0].link, PAGE_URL);
    }

    #[test]
    fn collects_product_images_only() {
        let html = Html::parse_document(
            r#"<html><body>
                <img src="/images/logo.png" alt="Router-Switch">
                <img src="/media/catalog/isr4331.jpg" alt="Cisco ISR4331">
                <img src="/a.gif">
            </body></html>"#,
        );

        let images = parser().collect_images(&html, PAGE_URL);
        assert_eq!(images, vec!["https://www.router-switch.com/media/catalog/isr4331.jpg".to_string()]);
    }

    #[test]
    fn analysis_through_parser_trait() {
        let html = Html::parse_document(
            r#"<html><body><table>
                <tr><td><a href="/isr4331-k9-p-101.html">Cisco ISR4331/K9 Router</a></td><td>$1,299.00</td></tr>
            </table></body></html>"#,
        );

        let analysis = parser()
            .parse_with_context(&html, &ListingContext::new(PAGE_URL, 20))
            .unwrap();
        assert_eq!(analysis.table_products.len(), 1);
        assert_eq!(analysis.product_page_links.len(), 1);
        assert_eq!(analysis.table_products[0].price, "$1,299.00");
    }
}
