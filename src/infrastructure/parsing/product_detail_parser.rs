//! Individual product page parser
//!
//! Product pages carry the cleanest name and, more often than listings, a
//! price. Name, price and image are taken from the first selector that
//! produces them, with the page title and page text as fallbacks.

use scraper::{Html, Selector};
use tracing::debug;

use super::config::{ParsingConfig, ProductPageSelectors};
use super::context::ProductPageContext;
use super::{ContextualParser, ParsingError, ParsingResult, compile_selectors, element_text, raw_text, resolve_url, visible_text};
use crate::domain::constants::limits;
use crate::domain::product::RawProduct;
use crate::domain::services::PriceParser;

pub struct ProductPageParser {
    name_selectors: Vec<Selector>,
    title_selectors: Vec<Selector>,
    price_selectors: Vec<Selector>,
    image_selectors: Vec<Selector>,
    prices: PriceParser,
}

impl ProductPageParser {
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&ParsingConfig::default().product_page_selectors)
    }

    pub fn with_config(selectors: &ProductPageSelectors) -> ParsingResult<Self> {
        Ok(Self {
            name_selectors: compile_selectors(&selectors.name)?,
            title_selectors: compile_selectors(&selectors.title)?,
            price_selectors: compile_selectors(&selectors.price)?,
            image_selectors: compile_selectors(&selectors.image)?,
            prices: PriceParser::new()?,
        })
    }

    /// Text of the first element matched by the first selector that matches anything
    fn first_text(html: &Html, selectors: &[Selector]) -> Option<String> {
        selectors
            .iter()
            .find_map(|selector| html.select(selector).next())
            .map(element_text)
    }

    fn extract_name(&self, html: &Html) -> String {
        Self::first_text(html, &self.name_selectors)
            .filter(|name| !name.is_empty())
            .or_else(|| Self::first_text(html, &self.title_selectors))
            .unwrap_or_default()
    }

    fn extract_price(&self, html: &Html) -> Option<String> {
        self.price_selectors
            .iter()
            .filter_map(|selector| html.select(selector).next())
            .find_map(|element| self.prices.extract(&raw_text(element)))
            .or_else(|| self.prices.extract(&visible_text(html)))
    }

    fn extract_image(&self, html: &Html, page_url: &str) -> Option<String> {
        let src = self
            .image_selectors
            .iter()
            .filter_map(|selector| html.select(selector).next())
            .find_map(|img| img.value().attr("src").filter(|src| !src.is_empty()))?;

        match resolve_url(page_url, src) {
            Ok(url) => Some(url),
            Err(e) => {
                debug!("Dropping product image: {}", e);
                None
            }
        }
    }
}

impl ContextualParser for ProductPageParser {
    type Output = RawProduct;
    type Context = ProductPageContext;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output> {
        let name = self.extract_name(html);
        if name.chars().count() <= limits::MIN_PAGE_NAME_CHARS {
            return Err(ParsingError::required_field_missing("product name", Some(&context.page_url)));
        }

        let price = self.extract_price(html);
        let image = self.extract_image(html, &context.page_url);
        debug!(
            "Product page {}: '{}' (price: {})",
            context.page_url,
            name,
            price.as_deref().unwrap_or("none")
        );

        Ok(RawProduct::new(name, context.page_url.as_str())
            .with_price(price)
            .with_image(image)
            .with_categories(context.categories.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::CategoryPath;

    const PAGE_URL: &str = "https://www.router-switch.com/isr4331-k9-p-101.html";

    fn parse(html: &str, context: &ProductPageContext) -> ParsingResult<RawProduct> {
        ProductPageParser::new()
            .unwrap()
            .parse_with_context(&Html::parse_document(html), context)
    }

    #[test]
    fn extracts_name_price_and_image() {
        let html = r#"<html><head><title>ISR4331/K9 - Router-Switch.com</title></head><body>
            <h1>Cisco ISR4331/K9 Integrated Services Router</h1>
            <div class="price-box"><span class="price">US$1,450.00</span></div>
            <div class="product-image"><img src="/media/isr4331.jpg"></div>
        </body></html>"#;

        let product = parse(html, &ProductPageContext::new(PAGE_URL)).unwrap();
        assert_eq!(product.name, "Cisco ISR4331/K9 Integrated Services Router");
        assert_eq!(product.price, "$1,450.00");
        assert_eq!(product.image.as_deref(), Some("https://www.router-switch.com/media/isr4331.jpg"));
        assert_eq!(product.link, PAGE_URL);
        assert_eq!(product.source_url, PAGE_URL);
    }

    #[test]
    fn falls_back_to_title_and_page_text() {
        let html = r#"<html><head><title>Huawei AR6140-16G4XG Router</title></head>
            <body><h1></h1><p>Only $899 today</p></body></html>"#;
        let path = CategoryPath::new("Routers", "Huawei Routers", "Huawei AR6100");
        let context = ProductPageContext::new(PAGE_URL).with_categories(Some(path.clone()));

        let product = parse(html, &context).unwrap();
        assert_eq!(product.name, "Huawei AR6140-16G4XG Router");
        assert_eq!(product.price, "$899");
        assert_eq!(product.image, None);
        assert_eq!(product.categories, Some(path));
    }

    #[test]
    fn short_names_are_rejected() {
        let err = parse("<html><body><h1>ISR</h1></body></html>", &ProductPageContext::new(PAGE_URL)).unwrap_err();
        assert!(matches!(err, ParsingError::RequiredFieldMissing { .. }));
        assert!(err.is_recoverable());
    }
}
