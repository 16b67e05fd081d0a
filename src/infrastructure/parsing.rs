//! HTML parsing for router-switch.com pages
//!
//! Trait-based parsers over `scraper::Html`. Parsers return owned data so
//! callers can drop the document before awaiting the next request.

pub mod category_parser;
pub mod config;
pub mod context;
pub mod product_detail_parser;
pub mod product_list_parser;
pub mod text_heuristics;

pub use super::parsing_error::{ParsingError, ParsingResult};
pub use category_parser::CategoryParser;
pub use config::ParsingConfig;
pub use context::{ListingContext, ProductPageContext};
pub use product_detail_parser::ProductPageParser;
pub use product_list_parser::{ListingAnalysis, ProductListParser};
pub use text_heuristics::TextHeuristics;

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

/// Parser trait with context support
pub trait ContextualParser {
    type Output;
    type Context;

    /// Parse HTML with contextual information
    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output>;
}

/// Compile selector strings, skipping broken ones as long as one survives
pub fn compile_selectors(selector_strings: &[String]) -> ParsingResult<Vec<Selector>> {
    let mut selectors = Vec::new();
    let mut errors = Vec::new();

    for selector_str in selector_strings {
        match Selector::parse(selector_str) {
            Ok(selector) => selectors.push(selector),
            Err(e) => {
                warn!("Failed to compile selector '{}': {}", selector_str, e);
                errors.push(format!("'{selector_str}': {e}"));
            }
        }
    }

    if selectors.is_empty() {
        return Err(ParsingError::invalid_selector(
            &selector_strings.join(", "),
            format!("no valid selectors compiled ({})", errors.join(", ")),
        ));
    }

    if !errors.is_empty() {
        debug!("Some selectors failed to compile: {}", errors.join(", "));
    }

    Ok(selectors)
}

/// Trimmed text nodes of an element joined by single spaces
pub fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Raw text of an element, whitespace untouched
pub fn raw_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

const HIDDEN_ELEMENTS: [&str; 3] = ["script", "style", "noscript"];

/// Document text as a reader would see it
pub fn visible_text(document: &Html) -> String {
    let mut text = String::new();
    for node in document.root_element().descendants() {
        let Some(fragment) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
        });
        if !hidden {
            text.push_str(fragment);
        }
    }
    text
}

/// Resolve a possibly relative link against the page it appeared on
pub fn resolve_url(base: &str, href: &str) -> ParsingResult<String> {
    let base_url = Url::parse(base)
        .map_err(|e| ParsingError::url_resolution_failed(href, e, Some(base)))?;
    base_url
        .join(href.trim())
        .map(|url| url.to_string())
        .map_err(|e| ParsingError::url_resolution_failed(href, e, Some(base)))
}
