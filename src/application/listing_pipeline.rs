//! Listing pipeline: HTML in, normalized and cleaned records out
//!
//! Owns the parsers, the normalizer and the cleaner. Every method takes the
//! raw HTML string and parses it locally, so no `scraper::Html` outlives a
//! call and async callers stay `Send`.

use anyhow::{Context, Result};
use scraper::Html;

use crate::domain::category::CategoryLink;
use crate::domain::product::{ProductRecord, RawProduct};
use crate::domain::services::{CleaningReport, ProductCleaner, ProductNormalizer};
use crate::infrastructure::parsing::{
    CategoryParser, ContextualParser, ListingAnalysis, ListingContext, ParsingResult, ProductListParser,
    ProductPageContext, ProductPageParser,
};

pub struct ListingPipeline {
    list_parser: ProductListParser,
    page_parser: ProductPageParser,
    category_parser: CategoryParser,
    normalizer: ProductNormalizer,
    cleaner: ProductCleaner,
}

impl ListingPipeline {
    pub fn new(strict_validation: bool) -> Result<Self> {
        Ok(Self {
            list_parser: ProductListParser::new().context("Failed to build listing parser")?,
            page_parser: ProductPageParser::new().context("Failed to build product page parser")?,
            category_parser: CategoryParser::new().context("Failed to build category parser")?,
            normalizer: ProductNormalizer::new().context("Failed to compile product patterns")?,
            cleaner: ProductCleaner::new(strict_validation),
        })
    }

    /// Tables, product page links, text mentions and images of a listing page
    pub fn analyze_listing(&self, html: &str, context: &ListingContext) -> ListingAnalysis {
        let document = Html::parse_document(html);
        self.list_parser.analyze(&document, context)
    }

    pub fn parse_product_page(&self, html: &str, context: &ProductPageContext) -> ParsingResult<RawProduct> {
        let document = Html::parse_document(html);
        self.page_parser.parse_with_context(&document, context)
    }

    /// Combine a page's candidates into records
    ///
    /// Order is table products, product page products, then text products.
    /// Listing images are handed out round-robin to records that have none.
    pub fn assemble(&self, analysis: ListingAnalysis, page_products: Vec<RawProduct>) -> Vec<ProductRecord> {
        let ListingAnalysis {
            table_products,
            text_products,
            images,
            ..
        } = analysis;

        let mut records: Vec<ProductRecord> = table_products
            .into_iter()
            .chain(page_products)
            .chain(text_products)
            .map(|raw| self.normalizer.build(raw))
            .collect();

        if !images.is_empty() {
            for (i, record) in records.iter_mut().enumerate() {
                if !record.has_image() {
                    record.image.clone_from(&images[i % images.len()]);
                }
            }
        }

        records
    }

    pub fn clean(&self, products: Vec<ProductRecord>) -> (Vec<ProductRecord>, CleaningReport) {
        self.cleaner.clean(products)
    }

    /// Extract, normalize and clean one saved listing page without any requests
    pub fn process_offline(&self, html: &str, context: &ListingContext) -> (Vec<ProductRecord>, CleaningReport) {
        let analysis = self.analyze_listing(html, context);
        let records = self.assemble(analysis, Vec::new());
        self.clean(records)
    }

    pub fn discover_main_categories(&self, html: &str, base_url: &str) -> Vec<CategoryLink> {
        let document = Html::parse_document(html);
        self.category_parser.discover_main_categories(&document, base_url)
    }

    pub fn discover_subcategories(&self, html: &str, page_url: &str, parent: &str) -> Vec<CategoryLink> {
        let document = Html::parse_document(html);
        self.category_parser.discover_subcategories(&document, page_url, parent)
    }

    pub fn discover_product_types(
        &self,
        html: &str,
        page_url: &str,
        parent: &str,
        grandparent: &str,
    ) -> Vec<CategoryLink> {
        let document = Html::parse_document(html);
        self.category_parser
            .discover_product_types(&document, page_url, parent, grandparent)
    }
}
