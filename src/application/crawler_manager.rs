//! Catalog crawler
//!
//! Drives the crawl modes over a [`PageFetcher`]:
//!
//! - hierarchy: the six root categories, their subcategories and product types
//! - comprehensive: discovered main categories down to product types, with
//!   products scraped at the deepest level that exists
//! - price: the six root listing pages, aiming for priced records
//! - combined: hierarchy followed by comprehensive
//!
//! Pages are fetched one at a time; a page that cannot be fetched is logged
//! and skipped.

use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::application::dto::{CrawlMode, CrawlOutcome};
use crate::application::listing_pipeline::ListingPipeline;
use crate::application::progress::ProgressTracker;
use crate::domain::category::{CategoryLink, CategoryPath, HierarchyRow, RootCategory};
use crate::domain::product::ProductRecord;
use crate::domain::services::{CleaningReport, FetchedPage, PageFetcher};
use crate::infrastructure::config::ScraperConfig;
use crate::infrastructure::parsing::{ListingContext, ProductPageContext};

pub struct CatalogCrawler {
    fetcher: Arc<dyn PageFetcher>,
    pipeline: ListingPipeline,
    config: ScraperConfig,
}

impl CatalogCrawler {
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: ScraperConfig) -> Result<Self> {
        Ok(Self {
            fetcher,
            pipeline: ListingPipeline::new(config.strict_validation)?,
            config,
        })
    }

    /// Run one crawl mode to completion
    pub async fn run(&self, mode: CrawlMode) -> CrawlOutcome {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let mut tracker = ProgressTracker::new(Duration::from_secs(self.config.progress_interval_secs));
        info!("🚀 Starting {} crawl (run {})", mode, run_id);

        let (hierarchy, (products, cleaning)) = match mode {
            CrawlMode::Hierarchy => (self.crawl_hierarchy(&mut tracker).await, (Vec::new(), CleaningReport::default())),
            CrawlMode::Comprehensive => (
                Vec::new(),
                self.crawl_comprehensive(self.config.max_products_per_category, &mut tracker)
                    .await,
            ),
            CrawlMode::Price => (Vec::new(), self.crawl_price_focused(&mut tracker).await),
            CrawlMode::Combined => {
                let hierarchy = self.crawl_hierarchy(&mut tracker).await;
                let products = self
                    .crawl_comprehensive(self.config.combined_products_per_category, &mut tracker)
                    .await;
                (hierarchy, products)
            }
        };

        let stats = tracker.final_stats();
        info!(
            "✅ {} crawl finished: {} hierarchy rows, {} products ({} dropped in cleaning), {} requests failed",
            mode,
            hierarchy.len(),
            products.len(),
            cleaning.dropped(),
            stats.failed_requests
        );

        CrawlOutcome {
            run_id,
            mode,
            started_at,
            finished_at: Utc::now(),
            hierarchy,
            products,
            stats,
            cleaning,
        }
    }

    async fn fetch(&self, url: &str, tracker: &mut ProgressTracker) -> Option<FetchedPage> {
        match self.fetcher.fetch_page(url).await {
            Ok(page) => {
                tracker.record_success(page.attempts);
                Some(page)
            }
            Err(e) => {
                tracker.record_failure(e.attempts());
                warn!("Failed to fetch {}: {}", url, e);
                None
            }
        }
    }

    async fn subcategories_of(
        &self,
        url: &str,
        name: &str,
        tracker: &mut ProgressTracker,
    ) -> (Option<FetchedPage>, Vec<CategoryLink>) {
        let Some(page) = self.fetch(url, tracker).await else {
            return (None, Vec::new());
        };
        let subcategories = self.pipeline.discover_subcategories(&page.body, url, name);
        (Some(page), subcategories)
    }

    async fn product_types_of(
        &self,
        sub: &CategoryLink,
        grandparent: &str,
        tracker: &mut ProgressTracker,
    ) -> (Option<FetchedPage>, Vec<CategoryLink>) {
        let Some(page) = self.fetch(&sub.url, tracker).await else {
            return (None, Vec::new());
        };
        let product_types = self
            .pipeline
            .discover_product_types(&page.body, &sub.url, &sub.name, grandparent);
        (Some(page), product_types)
    }

    /// Category 1 > 2 > 3 rows under the fixed roots
    pub async fn crawl_hierarchy(&self, tracker: &mut ProgressTracker) -> Vec<HierarchyRow> {
        let roots = RootCategory::fixed_roots(&self.config.base_url);
        tracker.add_categories(roots.len());
        let mut rows = Vec::new();

        for root in &roots {
            info!("Category 1: {} -> {}", root.name, root.url);
            let (_, subcategories) = self.subcategories_of(&root.url, &root.name, tracker).await;

            if subcategories.is_empty() {
                rows.push(HierarchyRow::root_only(root));
                tracker.category_completed();
                continue;
            }

            for sub in &subcategories {
                rows.push(HierarchyRow::subcategory(&root.name, sub));
                let (_, product_types) = self.product_types_of(sub, &root.name, tracker).await;
                rows.extend(
                    product_types
                        .iter()
                        .map(|product_type| HierarchyRow::product_type(&root.name, &sub.name, product_type)),
                );
            }
            tracker.category_completed();
        }

        info!("Hierarchy rows collected: {}", rows.len());
        rows
    }

    /// Main categories down to product types, products scraped at the deepest level
    pub async fn crawl_comprehensive(
        &self,
        max_products_per_category: usize,
        tracker: &mut ProgressTracker,
    ) -> (Vec<ProductRecord>, CleaningReport) {
        let base_url = self.config.base_url.as_str();
        let Some(home) = self.fetch(base_url, tracker).await else {
            warn!("Home page unavailable, no categories to crawl");
            return (Vec::new(), CleaningReport::default());
        };
        let main_categories = self.pipeline.discover_main_categories(&home.body, base_url);
        if main_categories.is_empty() {
            warn!("No main categories found");
            return (Vec::new(), CleaningReport::default());
        }

        let budget = max_products_per_category.saturating_mul(main_categories.len());
        info!("Found {} main categories (product budget {})", main_categories.len(), budget);
        tracker.add_categories(main_categories.len());
        let link_limit = self.config.category_link_limit;
        let mut products = Vec::new();

        for (i, main) in main_categories.iter().enumerate() {
            if products.len() >= budget {
                break;
            }
            info!("Processing main category {}/{}: {}", i + 1, main_categories.len(), main.name);

            let (main_page, subcategories) = self.subcategories_of(&main.url, &main.name, tracker).await;
            if subcategories.is_empty() {
                if let Some(page) = main_page {
                    debug!("No subcategories for {}, scraping directly", main.name);
                    let path = CategoryPath::new(&main.name, &main.name, &main.name);
                    products.extend(self.scrape_listing(&main.url, &page.body, Some(path), link_limit, tracker).await);
                }
                tracker.category_completed();
                continue;
            }

            for sub in &subcategories {
                if products.len() >= budget {
                    break;
                }

                let (sub_page, product_types) = self.product_types_of(sub, &main.name, tracker).await;
                if product_types.is_empty() {
                    if let Some(page) = sub_page {
                        debug!("No product types for {}, scraping directly", sub.name);
                        let path = CategoryPath::new(&main.name, &sub.name, &sub.name);
                        products.extend(self.scrape_listing(&sub.url, &page.body, Some(path), link_limit, tracker).await);
                    }
                    continue;
                }

                for product_type in &product_types {
                    if products.len() >= budget {
                        break;
                    }
                    let path = CategoryPath::new(&main.name, &sub.name, &product_type.name);
                    products.extend(
                        self.scrape_category_page(&product_type.url, Some(path), link_limit, tracker)
                            .await,
                    );
                }
            }
            tracker.category_completed();
        }

        self.pipeline.clean(products)
    }

    /// The fixed root listings until the price mode budget is reached
    pub async fn crawl_price_focused(&self, tracker: &mut ProgressTracker) -> (Vec<ProductRecord>, CleaningReport) {
        let roots = RootCategory::fixed_roots(&self.config.base_url);
        tracker.add_categories(roots.len());
        let max_products = self.config.price_mode_max_products;
        let mut products = Vec::new();

        for (i, root) in roots.iter().enumerate() {
            if products.len() >= max_products {
                break;
            }
            info!("Category {}/{}: {}", i + 1, roots.len(), root.url);

            let found = self
                .scrape_category_page(&root.url, None, self.config.price_link_limit, tracker)
                .await;
            let with_prices = found.iter().filter(|p| p.has_price()).count();
            info!("  Extracted {} products ({} with prices)", found.len(), with_prices);
            products.extend(found);
            tracker.category_completed();
        }

        self.pipeline.clean(products)
    }

    /// Fetch a listing page and scrape it
    pub async fn scrape_category_page(
        &self,
        url: &str,
        categories: Option<CategoryPath>,
        link_limit: usize,
        tracker: &mut ProgressTracker,
    ) -> Vec<ProductRecord> {
        let Some(page) = self.fetch(url, tracker).await else {
            return Vec::new();
        };
        self.scrape_listing(url, &page.body, categories, link_limit, tracker).await
    }

    /// Run the listing strategies over a fetched page, following product page links
    async fn scrape_listing(
        &self,
        url: &str,
        body: &str,
        categories: Option<CategoryPath>,
        link_limit: usize,
        tracker: &mut ProgressTracker,
    ) -> Vec<ProductRecord> {
        let mut context = ListingContext::new(url, link_limit);
        if let Some(path) = categories {
            context = context.with_categories(path);
        }
        let analysis = self.pipeline.analyze_listing(body, &context);

        let mut page_products = Vec::new();
        for link in &analysis.product_page_links {
            let Some(product_page) = self.fetch(link, tracker).await else {
                continue;
            };
            let page_context = ProductPageContext::new(link.as_str()).with_categories(context.categories.clone());
            match self.pipeline.parse_product_page(&product_page.body, &page_context) {
                Ok(product) => page_products.push(product),
                Err(e) => debug!("No product on {}: {}", link, e),
            }
        }

        let records = self.pipeline.assemble(analysis, page_products);
        debug!("Found {} products on {}", records.len(), url);
        tracker.add_products(records.len());
        tracker.maybe_report();
        records
    }
}
