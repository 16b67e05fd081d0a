//! router-switch-scraper command line

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use router_switch_scraper_lib::application::{
    CatalogCrawler, CrawlMode, ListingPipeline, ResultWriter, RunSummary,
};
use router_switch_scraper_lib::domain::category::CategoryPath;
use router_switch_scraper_lib::infrastructure::{
    AppConfig, ConfigManager, HttpClient, ListingContext, init_logging_with_config,
};

#[derive(Parser, Debug)]
#[command(name = "router-switch-scraper", version)]
#[command(about = "Product catalog scraper for router-switch.com", long_about = None)]
struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for result files
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Debug level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl the live site
    Crawl {
        #[arg(long, value_enum, default_value_t = CrawlMode::Comprehensive)]
        mode: CrawlMode,

        /// Product budget: per main category, or in total for the price mode
        #[arg(long)]
        max_products: Option<usize>,
    },
    /// Extract products from a saved listing page without network access
    Parse {
        file: PathBuf,

        /// URL the page was saved from; links resolve against it
        #[arg(long)]
        source_url: String,

        /// Category path for every record found
        #[arg(long, num_args = 3, value_names = ["LEVEL1", "LEVEL2", "LEVEL3"])]
        category: Option<Vec<String>>,

        /// Also write the records to the output directory
        #[arg(long)]
        save: bool,
    },
    /// Inspect or reset the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the effective configuration as JSON
    Show,
    /// Print the configuration file location
    Path,
    /// Overwrite the configuration file with defaults
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let manager = match &cli.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new()?,
    };

    if let Command::Config { action } = &cli.command {
        return run_config_command(&manager, action).await;
    }

    let mut config = manager.load_config().await?;
    apply_overrides(&mut config, &cli);
    init_logging_with_config(&config.logging)?;
    info!("🔧 Configuration: {}", manager.config_path().display());

    match cli.command {
        Command::Crawl { mode, max_products } => run_crawl(config, mode, max_products).await,
        Command::Parse {
            file,
            source_url,
            category,
            save,
        } => run_parse(&config, &file, &source_url, category, save).await,
        Command::Config { .. } => Ok(()),
    }
}

fn apply_overrides(config: &mut AppConfig, cli: &Cli) {
    if let Some(dir) = &cli.output_dir {
        config.output.directory.clone_from(dir);
    }
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
}

async fn run_config_command(manager: &ConfigManager, action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = manager.load_config().await?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Path => println!("{}", manager.config_path().display()),
        ConfigAction::Reset => {
            manager.reset_to_defaults().await?;
            println!("Configuration reset: {}", manager.config_path().display());
        }
    }
    Ok(())
}

async fn run_crawl(mut config: AppConfig, mode: CrawlMode, max_products: Option<usize>) -> Result<()> {
    if let Some(limit) = max_products {
        if limit == 0 {
            bail!("--max-products must be positive");
        }
        match mode {
            CrawlMode::Price => config.scraper.price_mode_max_products = limit,
            CrawlMode::Combined => config.scraper.combined_products_per_category = limit,
            CrawlMode::Comprehensive | CrawlMode::Hierarchy => config.scraper.max_products_per_category = limit,
        }
    }

    let client = HttpClient::from_http_config(&config.http).context("Failed to build HTTP client")?;
    let crawler = CatalogCrawler::new(Arc::new(client), config.scraper.clone())?;

    let outcome = tokio::select! {
        outcome = crawler.run(mode) => outcome,
        _ = tokio::signal::ctrl_c() => {
            warn!("🛑 Interrupted, no results written");
            return Ok(());
        }
    };

    if mode.collects_products() {
        RunSummary::from_products(&outcome.products).log();
    }
    info!(
        "Requests: {} ok, {} failed, {} retries ({:.1}% success) in {:.0}s",
        outcome.stats.successful_requests,
        outcome.stats.failed_requests,
        outcome.stats.retries,
        outcome.stats.success_rate,
        outcome.stats.elapsed_secs
    );

    if outcome.is_empty() {
        warn!("Crawl produced no results");
        return Ok(());
    }

    let writer = ResultWriter::new(&config.output.directory, config.output.pretty_json);
    for path in writer.write_outcome(&outcome).await? {
        println!("{}", path.display());
    }
    Ok(())
}

async fn run_parse(
    config: &AppConfig,
    file: &Path,
    source_url: &str,
    category: Option<Vec<String>>,
    save: bool,
) -> Result<()> {
    let html = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let mut context = ListingContext::new(source_url, config.scraper.category_link_limit);
    if let Some([level1, level2, level3]) = category.as_deref() {
        context = context.with_categories(CategoryPath::new(level1, level2, level3));
    }

    let pipeline = ListingPipeline::new(config.scraper.strict_validation)?;
    let (records, report) = pipeline.process_offline(&html, &context);
    info!(
        "Parsed {}: {} candidates, {} kept, {} dropped",
        file.display(),
        report.input,
        report.kept,
        report.dropped()
    );
    RunSummary::from_products(&records).log();

    println!("{}", serde_json::to_string_pretty(&records)?);

    if save {
        let writer = ResultWriter::new(&config.output.directory, config.output.pretty_json);
        if let Some(path) = writer
            .write_products("parsed", &records, &ResultWriter::timestamp())
            .await?
        {
            info!("💾 Parsed records written to {}", path.display());
        }
    }
    Ok(())
}
