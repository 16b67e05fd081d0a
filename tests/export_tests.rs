//! Result files written for each crawl mode
use chrono::Utc;
use serde_json::Value;
use tempfile::tempdir;
use uuid::Uuid;

use router_switch_scraper_lib::application::{CrawlMode, CrawlOutcome, ProgressStats, ResultWriter};
use router_switch_scraper_lib::domain::category::HierarchyRow;
use router_switch_scraper_lib::domain::product::{ProductRecord, RawProduct};
use router_switch_scraper_lib::domain::services::{CleaningReport, ProductNormalizer};

const TS: &str = "20260101_120000";

fn product(name: &str) -> ProductRecord {
    ProductNormalizer::new().unwrap().build(
        RawProduct::new(name, "https://www.router-switch.com/routers-price.html")
            .with_price(Some("$1,299.00".to_string())),
    )
}

fn hierarchy_row() -> HierarchyRow {
    HierarchyRow {
        category1: "Routers".to_string(),
        category2: "Cisco Routers".to_string(),
        category3: String::new(),
        url: "https://www.router-switch.com/cisco-routers.html".to_string(),
    }
}

fn outcome(mode: CrawlMode, hierarchy: Vec<HierarchyRow>, products: Vec<ProductRecord>) -> CrawlOutcome {
    CrawlOutcome {
        run_id: Uuid::new_v4(),
        mode,
        started_at: Utc::now(),
        finished_at: Utc::now(),
        hierarchy,
        products,
        stats: ProgressStats::default(),
        cleaning: CleaningReport::default(),
    }
}

fn read_json(path: &std::path::Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn comprehensive_products_file_uses_export_field_names() {
    let dir = tempdir().unwrap();
    let writer = ResultWriter::new(dir.path().join("out"), true);
    let run = outcome(CrawlMode::Comprehensive, Vec::new(), vec![product("Cisco ISR4331/K9 Router")]);

    let written = writer.write_outcome_at(&run, TS).await.unwrap();

    assert_eq!(written, vec![dir.path().join("out").join(format!("comprehensive_products_{TS}.json"))]);
    let json = read_json(&written[0]);
    let first = &json.as_array().unwrap()[0];
    assert_eq!(first["product"], "Cisco ISR4331/K9 Router");
    assert_eq!(first["SKU"], "ISR4331");
    assert_eq!(first["Brand"], "Cisco");
    assert_eq!(first["price"], "$1,299.00");
    assert!(first.get("category 1").is_some());
    assert!(first.get("Product Link").is_some());
}

#[tokio::test]
async fn price_mode_file_name() {
    let dir = tempdir().unwrap();
    let writer = ResultWriter::new(dir.path(), false);
    let run = outcome(CrawlMode::Price, Vec::new(), vec![product("Juniper MX204 Router")]);

    let written = writer.write_outcome_at(&run, TS).await.unwrap();
    assert_eq!(written, vec![dir.path().join(format!("price_products_{TS}.json"))]);
}

#[tokio::test]
async fn hierarchy_file_holds_rows() {
    let dir = tempdir().unwrap();
    let writer = ResultWriter::new(dir.path(), true);
    let run = outcome(CrawlMode::Hierarchy, vec![hierarchy_row()], Vec::new());

    let written = writer.write_outcome_at(&run, TS).await.unwrap();

    assert_eq!(written, vec![dir.path().join(format!("category_hierarchy_{TS}.json"))]);
    let json = read_json(&written[0]);
    assert_eq!(json[0]["category 1"], "Routers");
    assert_eq!(json[0]["category 2"], "Cisco Routers");
    assert_eq!(json[0]["category 3"], "");
}

#[tokio::test]
async fn combined_file_has_both_sections() {
    let dir = tempdir().unwrap();
    let writer = ResultWriter::new(dir.path(), true);
    let run = outcome(
        CrawlMode::Combined,
        vec![hierarchy_row()],
        vec![product("Cisco ISR4331/K9 Router")],
    );

    let written = writer.write_outcome_at(&run, TS).await.unwrap();

    assert_eq!(written, vec![dir.path().join(format!("combined_{TS}.json"))]);
    let json = read_json(&written[0]);
    assert_eq!(json["hierarchy"].as_array().unwrap().len(), 1);
    assert_eq!(json["products"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn empty_results_write_nothing() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("never-created");
    let writer = ResultWriter::new(&out, true);

    for mode in [CrawlMode::Comprehensive, CrawlMode::Price, CrawlMode::Hierarchy, CrawlMode::Combined] {
        let written = writer.write_outcome_at(&outcome(mode, Vec::new(), Vec::new()), TS).await.unwrap();
        assert!(written.is_empty());
    }
    assert!(!out.exists());
}

#[test]
fn timestamp_has_file_name_shape() {
    let ts = ResultWriter::timestamp();
    assert_eq!(ts.len(), 15);
    assert_eq!(ts.as_bytes()[8], b'_');
    assert!(ts.chars().filter(|c| *c != '_').all(|c| c.is_ascii_digit()));
}
