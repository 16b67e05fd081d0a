//! Offline extraction throughput
//!
//! Measures the listing pipeline on a saved category page and on a
//! synthetic page with many table rows.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use router_switch_scraper_lib::application::ListingPipeline;
use router_switch_scraper_lib::infrastructure::ListingContext;

const PAGE_URL: &str = "https://www.router-switch.com/routers-price.html";

fn synthetic_listing(rows: usize) -> String {
    let mut html = String::from("<html><body><table>");
    for i in 0..rows {
        html.push_str(&format!(
            "<tr><td><a href=\"/isr{i}-k9-p-{i}.html\">Cisco ISR{i}/K9 Router</a></td><td>${},{:03}.00</td></tr>",
            1 + i % 9,
            i % 1000
        ));
    }
    html.push_str("</table></body></html>");
    html
}

fn extraction_benchmark(c: &mut Criterion) {
    let pipeline = ListingPipeline::new(false).expect("pipeline builds");
    let context = ListingContext::new(PAGE_URL, 20);

    let saved = include_str!("../tests/fixtures/price_listing.html");
    c.bench_function("process_offline_saved_page", |b| {
        b.iter(|| pipeline.process_offline(black_box(saved), &context));
    });

    let mut group = c.benchmark_group("process_offline_table_rows");
    for rows in [10, 100, 500] {
        let html = synthetic_listing(rows);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &html, |b, html| {
            b.iter(|| pipeline.process_offline(black_box(html), &context));
        });
    }
    group.finish();
}

criterion_group!(benches, extraction_benchmark);
criterion_main!(benches);
