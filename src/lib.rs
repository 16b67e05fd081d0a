//! router-switch.com catalog scraper
//!
//! Fetches category and product pages, extracts product candidates from
//! tables, product page links and free text, then normalizes them into
//! records with brand, SKU, price and a three-level category path.

pub mod application;
pub mod domain;
pub mod infrastructure;
