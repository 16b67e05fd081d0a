//! Domain module - Core business logic and entities
//!
//! Product and category types, site constants, and the services that
//! turn extracted text into normalized product records.

pub mod category;
pub mod constants;
pub mod product;
pub mod services;

pub use category::{CategoryLevel, CategoryLink, CategoryPath, HierarchyRow, RootCategory};
pub use product::{ProductRecord, RawProduct};
