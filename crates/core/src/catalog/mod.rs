//! Catalog generation and querying.

/// Deduplication and field derivation.
pub mod generator;
/// Stable filters over generated records.
pub mod query;
/// Built-in mock data and lookup tables.
pub mod source;

pub use generator::{
    fetch_catalog, generate_catalog, generate_from, Catalog, GeneratorOptions, SaleModel,
};
pub use source::RawEntry;
