#![warn(clippy::all, missing_docs)]

//! Core domain logic for Game Explorer.
//!
//! This crate hosts the catalog model and generator, the query helpers,
//! configuration handling, and the favorites persistence layer used by the
//! terminal UI and any future frontends.

pub mod catalog;
pub mod config;
pub mod favorites;
pub mod models;
pub mod storage;

pub use catalog::{Catalog, GeneratorOptions, SaleModel};
pub use config::AppConfig;
pub use favorites::{FavoritesSet, FavoritesStore};
pub use models::GameRecord;
pub use storage::{FileStore, KeyValueStore, MemoryStore, StoreError};
