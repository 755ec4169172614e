//! SQLite persistence for film-finder.
//!
//! Provides the catalog schema, a read-only catalog driver that binds
//! parameters natively, the account store and a small demo data set.

pub mod accounts;
pub mod catalog;
pub mod schema;
pub mod seed;

pub use accounts::{AccountError, AccountStore};
pub use catalog::{Catalog, CatalogConnection, CatalogError, SqliteCatalog, SqliteConnection};
pub use schema::{SchemaError, catalog_stats, open_database, open_memory, CatalogStats};
pub use seed::seed_demo;
