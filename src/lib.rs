//! Item catalog server library
//!
//! Exposes the internal modules for the binary and the integration tests.

pub mod catalog_store;
pub mod config;
pub mod images;
pub mod server;
pub mod sqlite_persistence;

// Re-export commonly used types for convenience
pub use catalog_store::{CatalogStore, SqliteCatalogStore};
pub use images::ImageStore;
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerConfig};
