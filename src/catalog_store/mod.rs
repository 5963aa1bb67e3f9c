mod error;
mod models;
mod schema;
mod store;
mod trait_def;
mod validation;

pub use error::{CatalogStoreError, CatalogStoreResult};
pub use models::*;
pub use schema::CATALOG_VERSIONED_SCHEMAS;
pub use store::{SqliteCatalogStore, DEFAULT_READ_POOL_SIZE};
pub use trait_def::CatalogStore;
pub use validation::{validate_category_name, validate_new_item, ValidationError};
