//! Test fixture creation for the catalog database and image directory

use super::constants::*;
use anyhow::Result;
use item_catalog_server::catalog_store::{CatalogStore, SqliteCatalogStore};
use item_catalog_server::images::{derive_image_name, DEFAULT_IMAGE_FILENAME};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Creates a temporary catalog with two items in one category and their images,
/// plus the fallback image.
/// Returns (temp_dir, db_path, images_dir)
pub fn create_test_catalog() -> Result<(TempDir, PathBuf, PathBuf)> {
    let dir = TempDir::new()?;

    let images_dir = dir.path().join("images");
    fs::create_dir_all(&images_dir)?;
    fs::write(images_dir.join(DEFAULT_IMAGE_FILENAME), DEFAULT_IMAGE_BYTES)?;

    let db_path = dir.path().join("catalog.sqlite3");
    let store = SqliteCatalogStore::new(&db_path, 1)?;

    for (name, category, image_bytes) in [
        (
            SEEDED_ITEM_1_NAME,
            SEEDED_ITEM_1_CATEGORY,
            SEEDED_ITEM_1_IMAGE_BYTES,
        ),
        (
            SEEDED_ITEM_2_NAME,
            SEEDED_ITEM_2_CATEGORY,
            SEEDED_ITEM_2_IMAGE_BYTES,
        ),
    ] {
        let image = derive_image_name(image_bytes);
        fs::write(images_dir.join(&image), image_bytes)?;
        store.add_item(name, category, &image)?;
    }

    Ok((dir, db_path, images_dir))
}
