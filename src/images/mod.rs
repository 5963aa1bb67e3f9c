mod image_store;
mod namer;

pub use image_store::{validate_image_filename, ImageStore, ImageStoreError, DEFAULT_IMAGE_FILENAME};
pub use namer::{derive_image_name, is_content_derived_name, IMAGE_EXTENSION};
