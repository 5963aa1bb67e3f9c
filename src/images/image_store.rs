//! On-disk image directory.

use super::namer::{derive_image_name, IMAGE_EXTENSION};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info};

/// Served in place of any image that is missing from the directory.
pub const DEFAULT_IMAGE_FILENAME: &str = "default.jpg";

#[derive(Debug, Error)]
pub enum ImageStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid image filename: {0}")]
    InvalidFilename(String),

    #[error("Image not found: {0}")]
    NotFound(String),

    #[error("No image data provided")]
    EmptyImage,
}

#[derive(Clone, Debug)]
pub struct ImageStore {
    images_dir: PathBuf,
}

/// Accepts plain `*.jpg` names that stay inside the images directory.
pub fn validate_image_filename(filename: &str) -> Result<(), ImageStoreError> {
    let has_extension = filename
        .rsplit_once('.')
        .is_some_and(|(stem, ext)| !stem.is_empty() && ext == IMAGE_EXTENSION);
    if !has_extension || filename.contains(['/', '\\']) || filename.contains("..") {
        return Err(ImageStoreError::InvalidFilename(filename.to_string()));
    }
    Ok(())
}

impl ImageStore {
    pub fn new(images_dir: impl Into<PathBuf>) -> Self {
        Self {
            images_dir: images_dir.into(),
        }
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    /// Creates the images directory if needed.
    pub async fn init(&self) -> Result<(), ImageStoreError> {
        fs::create_dir_all(&self.images_dir).await?;
        if !fs::try_exists(self.images_dir.join(DEFAULT_IMAGE_FILENAME)).await? {
            info!(
                "No {} in {:?}, missing images will be reported as not found",
                DEFAULT_IMAGE_FILENAME, self.images_dir
            );
        }
        Ok(())
    }

    /// Stores `data` under its content-derived name and returns that name.
    ///
    /// Identical content is written only once.
    pub async fn save(&self, data: &[u8]) -> Result<String, ImageStoreError> {
        if data.is_empty() {
            return Err(ImageStoreError::EmptyImage);
        }

        let filename = derive_image_name(data);
        let path = self.images_dir.join(&filename);
        if fs::try_exists(&path).await? {
            debug!("Image {} already stored", filename);
            return Ok(filename);
        }

        let size = data.len();
        let images_dir = self.images_dir.clone();
        let data = data.to_vec();
        tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            let mut tmp = tempfile::NamedTempFile::new_in(&images_dir)?;
            tmp.write_all(&data)?;
            tmp.persist(&path).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(std::io::Error::other)??;

        debug!("Stored image {} ({} bytes)", filename, size);
        Ok(filename)
    }

    /// Path of the file to serve for `filename`, falling back to the default image.
    pub async fn resolve(&self, filename: &str) -> Result<PathBuf, ImageStoreError> {
        validate_image_filename(filename)?;

        let path = self.images_dir.join(filename);
        if fs::try_exists(&path).await? {
            return Ok(path);
        }

        debug!("Image not found: {:?}", path);
        let default_path = self.images_dir.join(DEFAULT_IMAGE_FILENAME);
        if fs::try_exists(&default_path).await? {
            return Ok(default_path);
        }
        Err(ImageStoreError::NotFound(filename.to_string()))
    }

    /// Reads the bytes to serve for `filename`.
    pub async fn read(&self, filename: &str) -> Result<Vec<u8>, ImageStoreError> {
        let path = self.resolve(filename).await?;
        Ok(fs::read(path).await?)
    }
}
