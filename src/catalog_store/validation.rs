//! Validation for catalog input.
//!
//! Runs before anything touches the database so that malformed requests
//! surface as client errors instead of constraint failures.

use crate::images::is_content_derived_name;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyField { field: &'static str },
    InvalidImageFilename { filename: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyField { field } => {
                write!(f, "Field '{}' is required but was empty", field)
            }
            ValidationError::InvalidImageFilename { filename } => {
                write!(f, "'{}' is not a content-derived image filename", filename)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult<T> = Result<T, ValidationError>;

fn require_non_empty(field: &'static str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(())
}

pub fn validate_category_name(name: &str) -> ValidationResult<()> {
    require_non_empty("category", name)
}

/// Validate the fields of an item about to be inserted.
pub fn validate_new_item(name: &str, image_filename: &str) -> ValidationResult<()> {
    require_non_empty("name", name)?;
    require_non_empty("image", image_filename)?;
    if !is_content_derived_name(image_filename) {
        return Err(ValidationError::InvalidImageFilename {
            filename: image_filename.to_string(),
        });
    }
    Ok(())
}
