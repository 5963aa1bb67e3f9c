//! Content-addressed naming for uploaded images.
//!
//! The stored name is always derived from the image bytes, never from the
//! name the client uploaded the file with, so identical content maps to the
//! same file whatever it was called.

use sha2::{Digest, Sha256};

/// Extension appended to every stored image name.
pub const IMAGE_EXTENSION: &str = "jpg";

/// Length of a lowercase hex SHA-256 digest.
const DIGEST_HEX_LEN: usize = 64;

/// Returns `hex(sha256(bytes)) + ".jpg"`.
pub fn derive_image_name(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    format!("{:x}.{}", digest, IMAGE_EXTENSION)
}

/// Whether `filename` has the shape produced by [`derive_image_name`].
pub fn is_content_derived_name(filename: &str) -> bool {
    let Some(stem) = filename
        .strip_suffix(IMAGE_EXTENSION)
        .and_then(|s| s.strip_suffix('.'))
    else {
        return false;
    };
    stem.len() == DIGEST_HEX_LEN
        && stem
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}
