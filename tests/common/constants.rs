//! Shared constants for end-to-end tests
//!
//! When the seeded test data changes, update only this file.
#![allow(dead_code)]

// ============================================================================
// Seeded Catalog
// ============================================================================

/// First seeded item, id 1
pub const SEEDED_ITEM_1_ID: i64 = 1;
pub const SEEDED_ITEM_1_NAME: &str = "Jacket";
pub const SEEDED_ITEM_1_CATEGORY: &str = "Fashion";

/// Second seeded item, id 2, shares the category of the first one
pub const SEEDED_ITEM_2_ID: i64 = 2;
pub const SEEDED_ITEM_2_NAME: &str = "Scarf";
pub const SEEDED_ITEM_2_CATEGORY: &str = "Fashion";

/// Number of items seeded into every test catalog
pub const SEEDED_ITEMS_COUNT: usize = 2;

// ============================================================================
// Images
// ============================================================================

/// Smallest byte sequence recognized as a JPEG
pub const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00];

/// Contents of the fallback image served for unknown filenames
pub const DEFAULT_IMAGE_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xDB, b'd', b'e', b'f'];

/// Seeded image for the first item
pub const SEEDED_ITEM_1_IMAGE_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, b'j', b'k', b't'];

/// Seeded image for the second item
pub const SEEDED_ITEM_2_IMAGE_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, b's', b'c', b'f'];

// ============================================================================
// Server
// ============================================================================

/// CORS origin the test server accepts
pub const TEST_FRONT_URL: &str = "http://localhost:3000";

/// Max age the test server advertises for images
pub const TEST_IMAGE_CACHE_AGE_SEC: usize = 120;

/// How long to wait for a spawned server to answer
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Interval between readiness polls
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 10;

/// Per-request timeout of the test client
pub const REQUEST_TIMEOUT_SECS: u64 = 10;
