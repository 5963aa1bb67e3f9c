//! HTTP client for end-to-end tests
//!
//! Wraps reqwest with one method per catalog endpoint.
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::multipart::{Form, Part};
use reqwest::Response;
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

#[allow(dead_code)]
impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    /// GET /
    pub async fn home(&self) -> Response {
        self.client
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .expect("Home request failed")
    }

    // ========================================================================
    // Items
    // ========================================================================

    /// GET /items
    pub async fn get_items(&self) -> Response {
        self.client
            .get(format!("{}/items", self.base_url))
            .send()
            .await
            .expect("Get items request failed")
    }

    /// GET /items/{id}, with the id passed through verbatim
    pub async fn get_item(&self, id: impl std::fmt::Display) -> Response {
        self.client
            .get(format!("{}/items/{}", self.base_url, id))
            .send()
            .await
            .expect("Get item request failed")
    }

    /// POST /items with all three form fields
    pub async fn add_item(&self, name: &str, category: &str, image: &[u8]) -> Response {
        let form = Form::new()
            .text("name", name.to_string())
            .text("category", category.to_string())
            .part(
                "image",
                Part::bytes(image.to_vec())
                    .file_name("upload.jpg")
                    .mime_str("image/jpeg")
                    .expect("Invalid mime type"),
            );
        self.post_item_form(form).await
    }

    /// POST /items with a caller-built form, for malformed submissions
    pub async fn post_item_form(&self, form: Form) -> Response {
        self.client
            .post(format!("{}/items", self.base_url))
            .multipart(form)
            .send()
            .await
            .expect("Add item request failed")
    }

    // ========================================================================
    // Images
    // ========================================================================

    /// GET /image/{filename}
    pub async fn get_image(&self, filename: &str) -> Response {
        self.client
            .get(format!("{}/image/{}", self.base_url, filename))
            .send()
            .await
            .expect("Get image request failed")
    }
}
