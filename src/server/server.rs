use anyhow::{Context, Result};
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::catalog_store::{
    validate_category_name, validate_new_item, CatalogStoreError, ItemId, ItemsList,
};
use crate::images::{derive_image_name, ImageStoreError};

use axum::{
    extract::{multipart::Field, DefaultBodyLimit, Multipart, Path, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use super::{http_cache, log_requests, state::*, ServerConfig};

/// Largest accepted `POST /items` body.
const MAX_UPLOAD_SIZE: usize = 16 * 1024 * 1024;

#[derive(Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct AddItemResponse {
    pub message: String,
    pub id: ItemId,
    pub image: String,
}

fn message_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(MessageResponse {
            message: message.into(),
        }),
    )
        .into_response()
}

fn catalog_store_error_response(err: CatalogStoreError) -> Response {
    match err {
        CatalogStoreError::Validation(err) => {
            debug!("Rejected invalid item: {}", err);
            message_response(StatusCode::BAD_REQUEST, err.to_string())
        }
        CatalogStoreError::ConstraintViolation(_) | CatalogStoreError::DuplicateName(_) => {
            warn!("Catalog write conflict: {}", err);
            message_response(StatusCode::CONFLICT, err.to_string())
        }
        CatalogStoreError::Storage(_) => {
            error!("Catalog storage failure: {}", err);
            message_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

fn image_store_error_response(err: ImageStoreError) -> Response {
    match err {
        ImageStoreError::InvalidFilename(_) => {
            message_response(StatusCode::BAD_REQUEST, "Image path does not end with .jpg")
        }
        ImageStoreError::EmptyImage => message_response(StatusCode::BAD_REQUEST, err.to_string()),
        ImageStoreError::NotFound(_) => message_response(StatusCode::NOT_FOUND, "Not found"),
        ImageStoreError::Io(_) => {
            error!("Image storage failure: {}", err);
            message_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

async fn home() -> impl IntoResponse {
    Json(MessageResponse {
        message: "Hello, world!".to_string(),
    })
}

async fn get_all_items(State(catalog_store): State<GuardedCatalogStore>) -> Response {
    match catalog_store.get_all_items() {
        Ok(items) => Json(ItemsList::from(items)).into_response(),
        Err(err) => catalog_store_error_response(err),
    }
}

async fn get_item(
    State(catalog_store): State<GuardedCatalogStore>,
    Path(id): Path<String>,
) -> Response {
    let id: ItemId = match id.parse() {
        Ok(id) => id,
        Err(_) => return message_response(StatusCode::BAD_REQUEST, "Invalid item id"),
    };

    match catalog_store.get_item_by_id(id) {
        Ok(Some(item)) => Json(item).into_response(),
        Ok(None) => message_response(StatusCode::NOT_FOUND, "Not found"),
        Err(err) => catalog_store_error_response(err),
    }
}

async fn read_text_field(field: Field<'_>) -> Result<String, Response> {
    field.text().await.map_err(|err| {
        warn!("Failed to read form field: {}", err);
        message_response(StatusCode::BAD_REQUEST, "Malformed form field")
    })
}

/// POST /items - multipart form with `name`, `category` and an `image` file.
async fn add_item(State(state): State<ServerState>, mut multipart: Multipart) -> Response {
    let mut name: Option<String> = None;
    let mut category: Option<String> = None;
    let mut image: Option<Vec<u8>> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => {
                warn!("Failed to read multipart body: {}", err);
                return message_response(StatusCode::BAD_REQUEST, "Malformed multipart body");
            }
        };

        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "name" => match read_text_field(field).await {
                Ok(value) => name = Some(value),
                Err(response) => return response,
            },
            "category" => match read_text_field(field).await {
                Ok(value) => category = Some(value),
                Err(response) => return response,
            },
            "image" => match field.bytes().await {
                Ok(bytes) => image = Some(bytes.to_vec()),
                Err(err) => {
                    warn!("Failed to read image data: {}", err);
                    return message_response(StatusCode::BAD_REQUEST, "Failed to read image");
                }
            },
            other => debug!("Ignoring unknown form field '{}'", other),
        }
    }

    let (Some(name), Some(category)) = (name, category) else {
        return message_response(StatusCode::BAD_REQUEST, "Both name and category are required");
    };
    let Some(image) = image else {
        return message_response(StatusCode::BAD_REQUEST, "No image provided");
    };

    info!("Received {} from category: {}", name, category);

    // Reject bad input before anything lands in the images directory.
    if let Err(err) = validate_category_name(&category)
        .and_then(|_| validate_new_item(&name, &derive_image_name(&image)))
    {
        return catalog_store_error_response(err.into());
    }

    let image_filename = match state.image_store.save(&image).await {
        Ok(filename) => filename,
        Err(err) => return image_store_error_response(err),
    };

    match state
        .catalog_store
        .add_item(&name, &category, &image_filename)
    {
        Ok(id) => Json(AddItemResponse {
            message: format!("item received: {}", name),
            id,
            image: image_filename,
        })
        .into_response(),
        Err(err) => catalog_store_error_response(err),
    }
}

async fn get_image(
    State(image_store): State<GuardedImageStore>,
    Path(filename): Path<String>,
) -> Response {
    let bytes = match image_store.read(&filename).await {
        Ok(bytes) => bytes,
        Err(err) => return image_store_error_response(err),
    };

    let content_type = infer::get(&bytes)
        .map(|kind| kind.mime_type())
        .filter(|mime| mime.starts_with("image/"))
        .unwrap_or("image/jpeg");

    ([(header::CONTENT_TYPE, content_type)], bytes).into_response()
}

fn make_cors_layer(front_url: &str) -> Result<CorsLayer> {
    let origin = HeaderValue::from_str(front_url)
        .with_context(|| format!("Invalid front-end origin: {}", front_url))?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::PUT, Method::POST, Method::DELETE])
        .allow_headers(Any))
}

pub fn make_app(
    config: ServerConfig,
    catalog_store: GuardedCatalogStore,
    image_store: GuardedImageStore,
) -> Result<Router> {
    let state = ServerState::new(config.clone(), catalog_store, image_store);

    let item_routes: Router = Router::new()
        .route("/items", get(get_all_items).post(add_item))
        .route("/items/{id}", get(get_item))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE))
        .with_state(state.clone());

    let image_routes: Router = Router::new()
        .route("/image/{filename}", get(get_image))
        .layer(middleware::from_fn_with_state(
            config.image_cache_age_sec,
            http_cache,
        ))
        .with_state(state.clone());

    let app: Router = Router::new()
        .route("/", get(home))
        .merge(item_routes)
        .merge(image_routes)
        .layer(make_cors_layer(&config.front_url)?)
        .layer(middleware::from_fn_with_state(state, log_requests));

    Ok(app)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, stopping server...");
}

pub async fn run_server(
    config: ServerConfig,
    catalog_store: GuardedCatalogStore,
    image_store: GuardedImageStore,
) -> Result<()> {
    let port = config.port;
    let start = Instant::now();
    let app = make_app(config, catalog_store, image_store)?;

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;

    info!("Ready to serve at port {}!", port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped after {}s", start.elapsed().as_secs());
    Ok(())
}
