use axum::extract::FromRef;

use crate::catalog_store::CatalogStore;
use crate::images::ImageStore;
use std::sync::Arc;

use super::ServerConfig;

pub type GuardedCatalogStore = Arc<dyn CatalogStore>;
pub type GuardedImageStore = Arc<ImageStore>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub catalog_store: GuardedCatalogStore,
    pub image_store: GuardedImageStore,
}

impl ServerState {
    pub fn new(
        config: ServerConfig,
        catalog_store: GuardedCatalogStore,
        image_store: GuardedImageStore,
    ) -> ServerState {
        ServerState {
            config,
            catalog_store,
            image_store,
        }
    }
}

impl FromRef<ServerState> for GuardedCatalogStore {
    fn from_ref(input: &ServerState) -> Self {
        input.catalog_store.clone()
    }
}

impl FromRef<ServerState> for GuardedImageStore {
    fn from_ref(input: &ServerState) -> Self {
        input.image_store.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
