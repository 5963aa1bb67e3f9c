use super::RequestsLoggingLevel;
use crate::config::{AppConfig, DEFAULT_FRONT_URL, DEFAULT_IMAGE_CACHE_AGE_SEC, DEFAULT_PORT};

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub port: u16,
    /// Max age advertised for served images.
    pub image_cache_age_sec: usize,
    /// Only origin allowed by CORS.
    pub front_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            port: DEFAULT_PORT,
            image_cache_age_sec: DEFAULT_IMAGE_CACHE_AGE_SEC,
            front_url: DEFAULT_FRONT_URL.to_string(),
        }
    }
}

impl From<&AppConfig> for ServerConfig {
    fn from(config: &AppConfig) -> Self {
        ServerConfig {
            requests_logging_level: config.logging_level.clone(),
            port: config.port,
            image_cache_age_sec: config.image_cache_age_sec,
            front_url: config.front_url.clone(),
        }
    }
}
