mod file_config;

pub use file_config::FileConfig;

use crate::catalog_store::DEFAULT_READ_POOL_SIZE;
use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 9000;
pub const DEFAULT_FRONT_URL: &str = "http://localhost:3000";
pub const DEFAULT_IMAGE_CACHE_AGE_SEC: usize = 3600;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub db_path: PathBuf,
    pub images_dir: PathBuf,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub front_url: String,
    pub image_cache_age_sec: usize,
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            db_path: PathBuf::from("db/mercari.sqlite3"),
            images_dir: PathBuf::from("images"),
            port: DEFAULT_PORT,
            logging_level: RequestsLoggingLevel::Path,
            front_url: DEFAULT_FRONT_URL.to_string(),
            image_cache_age_sec: DEFAULT_IMAGE_CACHE_AGE_SEC,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub images_dir: PathBuf,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub front_url: String,
    pub image_cache_age_sec: usize,
    pub read_pool_size: usize,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .unwrap_or_else(|| cli.db_path.clone());
        if db_path.is_dir() {
            bail!("db_path points to a directory: {:?}", db_path);
        }

        let images_dir = file
            .images_dir
            .map(PathBuf::from)
            .unwrap_or_else(|| cli.images_dir.clone());
        if images_dir.exists() && !images_dir.is_dir() {
            bail!("images_dir is not a directory: {:?}", images_dir);
        }

        let logging_level = match file.logging_level {
            Some(s) => match parse_logging_level(&s) {
                Some(level) => level,
                None => bail!("Invalid logging_level in config file: {}", s),
            },
            None => cli.logging_level.clone(),
        };

        let front_url = file.front_url.unwrap_or_else(|| cli.front_url.clone());
        if front_url.trim().is_empty() {
            bail!("front_url must not be empty");
        }

        let read_pool_size = file.read_pool_size.unwrap_or(DEFAULT_READ_POOL_SIZE);
        if read_pool_size == 0 {
            bail!("read_pool_size must be at least 1");
        }

        Ok(Self {
            db_path,
            images_dir,
            port: file.port.unwrap_or(cli.port),
            logging_level,
            front_url,
            image_cache_age_sec: file.image_cache_age_sec.unwrap_or(cli.image_cache_age_sec),
            read_pool_size,
        })
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
