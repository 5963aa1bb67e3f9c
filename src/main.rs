use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::{fmt::Debug, path::PathBuf};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use item_catalog_server::catalog_store::SqliteCatalogStore;
use item_catalog_server::config;
use item_catalog_server::images::ImageStore;
use item_catalog_server::server::{run_server, RequestsLoggingLevel, ServerConfig};

fn parse_path(s: &str) -> Result<PathBuf, String> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(format!("Error resolving path '{}': {}", s, msg));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir().map_err(|e| format!("Failed to get current dir: {}", e))?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to TOML configuration file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Path to the SQLite catalog database file.
    #[clap(long, value_parser = parse_path, default_value = "db/mercari.sqlite3")]
    pub db_path: PathBuf,

    /// Directory where item images are stored.
    #[clap(long, value_parser = parse_path, default_value = "images")]
    pub images_dir: PathBuf,

    /// The port to listen on.
    #[clap(short, long, default_value_t = config::DEFAULT_PORT)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// The only origin allowed to make cross-origin requests.
    #[clap(long, env = "FRONT_URL", default_value = config::DEFAULT_FRONT_URL)]
    pub front_url: String,

    /// The maximum age of served images in client caches, in seconds.
    #[clap(long, default_value_t = config::DEFAULT_IMAGE_CACHE_AGE_SEC)]
    pub image_cache_age_sec: usize,
}

impl From<&CliArgs> for config::CliConfig {
    fn from(args: &CliArgs) -> Self {
        config::CliConfig {
            db_path: args.db_path.clone(),
            images_dir: args.images_dir.clone(),
            port: args.port,
            logging_level: args.logging_level.clone(),
            front_url: args.front_url.clone(),
            image_cache_age_sec: args.image_cache_age_sec,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    // Load TOML config if provided
    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            Some(config::FileConfig::load(path)?)
        }
        None => None,
    };

    // Resolve final configuration (TOML overrides CLI)
    let cli_config: config::CliConfig = (&cli_args).into();
    let app_config = config::AppConfig::resolve(&cli_config, file_config)?;

    info!("Configuration loaded:");
    info!("  db_path: {:?}", app_config.db_path);
    info!("  images_dir: {:?}", app_config.images_dir);
    info!("  port: {}", app_config.port);
    info!("  front_url: {}", app_config.front_url);

    if let Some(parent) = app_config.db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create database directory {:?}", parent))?;
        }
    }

    if !app_config.db_path.exists() {
        info!("Creating new catalog database at {:?}", app_config.db_path);
    }
    let catalog_store = Arc::new(SqliteCatalogStore::new(
        &app_config.db_path,
        app_config.read_pool_size,
    )?);

    let image_store = Arc::new(ImageStore::new(&app_config.images_dir));
    image_store
        .init()
        .await
        .with_context(|| format!("Failed to prepare images dir {:?}", app_config.images_dir))?;

    run_server(ServerConfig::from(&app_config), catalog_store, image_store).await
}
