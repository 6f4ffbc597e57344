mod app;

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    path::Path,
};

use explorer_core::{
    config::{self, AppConfig},
    favorites::FavoritesStore,
    storage::FileStore,
};
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let written_config = config::ensure_default_config()?;
    let config = AppConfig::load()?;
    init_logging(&config.log_dir())?;
    if let Some(path) = &written_config {
        tracing::info!(path = %path.display(), "Wrote default config");
    }
    tracing::info!(config = %config::config_path().display(), data_dir = %config.data_dir.display(), "Starting Game Explorer");

    let store = FileStore::in_dir(&config.data_dir);
    let favorites = FavoritesStore::open(store);

    let mut app = app::ExplorerApp::new(favorites, config.generator_options());
    let result = app.run().await;
    if let Err(err) = &result {
        tracing::error!("Game Explorer exited with error: {err:#}");
    }
    result
}

fn init_logging(log_dir: &Path) -> Result<()> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;
    let log_path = log_dir.join("game-explorer.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // The terminal is in alternate-screen mode, so logs only go to the file.
    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .compact()
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(log_file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}
