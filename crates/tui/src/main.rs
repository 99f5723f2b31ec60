mod app;

use anyhow::{bail, Context, Result};
use std::fs::{self, OpenOptions};

use raildoor_core::{
    config::{self, AppConfig},
    dataset::DatasetLoader,
};
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    config::ensure_default_config()?;
    let config = AppConfig::load()?;

    if !config.dataset_path.is_file() {
        bail!(
            "dataset not found at {}; set dataset_path in {} or RAILDOOR_DATASET_PATH",
            config.dataset_path.display(),
            config::config_dir().join("config.toml").display()
        );
    }

    let loader = DatasetLoader::new(&config.dataset_path);
    let data = loader.load().context("failed to load dataset")?;

    let mut app = app::RaildoorApp::new(loader, data);
    app.run().await
}

fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("raildoor.log");

    let env_filter = EnvFilter::from_default_env();

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .compact()
        .with_writer(move || {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
                .expect("failed to open log file")
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}
