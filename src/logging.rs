//! Logging configuration

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use crate::config::LoggingSettings;

/// Initialize logging with the specified level
pub fn init(level: &str, json: bool) -> anyhow::Result<()> {
    init_with_sink(level, json, None)
}

/// Initialize logging from deployment configuration
pub fn init_from(settings: &LoggingSettings) -> anyhow::Result<()> {
    init_with_sink(
        &settings.level,
        settings.format == "json",
        settings.file.as_deref(),
    )
}

fn init_with_sink(level: &str, json: bool, file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    // Optional plain-text copy of everything into a log file.
    let file_layer = match file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let sink = File::options().create(true).append(true).open(path)?;
            Some(fmt::layer().with_ansi(false).with_writer(Arc::new(sink)))
        }
        None => None,
    };

    let subscriber = tracing_subscriber::registry().with(filter).with(file_layer);

    if json {
        subscriber
            .with(fmt::layer().json())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to init logging: {}", e))?;
    } else {
        subscriber
            .with(fmt::layer().with_target(true).with_thread_ids(false))
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to init logging: {}", e))?;
    }

    Ok(())
}
