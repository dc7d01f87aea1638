pub mod classify;
pub mod ingest;
pub mod model;
pub mod rank;
pub mod summarize;

use alembic_core::Config;
use std::path::Path;

/// Config file when given, defaults otherwise
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => {
            let config = Config::load(path)?;
            tracing::debug!(path = %path.display(), ?config, "loaded config");
            Ok(config)
        }
        None => Ok(Config::default()),
    }
}
