//! Run configuration for model training, ranking and reporting

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunables shared by the classifier, ranker and report writer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Additive smoothing constant used by `calculate_probabilities`
    pub smoothing_k: f64,

    /// Number of cross-validation folds
    pub fold_count: usize,

    /// Mixture weight given to the document model (collection gets 1 - weight)
    pub weight: f64,

    /// Number of ranked documents to keep
    pub cutoff: usize,

    /// Narrowest path column in the rank report
    pub min_column_width: usize,
}

impl Config {
    pub fn new() -> Self {
        Self {
            smoothing_k: 1.0,
            fold_count: 10,
            weight: 0.5,
            cutoff: 10,
            min_column_width: 25,
        }
    }

    /// Read a JSON config file; absent fields keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::PathNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config: Config = serde_json::from_str(&content).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.smoothing_k >= 0.0 && self.smoothing_k.is_finite()) {
            return Err(Error::InvalidSmoothing(self.smoothing_k));
        }
        if !(0.0..=1.0).contains(&self.weight) {
            return Err(Error::InvalidWeight(self.weight));
        }
        if self.fold_count == 0 {
            return Err(Error::InvalidFoldCount(self.fold_count));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
