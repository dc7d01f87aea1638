//! Error type shared by every alembic crate

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("path {} does not exist", path.display())]
    PathNotFound { path: PathBuf },

    #[error("malformed model file {}: line {line}: {reason}", path.display())]
    MalformedModelFile {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("malformed rank report {}: line {line}: {reason}", path.display())]
    MalformedReport {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("mixture weight {0} is outside [0, 1]")]
    InvalidWeight(f64),

    #[error("smoothing constant {0} must be a finite value >= 0")]
    InvalidSmoothing(f64),

    #[error("fold count must be at least 1, got {0}")]
    InvalidFoldCount(usize),

    #[error("{} holds {found} documents, fewer than {folds} folds", dir.display())]
    TooFewDocuments {
        dir: PathBuf,
        found: usize,
        folds: usize,
    },

    #[error("bigram ({word1}, {word2}) has no unigram for {word1}")]
    OrphanBigram { word1: String, word2: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("read error in {} at line {line}: {source}", path.display())]
    ReadLine {
        path: PathBuf,
        line: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(
        path: impl Into<PathBuf>,
        line: usize,
        reason: impl Into<String>,
    ) -> Self {
        Error::MalformedModelFile {
            path: path.into(),
            line,
            reason: reason.into(),
        }
    }
}
