use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "alembic")]
#[command(version)]
#[command(about = "Classify, rank and summarize documents with n-gram language models")]
pub struct Cli {
    /// JSON configuration file (flags override its values)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a crawl export into origin document files
    Ingest {
        /// JSON array of crawled records
        #[arg(short, long)]
        records: PathBuf,

        /// Directory for the origin documents
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Generate language model files for a document collection
    Model {
        /// Directory of the document collection
        #[arg(short, long)]
        dir: PathBuf,

        /// Output file prefix: <prefix>_<i>.model and <prefix>_all.model
        #[arg(short, long)]
        prefix: String,

        #[arg(long, value_enum, default_value_t = ModelMode::Both)]
        mode: ModelMode,

        /// Treat files as origin documents (link, date, title, then sentences)
        #[arg(long)]
        documents: bool,

        /// Additive smoothing constant
        #[arg(short = 'k', long)]
        smoothing: Option<f64>,
    },

    /// Train per-fold positive/negative models and write <prefix>_<i>.nb
    Train {
        #[command(flatten)]
        corpus: ClassDirs,

        #[arg(short, long)]
        prefix: String,

        #[arg(short = 'k', long)]
        smoothing: Option<f64>,
    },

    /// Evaluate previously trained fold model files
    Evaluate {
        #[command(flatten)]
        corpus: ClassDirs,

        #[arg(short, long)]
        prefix: String,

        #[arg(long)]
        json: bool,
    },

    /// Train and evaluate every fold in memory
    CrossValidate {
        #[command(flatten)]
        corpus: ClassDirs,

        #[arg(short = 'k', long)]
        smoothing: Option<f64>,

        #[arg(long)]
        json: bool,
    },

    /// Rank document models against a query
    Rank {
        /// Query terms
        #[arg(short, long, num_args = 1.., required = true)]
        query: Vec<String>,

        /// Collection model file
        #[arg(long)]
        collection: PathBuf,

        /// Directory of document model files
        #[arg(short, long)]
        models: PathBuf,

        /// Mixture weight of the document model, in [0, 1]
        #[arg(short, long)]
        weight: Option<f64>,

        /// Number of results to keep
        #[arg(long)]
        cutoff: Option<usize>,

        /// Also write the report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Summarize the top-ranked document
    Summarize {
        /// Rank report whose top result is summarized
        #[arg(short, long, conflicts_with_all = ["model", "origin"])]
        report: Option<PathBuf>,

        /// Document model file
        #[arg(long, requires = "origin")]
        model: Option<PathBuf>,

        /// Origin document file
        #[arg(long, requires = "model")]
        origin: Option<PathBuf>,

        /// Collection model file (taken from the report when omitted)
        #[arg(long)]
        collection: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
pub struct ClassDirs {
    /// Directory of positive documents
    #[arg(long = "pos")]
    pub positive: PathBuf,

    /// Directory of negative documents
    #[arg(long = "neg")]
    pub negative: PathBuf,

    /// Number of cross-validation folds
    #[arg(long)]
    pub folds: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModelMode {
    /// One model per document
    Each,
    /// One model over the whole collection
    All,
    /// Both of the above
    Both,
}

impl ModelMode {
    pub fn each(self) -> bool {
        matches!(self, ModelMode::Each | ModelMode::Both)
    }

    pub fn all(self) -> bool {
        matches!(self, ModelMode::All | ModelMode::Both)
    }
}
