//! Language models over unigram/bigram features, their file format, and corpus I/O

mod config;
mod corpus;
mod error;
mod io;
mod model;
mod store;
mod vectorize;

pub use config::Config;
pub use corpus::{
    DocumentRecord, OriginDocument, PunctuationSplitter, SentenceSplitter, list_files,
    read_records, require_path,
};
pub use error::{Error, Result};
pub use io::atomic_write;
pub use model::{Bigram, DocumentMetadata, LanguageModel, Polarity, Unigram};
pub use store::{
    load_class_pair, load_document_model, load_model, read_class_pair, read_document_model,
    read_model, save_class_pair, save_model, write_class_pair, write_model,
};
pub use vectorize::{vectorize_file, vectorize_lines};
