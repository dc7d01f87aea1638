//! Single-sentence extractive summaries by lexical centrality

mod summarizer;

pub use summarizer::{Summarizer, Summary, summarize};
