//! Mixture-model query ranking over per-document language models

mod ranker;
mod report;

pub use ranker::{Candidate, RankedDocument, Ranker, Ranking, load_candidates};
pub use report::{RankReport, ReportRow};
