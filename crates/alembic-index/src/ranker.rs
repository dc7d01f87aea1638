//! Query-likelihood ranking with a document/collection mixture
//!
//! Each query term contributes `weight * logP(term | doc)` from the document
//! model plus `(1 - weight) * logP(term | collection)` from the collection
//! model. The two weighted log terms are added as-is, not mixed before taking
//! the log. A term missing from a model contributes 0 from that model.

use alembic_core::{Config, Error, LanguageModel, Result, list_files, load_document_model};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

/// A document model eligible for ranking
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub model_path: PathBuf,
    pub model: LanguageModel,
}

impl Candidate {
    pub fn new(model_path: impl Into<PathBuf>, model: LanguageModel) -> Self {
        Self {
            model_path: model_path.into(),
            model,
        }
    }

    /// File the model was built from, when recorded
    pub fn origin(&self) -> Option<&Path> {
        self.model.metadata().map(|m| m.origin.as_path())
    }
}

/// A candidate's place in one ranking
#[derive(Debug, Clone, PartialEq)]
pub struct RankedDocument<'a> {
    pub candidate: &'a Candidate,
    pub score: f64,
    pub rank: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ranking<'a> {
    /// Collection contribution shared by every candidate
    pub collection_score: f64,
    /// Best first, at most `cutoff` entries
    pub results: Vec<RankedDocument<'a>>,
}

#[derive(Debug, Clone)]
pub struct Ranker {
    weight: f64,
    cutoff: usize,
}

impl Ranker {
    pub fn new(weight: f64, cutoff: usize) -> Result<Self> {
        if !(0.0..=1.0).contains(&weight) {
            return Err(Error::InvalidWeight(weight));
        }
        Ok(Self { weight, cutoff })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.weight, config.cutoff)
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn collection_score<S: AsRef<str>>(
        &self,
        terms: &[S],
        collection: &LanguageModel,
    ) -> f64 {
        terms
            .iter()
            .map(|t| (1.0 - self.weight) * term_log_probability(collection, t.as_ref()))
            .sum()
    }

    pub fn document_score<S: AsRef<str>>(
        &self,
        terms: &[S],
        model: &LanguageModel,
        collection_score: f64,
    ) -> f64 {
        let doc: f64 = terms
            .iter()
            .map(|t| self.weight * term_log_probability(model, t.as_ref()))
            .sum();
        doc + collection_score
    }

    /// Score every candidate, sort best first and keep the top `cutoff`
    pub fn rank<'a, S: AsRef<str>>(
        &self,
        terms: &[S],
        candidates: &'a [Candidate],
        collection: &LanguageModel,
    ) -> Ranking<'a> {
        let collection_score = self.collection_score(terms, collection);

        let mut scored: Vec<(&Candidate, f64)> = candidates
            .iter()
            .map(|c| (c, self.document_score(terms, &c.model, collection_score)))
            .collect();
        scored.sort_by(|a, b| best_first(a.1, b.1));
        scored.truncate(self.cutoff);

        tracing::debug!(
            candidates = candidates.len(),
            kept = scored.len(),
            collection_score,
            "ranked candidates"
        );

        Ranking {
            collection_score,
            results: scored
                .into_iter()
                .enumerate()
                .map(|(rank, (candidate, score))| RankedDocument {
                    candidate,
                    score,
                    rank,
                })
                .collect(),
        }
    }
}

/// Descending by score with NaN scores last
fn best_first(a: f64, b: f64) -> Ordering {
    a.is_nan()
        .cmp(&b.is_nan())
        .then_with(|| b.partial_cmp(&a).unwrap_or(Ordering::Equal))
}

fn term_log_probability(model: &LanguageModel, term: &str) -> f64 {
    model.log_probability(term).unwrap_or(0.0)
}

/// Load every `*.model` document model in `dir`, sorted by name, skipping the
/// collection model file
pub fn load_candidates(dir: &Path, collection_path: &Path) -> Result<Vec<Candidate>> {
    let skip = std::fs::canonicalize(collection_path)
        .unwrap_or_else(|_| collection_path.to_path_buf());
    let mut candidates = Vec::new();

    for path in list_files(dir)? {
        if path.extension().and_then(|e| e.to_str()) != Some("model") {
            continue;
        }
        let resolved = std::fs::canonicalize(&path).unwrap_or_else(|_| path.clone());
        if resolved == skip {
            continue;
        }
        let model = load_document_model(&path)?;
        candidates.push(Candidate::new(path, model));
    }

    tracing::info!(
        dir = %dir.display(),
        candidates = candidates.len(),
        "loaded candidate models"
    );
    Ok(candidates)
}
