//! Unigram/bigram language model

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::path::PathBuf;

/// Class label carried by classifier models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Negative,
    Positive,
}

/// Ordered adjacent-word pair, owned by the unigram of `word1`
#[derive(Debug, Clone)]
pub struct Bigram {
    pub word1: String,
    pub word2: String,
    pub count: u64,
    /// log2 P(word2 | word1); NaN until probabilities are calculated
    pub log_probability: f64,
}

/// Single-word feature with its outgoing bigrams
#[derive(Debug, Clone)]
pub struct Unigram {
    pub word: String,
    pub count: u64,
    /// log2 P(word); NaN until probabilities are calculated
    pub log_probability: f64,
    bigrams: BTreeMap<String, Bigram>,
}

impl Unigram {
    pub fn new(word: impl Into<String>, count: u64) -> Self {
        Self {
            word: word.into(),
            count,
            log_probability: f64::NAN,
            bigrams: BTreeMap::new(),
        }
    }

    pub fn bigram(&self, word2: &str) -> Option<&Bigram> {
        self.bigrams.get(word2)
    }

    /// Bigrams rooted at this word, ordered by `word2`
    pub fn bigrams(&self) -> impl Iterator<Item = &Bigram> {
        self.bigrams.values()
    }

    /// Number of distinct words observed after this one
    pub fn fan_out(&self) -> usize {
        self.bigrams.len()
    }
}

/// Unset probabilities (NaN) compare equal to each other
fn same_probability(a: f64, b: f64) -> bool {
    (a.is_nan() && b.is_nan()) || a == b
}

impl PartialEq for Bigram {
    fn eq(&self, other: &Self) -> bool {
        self.word1 == other.word1
            && self.word2 == other.word2
            && self.count == other.count
            && same_probability(self.log_probability, other.log_probability)
    }
}

impl PartialEq for Unigram {
    fn eq(&self, other: &Self) -> bool {
        self.word == other.word
            && self.count == other.count
            && same_probability(self.log_probability, other.log_probability)
            && self.bigrams == other.bigrams
    }
}

/// Origin of a model built from one crawled document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub origin: PathBuf,
    pub link: String,
    pub date: String,
    pub title: String,
}

/// Unigram and bigram counts plus smoothed log-probabilities for a document,
/// a class, or a whole collection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LanguageModel {
    words: BTreeMap<String, Unigram>,
    num_tokens: u64,
    polarity: Option<Polarity>,
    metadata: Option<DocumentMetadata>,
}

impl LanguageModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_polarity(polarity: Polarity) -> Self {
        Self {
            polarity: Some(polarity),
            ..Self::default()
        }
    }

    pub fn polarity(&self) -> Option<Polarity> {
        self.polarity
    }

    pub fn metadata(&self) -> Option<&DocumentMetadata> {
        self.metadata.as_ref()
    }

    pub fn set_metadata(&mut self, metadata: DocumentMetadata) {
        self.metadata = Some(metadata);
    }

    /// Tokens read across every document merged into this model
    pub fn num_tokens(&self) -> u64 {
        self.num_tokens
    }

    pub fn add_tokens(&mut self, n: u64) {
        self.num_tokens += n;
    }

    pub(crate) fn set_num_tokens(&mut self, n: u64) {
        self.num_tokens = n;
    }

    /// Number of distinct unigrams (V)
    pub fn vocabulary_size(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn unigram(&self, word: &str) -> Option<&Unigram> {
        self.words.get(word)
    }

    pub fn bigram(&self, word1: &str, word2: &str) -> Option<&Bigram> {
        self.words.get(word1).and_then(|u| u.bigram(word2))
    }

    /// Unigrams ordered by word
    pub fn unigrams(&self) -> impl Iterator<Item = &Unigram> {
        self.words.values()
    }

    /// Observation count of `word`, 0 when unseen
    pub fn count(&self, word: &str) -> u64 {
        self.words.get(word).map_or(0, |u| u.count)
    }

    /// Stored log-probability of `word`, if the word is known
    pub fn log_probability(&self, word: &str) -> Option<f64> {
        self.words.get(word).map(|u| u.log_probability)
    }

    /// Count one more observation of `word`. Returns whether it already existed.
    pub fn add_unigram(&mut self, word: &str) -> bool {
        match self.words.get_mut(word) {
            Some(unigram) => {
                unigram.count += 1;
                true
            }
            None => {
                self.words.insert(word.to_string(), Unigram::new(word, 1));
                false
            }
        }
    }

    /// Count one more observation of `word1 -> word2`. `word1` must already be
    /// a unigram. Returns whether the bigram already existed.
    pub fn add_bigram(&mut self, word1: &str, word2: &str) -> Result<bool> {
        let unigram = self.words.get_mut(word1).ok_or_else(|| Error::OrphanBigram {
            word1: word1.to_string(),
            word2: word2.to_string(),
        })?;

        match unigram.bigrams.get_mut(word2) {
            Some(bigram) => {
                bigram.count += 1;
                Ok(true)
            }
            None => {
                unigram.bigrams.insert(
                    word2.to_string(),
                    Bigram {
                        word1: word1.to_string(),
                        word2: word2.to_string(),
                        count: 1,
                        log_probability: f64::NAN,
                    },
                );
                Ok(false)
            }
        }
    }

    /// Insert a unigram record as read from a model file, replacing any
    /// previous record for the word (its bigrams are kept)
    pub fn insert_unigram(&mut self, word: &str, count: u64, log_probability: f64) {
        let unigram = self
            .words
            .entry(word.to_string())
            .or_insert_with(|| Unigram::new(word, 0));
        unigram.count = count;
        unigram.log_probability = log_probability;
    }

    /// Insert a bigram record as read from a model file
    pub fn insert_bigram(
        &mut self,
        word1: &str,
        word2: &str,
        count: u64,
        log_probability: f64,
    ) -> Result<()> {
        let unigram = self.words.get_mut(word1).ok_or_else(|| Error::OrphanBigram {
            word1: word1.to_string(),
            word2: word2.to_string(),
        })?;
        unigram.bigrams.insert(
            word2.to_string(),
            Bigram {
                word1: word1.to_string(),
                word2: word2.to_string(),
                count,
                log_probability,
            },
        );
        Ok(())
    }

    /// Sum another model's token total and feature counts into this one
    pub fn merge(&mut self, other: &LanguageModel) {
        self.num_tokens += other.num_tokens;

        for theirs in other.words.values() {
            let ours = self
                .words
                .entry(theirs.word.clone())
                .or_insert_with(|| Unigram::new(theirs.word.clone(), 0));
            ours.count += theirs.count;

            for bigram in theirs.bigrams.values() {
                match ours.bigrams.entry(bigram.word2.clone()) {
                    Entry::Occupied(mut e) => e.get_mut().count += bigram.count,
                    Entry::Vacant(e) => {
                        e.insert(Bigram {
                            word1: bigram.word1.clone(),
                            word2: bigram.word2.clone(),
                            count: bigram.count,
                            log_probability: f64::NAN,
                        });
                    }
                }
            }
        }
    }

    /// Recompute every log-probability with add-k smoothing:
    ///
    /// - `log2 P(w) = log2((count(w) + k) / (num_tokens + V))`
    /// - `log2 P(w2 | w1) = log2((count(w1, w2) + k) / (count(w1) + V))`
    ///
    /// where V is the current vocabulary size.
    pub fn calculate_probabilities(&mut self, k: f64) {
        let vocab = self.words.len() as f64;
        let total = self.num_tokens as f64 + vocab;

        for unigram in self.words.values_mut() {
            unigram.log_probability = ((unigram.count as f64 + k) / total).log2();

            let context = unigram.count as f64 + vocab;
            for bigram in unigram.bigrams.values_mut() {
                bigram.log_probability = ((bigram.count as f64 + k) / context).log2();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_model() -> LanguageModel {
        let mut model = LanguageModel::new();
        model.add_unigram("the");
        model.add_bigram("the", "cat").unwrap();
        model.add_unigram("cat");
        model.add_bigram("cat", "sat").unwrap();
        model.add_tokens(3);
        model
    }

    #[test]
    fn test_add_unigram_reports_existence() {
        let mut model = LanguageModel::new();
        assert!(!model.add_unigram("cat"));
        assert!(model.add_unigram("cat"));
        assert_eq!(model.count("cat"), 2);
    }

    #[test]
    fn test_add_bigram_requires_unigram() {
        let mut model = LanguageModel::new();
        let result = model.add_bigram("cat", "sat");
        assert!(matches!(result, Err(Error::OrphanBigram { .. })));

        model.add_unigram("cat");
        assert!(!model.add_bigram("cat", "sat").unwrap());
        assert!(model.add_bigram("cat", "sat").unwrap());
        assert_eq!(model.bigram("cat", "sat").unwrap().count, 2);
    }

    #[test]
    fn test_bigram_word1_matches_owner() {
        let model = sample_model();
        for unigram in model.unigrams() {
            for bigram in unigram.bigrams() {
                assert_eq!(bigram.word1, unigram.word);
            }
        }
    }

    #[test]
    fn test_unigram_probability() {
        let mut model = LanguageModel::new();
        for word in ["cat", "a", "b", "c", "d"] {
            model.add_unigram(word);
        }
        model.add_unigram("cat");
        model.add_unigram("cat");
        model.add_tokens(10);

        model.calculate_probabilities(1.0);

        let expected = (4.0f64 / 15.0).log2();
        assert!((model.log_probability("cat").unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_bigram_probability_uses_unigram_count() {
        let mut model = sample_model();
        model.calculate_probabilities(1.0);

        // count(the, cat) = 1, count(the) = 1, V = 2
        let expected = (2.0f64 / 3.0).log2();
        let actual = model.bigram("the", "cat").unwrap().log_probability;
        assert!((actual - expected).abs() < 1e-12);
    }

    #[test]
    fn test_probabilities_unset_before_calculation() {
        let model = sample_model();
        assert!(model.log_probability("cat").unwrap().is_nan());
    }

    #[test]
    fn test_uncalculated_model_equals_its_clone() {
        let model = sample_model();
        assert_eq!(model, model.clone());

        let mut calculated = model.clone();
        calculated.calculate_probabilities(1.0);
        assert_ne!(model, calculated);
    }

    #[test]
    fn test_calculate_probabilities_idempotent() {
        let mut model = sample_model();
        model.calculate_probabilities(1.0);
        let first = model.clone();
        model.calculate_probabilities(1.0);
        assert_eq!(model, first);
    }

    #[test]
    fn test_merge_sums_counts_and_tokens() {
        let a = sample_model();
        let mut b = LanguageModel::new();
        b.add_unigram("cat");
        b.add_bigram("cat", "ran").unwrap();
        b.add_tokens(5);

        let mut merged = LanguageModel::new();
        merged.merge(&a);
        merged.merge(&b);

        assert_eq!(merged.num_tokens(), 8);
        assert_eq!(merged.count("cat"), 2);
        assert_eq!(merged.count("the"), 1);
        assert_eq!(merged.bigram("cat", "sat").unwrap().count, 1);
        assert_eq!(merged.bigram("cat", "ran").unwrap().count, 1);
    }

    #[test]
    fn test_merge_order_does_not_matter() {
        let a = sample_model();
        let mut b = LanguageModel::new();
        b.add_unigram("the");
        b.add_bigram("the", "dog").unwrap();
        b.add_tokens(2);

        let mut ab = LanguageModel::new();
        ab.merge(&a);
        ab.merge(&b);

        let mut ba = LanguageModel::new();
        ba.merge(&b);
        ba.merge(&a);

        assert_eq!(ab.num_tokens(), ba.num_tokens());
        for unigram in ab.unigrams() {
            assert_eq!(unigram.count, ba.count(&unigram.word));
            for bigram in unigram.bigrams() {
                assert_eq!(
                    bigram.count,
                    ba.bigram(&bigram.word1, &bigram.word2).unwrap().count
                );
            }
        }
    }

    #[test]
    fn test_with_polarity() {
        let model = LanguageModel::with_polarity(Polarity::Positive);
        assert_eq!(model.polarity(), Some(Polarity::Positive));
    }
}
