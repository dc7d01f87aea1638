//! Lexical centrality over tf-idf cosine similarity
//!
//! `tf(term)` is the term's bigram fan-out in the document model and
//! `idf(term)` is its raw count in the collection model. Neither is a
//! textbook tf or idf; both stand in for them using only what the models
//! already store.

use alembic_core::LanguageModel;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// The most central sentence of a document
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub sentence: String,
    /// Position of the sentence in the input
    pub index: usize,
    pub centrality: f64,
}

#[derive(Debug, Clone)]
pub struct Summarizer {
    tf: HashMap<String, f64>,
    idf: HashMap<String, f64>,
}

impl Summarizer {
    pub fn new(model: &LanguageModel, collection: &LanguageModel) -> Self {
        let tf = model
            .unigrams()
            .map(|u| (u.word.clone(), u.fan_out() as f64))
            .collect();
        let idf = collection
            .unigrams()
            .map(|u| (u.word.clone(), u.count as f64))
            .collect();
        Self { tf, idf }
    }

    pub fn tf(&self, term: &str) -> f64 {
        self.tf.get(term).copied().unwrap_or(0.0)
    }

    pub fn idf(&self, term: &str) -> f64 {
        self.idf.get(term).copied().unwrap_or(0.0)
    }

    /// tf-idf cosine between two sentences; each norm carries a `+1` so it is never zero
    pub fn similarity(&self, x: &str, y: &str) -> f64 {
        let x_terms: Vec<&str> = x.split_whitespace().collect();
        let y_terms: Vec<&str> = y.split_whitespace().collect();

        let sum_x = self.weight_norm(&x_terms);
        let sum_y = self.weight_norm(&y_terms);

        let in_x: HashSet<&str> = x_terms.iter().copied().collect();
        let in_y: HashSet<&str> = y_terms.iter().copied().collect();

        let cross: f64 = in_x
            .union(&in_y)
            .map(|w| {
                let tf = self.tf(w);
                let tf_x = if in_x.contains(w) { tf } else { 0.0 };
                let tf_y = if in_y.contains(w) { tf } else { 0.0 };
                let idf = self.idf(w);
                tf_x * tf_y * idf * idf
            })
            .sum();

        cross / (sum_x.sqrt() * sum_y.sqrt())
    }

    fn weight_norm(&self, terms: &[&str]) -> f64 {
        1.0 + terms
            .iter()
            .map(|t| (self.tf(t) * self.idf(t)).powi(2))
            .sum::<f64>()
    }

    /// Sum of similarities to every other sentence, divided by the sentence count
    pub fn centrality<S: AsRef<str>>(&self, sentences: &[S], index: usize) -> f64 {
        let x = sentences[index].as_ref();
        let total: f64 = sentences
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != index)
            .map(|(_, y)| self.similarity(x, y.as_ref()))
            .sum();
        total / sentences.len() as f64
    }

    pub fn centralities<S: AsRef<str>>(&self, sentences: &[S]) -> Vec<f64> {
        (0..sentences.len())
            .map(|i| self.centrality(sentences, i))
            .collect()
    }

    /// Pick the sentence with the highest centrality; the earliest wins ties
    pub fn summarize<S: AsRef<str>>(&self, sentences: &[S]) -> Option<Summary> {
        tracing::debug!(sentences = sentences.len(), "finding centralities");

        let mut ranked: Vec<(usize, f64)> =
            self.centralities(sentences).into_iter().enumerate().collect();
        ranked.sort_by(|a, b| {
            a.1.is_nan()
                .cmp(&b.1.is_nan())
                .then_with(|| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal))
        });

        ranked.first().map(|&(index, centrality)| Summary {
            sentence: sentences[index].as_ref().to_string(),
            index,
            centrality,
        })
    }
}

/// Most central sentence of a document given its model and the collection model
pub fn summarize<S: AsRef<str>>(
    sentences: &[S],
    model: &LanguageModel,
    collection: &LanguageModel,
) -> Option<Summary> {
    Summarizer::new(model, collection).summarize(sentences)
}
