//! Naive Bayes scoring over log-probabilities

use alembic_core::{LanguageModel, Polarity};

/// Sum of the class model's log-probabilities over every feature of `vector`.
///
/// Unseen words score `log2(1 / (num_tokens + V))`. Unseen bigrams score
/// `log2(1 / (count(word1) + V))`, with `count(word1) = 1` when `word1` is
/// unseen as well.
pub fn naive_bayes(model: &LanguageModel, vector: &LanguageModel) -> f64 {
    let vocab = model.vocabulary_size() as f64;
    let unseen_word = (1.0 / (model.num_tokens() as f64 + vocab)).log2();
    let mut score = 0.0;

    for unigram in vector.unigrams() {
        let known = model.unigram(&unigram.word);
        score += known.map_or(unseen_word, |u| u.log_probability);

        for bigram in unigram.bigrams() {
            score += match known.and_then(|u| u.bigram(&bigram.word2)) {
                Some(b) => b.log_probability,
                None => {
                    let context = known.map_or(1, |u| u.count) as f64;
                    (1.0 / (context + vocab)).log2()
                }
            };
        }
    }

    score
}

/// Pick the class whose model scores the vector higher; ties go positive
pub fn classify(
    vector: &LanguageModel,
    positive: &LanguageModel,
    negative: &LanguageModel,
) -> Polarity {
    let neg = naive_bayes(negative, vector);
    let pos = naive_bayes(positive, vector);
    if neg > pos {
        Polarity::Negative
    } else {
        Polarity::Positive
    }
}
