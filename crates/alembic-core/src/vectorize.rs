//! Per-document feature vectors with presence semantics
//!
//! A word or adjacent pair counts once per document no matter how often it
//! repeats, so merged class models hold "number of documents containing the
//! feature". The token total still counts every token read.

use crate::error::{Error, Result};
use crate::model::LanguageModel;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Vectorize one document given as whitespace-tokenized lines
pub fn vectorize_lines<I, S>(lines: I) -> LanguageModel
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut vector = LanguageModel::new();
    for line in lines {
        observe_line(&mut vector, line.as_ref());
    }
    vector
}

/// Vectorize a plain-text document file
pub fn vectorize_file(path: &Path) -> Result<LanguageModel> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut vector = LanguageModel::new();

    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|source| Error::ReadLine {
            path: path.to_path_buf(),
            line: idx + 1,
            source,
        })?;
        observe_line(&mut vector, &line);
    }

    tracing::debug!(
        path = %path.display(),
        tokens = vector.num_tokens(),
        vocabulary = vector.vocabulary_size(),
        "vectorized document"
    );
    Ok(vector)
}

fn observe_line(vector: &mut LanguageModel, line: &str) {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    vector.add_tokens(tokens.len() as u64);

    match tokens.as_slice() {
        [] => {}
        [only] => observe_word(vector, only),
        _ => {
            for pair in tokens.windows(2) {
                observe_word(vector, pair[0]);
                if vector.bigram(pair[0], pair[1]).is_none() {
                    let added = vector.add_bigram(pair[0], pair[1]);
                    debug_assert!(added.is_ok(), "first word is registered before its bigram");
                }
            }
        }
    }
}

/// Presence semantics: a word counts once per document
fn observe_word(vector: &mut LanguageModel, word: &str) {
    if vector.unigram(word).is_none() {
        vector.add_unigram(word);
    }
}
