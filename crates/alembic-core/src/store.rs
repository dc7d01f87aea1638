//! Plain-text model file format
//!
//! ```text
//! tokens: <numTokens>
//! <logProb> <word> <count>
//! <logProb> <word1> <word2> <count>
//! ```
//!
//! Each unigram line is followed by the bigram lines rooted at that word; a
//! bigram line whose first word has not been read yet is rejected. Document
//! models prefix four metadata lines (origin path, link, date, title). Class
//! pairs hold two sections introduced by `positive probabilities:` and
//! `negative probabilities:`.

use crate::error::{Error, Result};
use crate::io::atomic_write;
use crate::model::{DocumentMetadata, LanguageModel, Polarity};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

const POSITIVE_MARKER: &str = "positive probabilities:";
const NEGATIVE_MARKER: &str = "negative probabilities:";
const TOKENS_KEY: &str = "tokens:";

/// Write a model, including its metadata block when it has one
pub fn write_model<W: Write>(writer: &mut W, model: &LanguageModel) -> std::io::Result<()> {
    if let Some(meta) = model.metadata() {
        writeln!(writer, "{}", meta.origin.display())?;
        writeln!(writer, "{}", meta.link)?;
        writeln!(writer, "{}", meta.date)?;
        writeln!(writer, "{}", meta.title)?;
    }
    write_records(writer, model)
}

/// Write a positive/negative model pair as one dual-class file
pub fn write_class_pair<W: Write>(
    writer: &mut W,
    positive: &LanguageModel,
    negative: &LanguageModel,
) -> std::io::Result<()> {
    writeln!(writer, "{POSITIVE_MARKER}")?;
    write_records(writer, positive)?;
    writeln!(writer, "{NEGATIVE_MARKER}")?;
    write_records(writer, negative)
}

fn write_records<W: Write>(writer: &mut W, model: &LanguageModel) -> std::io::Result<()> {
    writeln!(writer, "{TOKENS_KEY} {}", model.num_tokens())?;
    for unigram in model.unigrams() {
        writeln!(
            writer,
            "{} {} {}",
            unigram.log_probability, unigram.word, unigram.count
        )?;
        for bigram in unigram.bigrams() {
            writeln!(
                writer,
                "{} {} {} {}",
                bigram.log_probability, bigram.word1, bigram.word2, bigram.count
            )?;
        }
    }
    Ok(())
}

/// Read a model file without a metadata block
pub fn read_model<R: BufRead>(reader: R, source: &Path) -> Result<LanguageModel> {
    let mut parser = RecordParser::new(source);
    let mut model = LanguageModel::new();
    for line in reader.lines() {
        let line = parser.next_line(line)?;
        parser.parse_into(&mut model, &line)?;
    }
    Ok(model)
}

/// Read a document model: four metadata lines, then records
pub fn read_document_model<R: BufRead>(reader: R, source: &Path) -> Result<LanguageModel> {
    let mut parser = RecordParser::new(source);
    let mut lines = reader.lines();
    let mut header = Vec::with_capacity(4);

    while header.len() < 4 {
        match lines.next() {
            Some(line) => header.push(parser.next_line(line)?),
            None => {
                return Err(Error::malformed(
                    source,
                    parser.line,
                    "document model ends before its four metadata lines",
                ));
            }
        }
    }

    let mut model = LanguageModel::new();
    let mut header = header.into_iter();
    model.set_metadata(DocumentMetadata {
        origin: PathBuf::from(header.next().unwrap_or_default()),
        link: header.next().unwrap_or_default(),
        date: header.next().unwrap_or_default(),
        title: header.next().unwrap_or_default(),
    });

    for line in lines {
        let line = parser.next_line(line)?;
        parser.parse_into(&mut model, &line)?;
    }
    Ok(model)
}

/// Read a dual-class file into `(positive, negative)` models
pub fn read_class_pair<R: BufRead>(
    reader: R,
    source: &Path,
) -> Result<(LanguageModel, LanguageModel)> {
    let mut parser = RecordParser::new(source);
    let mut positive = LanguageModel::with_polarity(Polarity::Positive);
    let mut negative = LanguageModel::with_polarity(Polarity::Negative);
    let mut section: Option<Polarity> = None;

    for line in reader.lines() {
        let line = parser.next_line(line)?;
        match line.trim() {
            POSITIVE_MARKER => section = Some(Polarity::Positive),
            NEGATIVE_MARKER => section = Some(Polarity::Negative),
            _ => match section {
                Some(Polarity::Positive) => parser.parse_into(&mut positive, &line)?,
                Some(Polarity::Negative) => parser.parse_into(&mut negative, &line)?,
                None => {
                    return Err(Error::malformed(
                        source,
                        parser.line,
                        "record before any probabilities section",
                    ));
                }
            },
        }
    }

    Ok((positive, negative))
}

struct RecordParser<'a> {
    source: &'a Path,
    line: usize,
}

impl<'a> RecordParser<'a> {
    fn new(source: &'a Path) -> Self {
        Self { source, line: 0 }
    }

    fn next_line(&mut self, line: std::io::Result<String>) -> Result<String> {
        self.line += 1;
        let mut line = line.map_err(|source| Error::ReadLine {
            path: self.source.to_path_buf(),
            line: self.line,
            source,
        })?;
        if line.ends_with('\r') {
            line.pop();
        }
        Ok(line)
    }

    fn malformed(&self, reason: impl Into<String>) -> Error {
        Error::malformed(self.source, self.line, reason)
    }

    fn parse_into(&self, model: &mut LanguageModel, line: &str) -> Result<()> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.as_slice() {
            [key, n] if *key == TOKENS_KEY => {
                let n = n
                    .parse::<u64>()
                    .map_err(|_| self.malformed(format!("invalid token total {n:?}")))?;
                model.set_num_tokens(n);
                Ok(())
            }
            [prob, word, count] => {
                let prob = self.parse_probability(prob)?;
                let count = self.parse_count(count)?;
                model.insert_unigram(word, count, prob);
                Ok(())
            }
            [prob, word1, word2, count] => {
                let prob = self.parse_probability(prob)?;
                let count = self.parse_count(count)?;
                model
                    .insert_bigram(word1, word2, count, prob)
                    .map_err(|_| {
                        self.malformed(format!(
                            "bigram ({word1}, {word2}) precedes the unigram line for {word1}"
                        ))
                    })
            }
            other => Err(self.malformed(format!(
                "expected 3 or 4 tokens, found {}",
                other.len()
            ))),
        }
    }

    fn parse_probability(&self, raw: &str) -> Result<f64> {
        raw.parse::<f64>()
            .map_err(|_| self.malformed(format!("invalid log-probability {raw:?}")))
    }

    fn parse_count(&self, raw: &str) -> Result<u64> {
        raw.parse::<u64>()
            .map_err(|_| self.malformed(format!("invalid count {raw:?}")))
    }
}

fn open(path: &Path) -> Result<BufReader<File>> {
    if !path.exists() {
        return Err(Error::PathNotFound {
            path: path.to_path_buf(),
        });
    }
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| Error::io(path, e))
}

fn save_with<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut Vec<u8>) -> std::io::Result<()>,
{
    let mut buf = Vec::new();
    write(&mut buf).map_err(|e| Error::io(path, e))?;
    atomic_write(path, &buf).map_err(|e| Error::io(path, e))?;
    tracing::debug!(path = %path.display(), bytes = buf.len(), "wrote model file");
    Ok(())
}

pub fn save_model(path: &Path, model: &LanguageModel) -> Result<()> {
    save_with(path, |buf| write_model(buf, model))
}

pub fn save_class_pair(
    path: &Path,
    positive: &LanguageModel,
    negative: &LanguageModel,
) -> Result<()> {
    save_with(path, |buf| write_class_pair(buf, positive, negative))
}

pub fn load_model(path: &Path) -> Result<LanguageModel> {
    read_model(open(path)?, path)
}

pub fn load_document_model(path: &Path) -> Result<LanguageModel> {
    read_document_model(open(path)?, path)
}

pub fn load_class_pair(path: &Path) -> Result<(LanguageModel, LanguageModel)> {
    read_class_pair(open(path)?, path)
}
