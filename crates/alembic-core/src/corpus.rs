//! Corpus inputs: directory listings, crawler records, origin documents

use crate::error::{Error, Result};
use crate::io::atomic_write;
use crate::model::{DocumentMetadata, LanguageModel};
use crate::vectorize::vectorize_lines;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::path::{Path, PathBuf};

/// Fail with `PathNotFound` unless `path` exists
pub fn require_path(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(Error::PathNotFound {
            path: path.to_path_buf(),
        })
    }
}

/// Regular files directly inside `dir`, sorted by file name
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    require_path(dir)?;

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let path = entry.map_err(|e| Error::io(dir, e))?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    tracing::debug!(dir = %dir.display(), files = ?files, "sorted directory listing");
    Ok(files)
}

/// One crawled page as exported by the crawler
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentRecord {
    pub link: String,
    pub date: String,
    pub title: String,
    pub body: Vec<String>,
}

impl DocumentRecord {
    /// Body paragraphs flattened into single-line sentences
    pub fn sentences(&self, splitter: &dyn SentenceSplitter) -> Vec<String> {
        self.body
            .iter()
            .flat_map(|paragraph| splitter.sentences(paragraph))
            .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Read a crawl export (a JSON array of records)
pub fn read_records(path: &Path) -> Result<Vec<DocumentRecord>> {
    require_path(path)?;
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    serde_json::from_str(&content).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Pluggable sentence boundary detection
pub trait SentenceSplitter {
    /// Byte ranges of each sentence in `text`, in order
    fn boundaries(&self, text: &str) -> Vec<Range<usize>>;

    fn sentences<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.boundaries(text)
            .into_iter()
            .map(|range| &text[range])
            .collect()
    }
}

/// Ends a sentence at `.`, `!` or `?` followed by whitespace or end of text
#[derive(Debug, Clone, Copy, Default)]
pub struct PunctuationSplitter;

impl SentenceSplitter for PunctuationSplitter {
    fn boundaries(&self, text: &str) -> Vec<Range<usize>> {
        let mut out = Vec::new();
        let mut start = 0;
        let mut chars = text.char_indices().peekable();

        while let Some((i, c)) = chars.next() {
            if !matches!(c, '.' | '!' | '?') {
                continue;
            }
            let at_break = chars.peek().map_or(true, |&(_, next)| next.is_whitespace());
            if at_break {
                let end = i + c.len_utf8();
                push_trimmed(&mut out, text, start..end);
                start = end;
            }
        }
        push_trimmed(&mut out, text, start..text.len());
        out
    }
}

fn push_trimmed(out: &mut Vec<Range<usize>>, text: &str, range: Range<usize>) {
    let slice = &text[range.clone()];
    let trimmed = slice.trim();
    if trimmed.is_empty() {
        return;
    }
    let lead = slice.len() - slice.trim_start().len();
    let start = range.start + lead;
    out.push(start..start + trimmed.len());
}

/// Crawled document on disk: link, date and title lines, then one sentence per line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginDocument {
    pub path: PathBuf,
    pub link: String,
    pub date: String,
    pub title: String,
    pub sentences: Vec<String>,
}

impl OriginDocument {
    pub fn from_record(
        record: &DocumentRecord,
        path: impl Into<PathBuf>,
        splitter: &dyn SentenceSplitter,
    ) -> Self {
        Self {
            path: path.into(),
            link: single_line(&record.link),
            date: single_line(&record.date),
            title: single_line(&record.title),
            sentences: record.sentences(splitter),
        }
    }

    pub fn read(path: &Path) -> Result<Self> {
        require_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let mut lines = content.lines();
        let mut header = || lines.next().unwrap_or_default().trim_end().to_string();
        let link = header();
        let date = header();
        let title = header();

        Ok(Self {
            path: path.to_path_buf(),
            link,
            date,
            title,
            sentences: content
                .lines()
                .skip(3)
                .map(|l| l.trim_end().to_string())
                .filter(|l| !l.trim().is_empty())
                .collect(),
        })
    }

    pub fn write(&self) -> Result<()> {
        let mut text = format!("{}\n{}\n{}\n", self.link, self.date, self.title);
        for sentence in &self.sentences {
            text.push_str(sentence);
            text.push('\n');
        }
        atomic_write(&self.path, text.as_bytes()).map_err(|e| Error::io(&self.path, e))
    }

    pub fn metadata(&self) -> DocumentMetadata {
        DocumentMetadata {
            origin: self.path.clone(),
            link: self.link.clone(),
            date: self.date.clone(),
            title: self.title.clone(),
        }
    }

    /// Per-document vector over the sentences, carrying this document's metadata
    pub fn vectorize(&self) -> LanguageModel {
        let mut vector = vectorize_lines(&self.sentences);
        vector.set_metadata(self.metadata());
        vector
    }
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
