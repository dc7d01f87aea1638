//! Fixed-width rank report
//!
//! ```text
//! Query: flu vaccine
//! Collection: -7.1234 | models/flu_all.model
//! RANK | PROBABILITY  | MODEL                     | ORIGIN
//! 0    | -3.2500      | models/flu_4.model        | docs/doc_4.txt
//! ```

use crate::ranker::Ranking;
use alembic_core::{Error, Result, atomic_write, require_path};
use std::path::{Path, PathBuf};

const RANK_WIDTH: usize = 4;
const PROBABILITY_WIDTH: usize = 12;
const NO_ORIGIN: &str = "-";

#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub rank: usize,
    pub score: f64,
    pub model_path: PathBuf,
    pub origin: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankReport {
    pub query: Vec<String>,
    pub collection_score: f64,
    pub collection_path: PathBuf,
    pub rows: Vec<ReportRow>,
}

impl RankReport {
    pub fn from_ranking<S: AsRef<str>>(
        query: &[S],
        ranking: &Ranking<'_>,
        collection_path: &Path,
    ) -> Self {
        Self {
            query: query.iter().map(|t| t.as_ref().to_string()).collect(),
            collection_score: ranking.collection_score,
            collection_path: collection_path.to_path_buf(),
            rows: ranking
                .results
                .iter()
                .map(|r| ReportRow {
                    rank: r.rank,
                    score: r.score,
                    model_path: r.candidate.model_path.clone(),
                    origin: r.candidate.origin().map(Path::to_path_buf),
                })
                .collect(),
        }
    }

    /// Best-ranked row
    pub fn top(&self) -> Option<&ReportRow> {
        self.rows.iter().min_by_key(|r| r.rank)
    }

    /// Render with path columns at least `min_width` wide
    pub fn render(&self, min_width: usize) -> String {
        let width = self
            .rows
            .iter()
            .flat_map(|r| {
                let origin = r
                    .origin
                    .as_ref()
                    .map_or(NO_ORIGIN.len(), |o| display_width(o));
                [display_width(&r.model_path), origin]
            })
            .fold(min_width, usize::max);

        let mut out = format!(
            "Query: {}\nCollection: {:.4} | {}\n",
            self.query.join(" "),
            self.collection_score,
            self.collection_path.display()
        );
        out.push_str(&row_line("RANK", "PROBABILITY", "MODEL", "ORIGIN", width));

        for row in &self.rows {
            let origin = row
                .origin
                .as_ref()
                .map_or_else(|| NO_ORIGIN.to_string(), |o| o.display().to_string());
            out.push_str(&row_line(
                &row.rank.to_string(),
                &format!("{:.4}", row.score),
                &row.model_path.display().to_string(),
                &origin,
                width,
            ));
        }
        out
    }

    pub fn write(&self, path: &Path, min_width: usize) -> Result<()> {
        atomic_write(path, self.render(min_width).as_bytes()).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn read(path: &Path) -> Result<Self> {
        require_path(path)?;
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    pub fn parse(text: &str, source: &Path) -> Result<Self> {
        let malformed = |line: usize, reason: &str| Error::MalformedReport {
            path: source.to_path_buf(),
            line,
            reason: reason.to_string(),
        };
        let mut lines = text.lines();

        let query = lines
            .next()
            .and_then(|l| l.strip_prefix("Query:"))
            .ok_or_else(|| malformed(1, "expected 'Query:' line"))?
            .split_whitespace()
            .map(str::to_string)
            .collect();

        let collection = lines
            .next()
            .and_then(|l| l.strip_prefix("Collection:"))
            .ok_or_else(|| malformed(2, "expected 'Collection:' line"))?;
        let (score, collection_path) = collection
            .split_once('|')
            .ok_or_else(|| malformed(2, "expected '<score> | <path>'"))?;
        let collection_score = score
            .trim()
            .parse::<f64>()
            .map_err(|_| malformed(2, "invalid collection score"))?;

        match lines.next() {
            Some(header) if header.trim_start().starts_with("RANK") => {}
            _ => return Err(malformed(3, "expected column header line")),
        }

        let mut rows = Vec::new();
        for (idx, line) in lines.enumerate() {
            let line_no = idx + 4;
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split('|').map(str::trim).collect();
            let [rank, score, model, origin] = fields.as_slice() else {
                return Err(malformed(line_no, "expected 4 '|'-separated columns"));
            };
            rows.push(ReportRow {
                rank: rank
                    .parse()
                    .map_err(|_| malformed(line_no, "invalid rank"))?,
                score: score
                    .parse()
                    .map_err(|_| malformed(line_no, "invalid probability"))?,
                model_path: PathBuf::from(model),
                origin: (*origin != NO_ORIGIN).then(|| PathBuf::from(origin)),
            });
        }

        Ok(Self {
            query,
            collection_score,
            collection_path: PathBuf::from(collection_path.trim()),
            rows,
        })
    }
}

/// Padding counts characters, not bytes
fn display_width(path: &Path) -> usize {
    path.display().to_string().chars().count()
}

fn row_line(rank: &str, probability: &str, model: &str, origin: &str, width: usize) -> String {
    let line = format!(
        "{:<rw$} | {:<pw$} | {:<width$} | {:<width$}",
        rank,
        probability,
        model,
        origin,
        rw = RANK_WIDTH,
        pw = PROBABILITY_WIDTH,
        width = width,
    );
    format!("{}\n", line.trim_end())
}
