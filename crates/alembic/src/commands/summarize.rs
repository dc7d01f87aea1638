use alembic_core::{OriginDocument, load_document_model, load_model, require_path};
use alembic_extract::{Summarizer, Summary};
use alembic_index::RankReport;
use anyhow::Context;
use std::path::{Path, PathBuf};

/// Document model, origin document and collection model to summarize from
#[derive(Debug, Clone, PartialEq)]
struct SummaryInputs {
    model: PathBuf,
    origin: PathBuf,
    collection: PathBuf,
}

fn inputs_from_report(
    report_path: &Path,
    collection: Option<&Path>,
) -> anyhow::Result<SummaryInputs> {
    let report = RankReport::read(report_path)?;
    let top = report
        .top()
        .with_context(|| format!("rank report {} has no results", report_path.display()))?;
    let origin = top.origin.clone().with_context(|| {
        format!("top result {} has no origin document", top.model_path.display())
    })?;

    Ok(SummaryInputs {
        model: top.model_path.clone(),
        origin,
        collection: collection.map_or_else(|| report.collection_path.clone(), Path::to_path_buf),
    })
}

fn resolve_inputs(
    report: Option<&Path>,
    model: Option<&Path>,
    origin: Option<&Path>,
    collection: Option<&Path>,
) -> anyhow::Result<SummaryInputs> {
    if let Some(report) = report {
        return inputs_from_report(report, collection);
    }
    match (model, origin, collection) {
        (Some(model), Some(origin), Some(collection)) => Ok(SummaryInputs {
            model: model.to_path_buf(),
            origin: origin.to_path_buf(),
            collection: collection.to_path_buf(),
        }),
        _ => anyhow::bail!("--report, or --model with --origin and --collection, is required"),
    }
}

fn summarize_document(
    inputs: &SummaryInputs,
) -> anyhow::Result<(OriginDocument, Option<Summary>)> {
    require_path(&inputs.model)?;
    require_path(&inputs.origin)?;
    require_path(&inputs.collection)?;

    let model = load_document_model(&inputs.model)?;
    let collection = load_model(&inputs.collection)?;
    let document = OriginDocument::read(&inputs.origin)?;

    let summary = Summarizer::new(&model, &collection).summarize(&document.sentences);
    tracing::debug!(
        origin = %inputs.origin.display(),
        sentences = document.sentences.len(),
        "summarized document"
    );
    Ok((document, summary))
}

fn format_summary(document: &OriginDocument, summary: Option<&Summary>) -> String {
    let mut out = format!(
        "Link: {}\nTitle: {}\nDate: {}\n",
        document.link, document.title, document.date
    );
    match summary {
        Some(summary) => {
            out.push_str(&format!("Summary: {}\n", summary.sentence));
            out.push_str(&format!("Centrality: {:.4}\n", summary.centrality));
        }
        None => out.push_str("Summary: (no sentences)\n"),
    }
    out
}

pub fn run(
    report: Option<&Path>,
    model: Option<&Path>,
    origin: Option<&Path>,
    collection: Option<&Path>,
) -> anyhow::Result<()> {
    let inputs = resolve_inputs(report, model, origin, collection)?;
    let (document, summary) = summarize_document(&inputs)?;
    print!("{}", format_summary(&document, summary.as_ref()));
    Ok(())
}
