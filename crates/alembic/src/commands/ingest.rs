use alembic_core::{OriginDocument, PunctuationSplitter, read_records, require_path};
use std::path::{Path, PathBuf};

/// Write one origin document per crawled record as `doc_<i>.txt`
fn write_documents(records_path: &Path, out: &Path) -> anyhow::Result<Vec<PathBuf>> {
    require_path(records_path)?;
    let records = read_records(records_path)?;
    std::fs::create_dir_all(out)?;

    let splitter = PunctuationSplitter;
    let mut written = Vec::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        let doc = OriginDocument::from_record(record, out.join(format!("doc_{i}.txt")), &splitter);
        if doc.sentences.is_empty() {
            tracing::warn!(link = %doc.link, "record has no sentences");
        }
        doc.write()?;
        written.push(doc.path);
    }
    Ok(written)
}

pub fn run(records: &Path, out: &Path) -> anyhow::Result<()> {
    let written = write_documents(records, out)?;
    tracing::info!(count = written.len(), out = %out.display(), "ingested records");
    println!("Wrote {} documents to {}", written.len(), out.display());
    Ok(())
}
