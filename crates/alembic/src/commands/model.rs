use crate::cli::ModelMode;
use alembic_core::{
    Config, DocumentMetadata, LanguageModel, OriginDocument, list_files, require_path, save_model,
    vectorize_file,
};
use std::path::{Path, PathBuf};

/// Files written by one `model` run
#[derive(Debug, Default)]
struct ModelOutput {
    documents: Vec<PathBuf>,
    collection: Option<PathBuf>,
}

fn document_vector(path: &Path, documents: bool) -> anyhow::Result<LanguageModel> {
    if documents {
        return Ok(OriginDocument::read(path)?.vectorize());
    }
    let mut vector = vectorize_file(path)?;
    vector.set_metadata(DocumentMetadata {
        origin: path.to_path_buf(),
        ..Default::default()
    });
    Ok(vector)
}

fn build_models(
    dir: &Path,
    prefix: &str,
    mode: ModelMode,
    documents: bool,
    smoothing_k: f64,
) -> anyhow::Result<ModelOutput> {
    require_path(dir)?;
    let files = list_files(dir)?;
    let mut output = ModelOutput::default();
    let mut collection = LanguageModel::new();

    for (i, path) in files.iter().enumerate() {
        let mut vector = document_vector(path, documents)?;
        if mode.all() {
            collection.merge(&vector);
        }
        if mode.each() {
            vector.calculate_probabilities(smoothing_k);
            let out = PathBuf::from(format!("{prefix}_{i}.model"));
            save_model(&out, &vector)?;
            tracing::debug!(source = %path.display(), out = %out.display(), "wrote document model");
            output.documents.push(out);
        }
    }

    if mode.all() {
        collection.calculate_probabilities(smoothing_k);
        let out = PathBuf::from(format!("{prefix}_all.model"));
        save_model(&out, &collection)?;
        tracing::info!(
            out = %out.display(),
            vocabulary = collection.vocabulary_size(),
            tokens = collection.num_tokens(),
            "wrote collection model"
        );
        output.collection = Some(out);
    }

    Ok(output)
}

pub fn run(
    dir: &Path,
    prefix: &str,
    mode: ModelMode,
    documents: bool,
    smoothing: Option<f64>,
    mut config: Config,
) -> anyhow::Result<()> {
    if let Some(k) = smoothing {
        config.smoothing_k = k;
    }
    config.validate()?;
    let output = build_models(dir, prefix, mode, documents, config.smoothing_k)?;

    if mode.each() {
        println!("Wrote {} document models", output.documents.len());
    }
    if let Some(path) = output.collection {
        println!("Wrote collection model {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alembic_core::{load_document_model, load_model};
    use tempfile::TempDir;

    fn sample_dir(temp: &TempDir) -> PathBuf {
        let dir = temp.path().join("docs");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("a.txt"), "the flu shot\n").unwrap();
        std::fs::write(dir.join("b.txt"), "the flu season\n").unwrap();
        dir
    }

    #[test]
    fn test_both_mode_writes_every_file() {
        let temp = TempDir::new().unwrap();
        let dir = sample_dir(&temp);
        let prefix = temp.path().join("m").display().to_string();

        let output = build_models(&dir, &prefix, ModelMode::Both, false, 1.0).unwrap();
        assert_eq!(output.documents.len(), 2);

        let first = load_document_model(&output.documents[0]).unwrap();
        assert_eq!(first.metadata().unwrap().origin, dir.join("a.txt"));
        assert!(first.bigram("flu", "shot").is_some());

        let collection = load_model(&output.collection.unwrap()).unwrap();
        assert_eq!(collection.count("the"), 2);
        assert_eq!(collection.count("flu"), 2);
    }

    #[test]
    fn test_all_mode_skips_document_models() {
        let temp = TempDir::new().unwrap();
        let dir = sample_dir(&temp);
        let prefix = temp.path().join("m").display().to_string();

        let output = build_models(&dir, &prefix, ModelMode::All, false, 1.0).unwrap();
        assert!(output.documents.is_empty());
        assert!(!temp.path().join("m_0.model").exists());
        assert!(temp.path().join("m_all.model").exists());
    }

    #[test]
    fn test_missing_dir() {
        let temp = TempDir::new().unwrap();
        let result = build_models(&temp.path().join("nope"), "m", ModelMode::Each, false, 1.0);
        assert!(result.is_err());
    }
}
