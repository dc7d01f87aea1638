use alembic_core::{Config, load_model, require_path};
use alembic_index::{RankReport, Ranker, load_candidates};
use std::path::Path;

fn build_report(
    query: &[String],
    collection_path: &Path,
    models_dir: &Path,
    config: &Config,
) -> anyhow::Result<RankReport> {
    require_path(collection_path)?;
    require_path(models_dir)?;

    let ranker = Ranker::from_config(config)?;
    let collection = load_model(collection_path)?;
    let candidates = load_candidates(models_dir, collection_path)?;
    let ranking = ranker.rank(query, &candidates, &collection);
    tracing::info!(
        weight = ranker.weight(),
        candidates = candidates.len(),
        results = ranking.results.len(),
        "ranked query"
    );

    Ok(RankReport::from_ranking(query, &ranking, collection_path))
}

pub fn run(
    query: &[String],
    collection: &Path,
    models: &Path,
    weight: Option<f64>,
    cutoff: Option<usize>,
    output: Option<&Path>,
    mut config: Config,
) -> anyhow::Result<()> {
    if let Some(weight) = weight {
        config.weight = weight;
    }
    if let Some(cutoff) = cutoff {
        config.cutoff = cutoff;
    }
    config.validate()?;

    let report = build_report(query, collection, models, &config)?;
    print!("{}", report.render(config.min_column_width));

    if let Some(path) = output {
        report.write(path, config.min_column_width)?;
        tracing::info!(path = %path.display(), rows = report.rows.len(), "wrote rank report");
    }
    Ok(())
}
