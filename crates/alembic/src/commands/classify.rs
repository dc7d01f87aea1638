use crate::cli::ClassDirs;
use alembic_core::{Config, Polarity, require_path};
use alembic_learn::{ClassCorpus, Classifier, CrossValidation, load_fold_models, save_fold_models};
use serde::Serialize;

/// `--json` output: the per-fold accuracies plus their mean
#[derive(Serialize)]
struct CrossValidationReport<'a> {
    #[serde(flatten)]
    folds: &'a CrossValidation,
    mean: f64,
}

fn json_report(result: &CrossValidation) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&CrossValidationReport {
        folds: result,
        mean: result.mean(),
    })
}

fn classifier(
    dirs: &ClassDirs,
    smoothing: Option<f64>,
    mut config: Config,
) -> anyhow::Result<Classifier> {
    if let Some(k) = smoothing {
        config.smoothing_k = k;
    }
    if let Some(folds) = dirs.folds {
        config.fold_count = folds;
    }
    config.validate()?;
    Ok(Classifier::from_config(&config)?)
}

fn require_dirs(dirs: &ClassDirs) -> anyhow::Result<()> {
    require_path(&dirs.positive)?;
    require_path(&dirs.negative)?;
    Ok(())
}

fn load_corpora(dirs: &ClassDirs) -> anyhow::Result<(ClassCorpus, ClassCorpus)> {
    require_dirs(dirs)?;
    let positive = ClassCorpus::load(&dirs.positive, Polarity::Positive)?;
    let negative = ClassCorpus::load(&dirs.negative, Polarity::Negative)?;
    Ok((positive, negative))
}

fn format_result(result: &CrossValidation) -> String {
    let mut out = String::from("FOLD | POSITIVE | NEGATIVE | ACCURACY\n");
    for (fold, acc) in result.fold_accuracies.iter().enumerate() {
        out.push_str(&format!(
            "{:<4} | {:<8.4} | {:<8.4} | {:.4}\n",
            fold, result.positive_accuracies[fold], result.negative_accuracies[fold], acc
        ));
    }
    out.push_str(&format!("Average accuracy: {:.4}\n", result.mean()));
    out
}

fn print_result(result: &CrossValidation, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", json_report(result)?);
    } else {
        print!("{}", format_result(result));
    }
    Ok(())
}

pub fn run_train(
    dirs: &ClassDirs,
    prefix: &str,
    smoothing: Option<f64>,
    config: Config,
) -> anyhow::Result<()> {
    let classifier = classifier(dirs, smoothing, config)?;
    let (positive, negative) = load_corpora(dirs)?;
    let models = classifier.train(&positive, &negative)?;
    let written = save_fold_models(prefix, &models)?;
    println!("Wrote {} fold models", written.len());
    Ok(())
}

pub fn run_evaluate(
    dirs: &ClassDirs,
    prefix: &str,
    json: bool,
    config: Config,
) -> anyhow::Result<()> {
    let result = evaluate(dirs, prefix, config)?;
    print_result(&result, json)
}

fn evaluate(dirs: &ClassDirs, prefix: &str, config: Config) -> anyhow::Result<CrossValidation> {
    let classifier = classifier(dirs, None, config)?;
    require_dirs(dirs)?;
    let models = load_fold_models(prefix, classifier.fold_count())?;
    let (positive, negative) = load_corpora(dirs)?;
    Ok(classifier.evaluate(&positive, &negative, &models)?)
}

pub fn run_cross_validate(
    dirs: &ClassDirs,
    smoothing: Option<f64>,
    json: bool,
    config: Config,
) -> anyhow::Result<()> {
    let classifier = classifier(dirs, smoothing, config)?;
    let result = classifier.cross_validate(&dirs.positive, &dirs.negative)?;
    print_result(&result, json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_result_lists_folds_and_mean() {
        let result = CrossValidation {
            positive_accuracies: vec![1.0, 0.5],
            negative_accuracies: vec![1.0, 1.0],
            fold_accuracies: vec![1.0, 0.75],
        };
        let text = format_result(&result);
        assert!(text.contains("0    | 1.0000   | 1.0000   | 1.0000"));
        assert!(text.contains("1    | 0.5000   | 1.0000   | 0.7500"));
        assert!(text.ends_with("Average accuracy: 0.8750\n"));
    }

    #[test]
    fn test_json_report_flattens_folds_with_mean() {
        let result = CrossValidation {
            positive_accuracies: vec![1.0, 0.5],
            negative_accuracies: vec![1.0, 1.0],
            fold_accuracies: vec![1.0, 0.75],
        };
        let text = json_report(&result).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["fold_accuracies"], serde_json::json!([1.0, 0.75]));
        assert_eq!(value["positive_accuracies"][1], 0.5);
        assert_eq!(value["mean"], 0.875);
    }

    #[test]
    fn test_classifier_flag_overrides_config() {
        let dirs = ClassDirs {
            positive: PathBuf::from("pos"),
            negative: PathBuf::from("neg"),
            folds: Some(4),
        };
        let classifier = classifier(&dirs, Some(0.5), Config::default()).unwrap();
        assert_eq!(classifier.fold_count(), 4);
    }

    #[test]
    fn test_evaluate_checks_corpus_dirs_before_fold_files() {
        let temp = tempfile::TempDir::new().unwrap();
        let prefix = temp.path().join("nb").display().to_string();
        std::fs::write(format!("{prefix}_0.nb"), "not a model\n").unwrap();
        let dirs = ClassDirs {
            positive: temp.path().join("pos"),
            negative: temp.path().join("neg"),
            folds: Some(1),
        };

        let err = evaluate(&dirs, &prefix, Config::default()).unwrap_err();
        match err.downcast_ref::<alembic_core::Error>() {
            Some(alembic_core::Error::PathNotFound { path }) => assert_eq!(path, &dirs.positive),
            other => panic!("expected missing positive dir, got {other:?}"),
        }
    }

    #[test]
    fn test_classifier_rejects_zero_folds() {
        let dirs = ClassDirs {
            positive: PathBuf::from("pos"),
            negative: PathBuf::from("neg"),
            folds: Some(0),
        };
        assert!(classifier(&dirs, None, Config::default()).is_err());
    }
}
