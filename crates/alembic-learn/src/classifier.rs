//! Fold training, held-out evaluation and cross-validation

use crate::bayes::classify;
use crate::partition::partition;
use alembic_core::{
    Config, Error, LanguageModel, Polarity, Result, list_files, load_class_pair, require_path,
    save_class_pair, vectorize_file,
};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// One polarity's training documents, sorted and vectorized once
#[derive(Debug, Clone)]
pub struct ClassCorpus {
    dir: PathBuf,
    polarity: Polarity,
    files: Vec<PathBuf>,
    vectors: Vec<LanguageModel>,
}

impl ClassCorpus {
    /// Read and vectorize every file in `dir`
    pub fn load(dir: &Path, polarity: Polarity) -> Result<Self> {
        let files = list_files(dir)?;
        let vectors = files
            .iter()
            .map(|path| vectorize_file(path))
            .collect::<Result<Vec<_>>>()?;

        tracing::info!(
            dir = %dir.display(),
            polarity = ?polarity,
            documents = files.len(),
            "loaded class corpus"
        );

        Ok(Self {
            dir: dir.to_path_buf(),
            polarity,
            files,
            vectors,
        })
    }

    /// Held-out file blocks, one per fold
    pub fn folds(&self, fold_count: usize) -> Result<Vec<Vec<PathBuf>>> {
        if self.files.len() < fold_count {
            return Err(Error::TooFewDocuments {
                dir: self.dir.clone(),
                found: self.files.len(),
                folds: fold_count,
            });
        }
        let folds = partition(&self.files, fold_count)?;
        tracing::debug!(
            dir = %self.dir.display(),
            fold_size = folds.first().map_or(0, Vec::len),
            "partitioned corpus"
        );
        Ok(folds)
    }

    /// Merge every document outside `held_out` into one class model
    fn train_excluding(&self, held_out: &[PathBuf], k: f64) -> LanguageModel {
        let held_out: HashSet<&PathBuf> = held_out.iter().collect();
        let mut model = LanguageModel::with_polarity(self.polarity);
        for (path, vector) in self.files.iter().zip(&self.vectors) {
            if !held_out.contains(&path) {
                model.merge(vector);
            }
        }
        model.calculate_probabilities(k);
        model
    }

    /// Fraction of the held-out documents classified as this corpus's polarity
    fn held_out_accuracy(&self, held_out: &[PathBuf], models: &FoldModels) -> f64 {
        if held_out.is_empty() {
            return 0.0;
        }
        let held_out: HashSet<&PathBuf> = held_out.iter().collect();
        let correct = self
            .files
            .iter()
            .zip(&self.vectors)
            .filter(|(path, vector)| {
                held_out.contains(path) && models.classify(vector) == self.polarity
            })
            .count();
        correct as f64 / held_out.len() as f64
    }
}

/// Positive and negative class models trained for one fold
#[derive(Debug, Clone, PartialEq)]
pub struct FoldModels {
    pub positive: LanguageModel,
    pub negative: LanguageModel,
}

impl FoldModels {
    pub fn classify(&self, vector: &LanguageModel) -> Polarity {
        classify(vector, &self.positive, &self.negative)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        save_class_pair(path, &self.positive, &self.negative)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let (positive, negative) = load_class_pair(path)?;
        Ok(Self { positive, negative })
    }
}

/// `<prefix>_<fold>.nb`
pub fn fold_model_path(prefix: &str, fold: usize) -> PathBuf {
    PathBuf::from(format!("{prefix}_{fold}.nb"))
}

pub fn save_fold_models(prefix: &str, models: &[FoldModels]) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(models.len());
    for (fold, pair) in models.iter().enumerate() {
        let path = fold_model_path(prefix, fold);
        tracing::info!(path = %path.display(), fold, "writing fold model");
        pair.save(&path)?;
        written.push(path);
    }
    Ok(written)
}

/// Load `fold_count` fold files; every one must exist before any is read
pub fn load_fold_models(prefix: &str, fold_count: usize) -> Result<Vec<FoldModels>> {
    let paths: Vec<PathBuf> = (0..fold_count).map(|f| fold_model_path(prefix, f)).collect();
    for path in &paths {
        require_path(path)?;
    }
    paths
        .iter()
        .map(|path| {
            tracing::info!(path = %path.display(), "reading fold model");
            FoldModels::load(path)
        })
        .collect()
}

/// Per-fold accuracies from one cross-validation run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossValidation {
    pub positive_accuracies: Vec<f64>,
    pub negative_accuracies: Vec<f64>,
    /// Mean of the positive and negative accuracy of each fold
    pub fold_accuracies: Vec<f64>,
}

impl CrossValidation {
    /// Mean accuracy over all folds
    pub fn mean(&self) -> f64 {
        if self.fold_accuracies.is_empty() {
            return 0.0;
        }
        self.fold_accuracies.iter().sum::<f64>() / self.fold_accuracies.len() as f64
    }
}

#[derive(Debug, Clone)]
pub struct Classifier {
    smoothing_k: f64,
    fold_count: usize,
}

impl Classifier {
    pub fn new(smoothing_k: f64, fold_count: usize) -> Result<Self> {
        if fold_count == 0 {
            return Err(Error::InvalidFoldCount(fold_count));
        }
        Ok(Self {
            smoothing_k,
            fold_count,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.smoothing_k, config.fold_count)
    }

    pub fn fold_count(&self) -> usize {
        self.fold_count
    }

    /// Train on everything except the given held-out files
    pub fn train_fold(
        &self,
        positive: &ClassCorpus,
        pos_held: &[PathBuf],
        negative: &ClassCorpus,
        neg_held: &[PathBuf],
    ) -> FoldModels {
        tracing::debug!(
            pos_held = pos_held.len(),
            neg_held = neg_held.len(),
            "training fold"
        );
        FoldModels {
            positive: positive.train_excluding(pos_held, self.smoothing_k),
            negative: negative.train_excluding(neg_held, self.smoothing_k),
        }
    }

    pub fn train(
        &self,
        positive: &ClassCorpus,
        negative: &ClassCorpus,
    ) -> Result<Vec<FoldModels>> {
        let pos_folds = positive.folds(self.fold_count)?;
        let neg_folds = negative.folds(self.fold_count)?;

        Ok(pos_folds
            .iter()
            .zip(&neg_folds)
            .map(|(pos_held, neg_held)| self.train_fold(positive, pos_held, negative, neg_held))
            .collect())
    }

    /// Score each fold's held-out documents against that fold's models
    pub fn evaluate(
        &self,
        positive: &ClassCorpus,
        negative: &ClassCorpus,
        models: &[FoldModels],
    ) -> Result<CrossValidation> {
        if models.len() != self.fold_count {
            return Err(Error::InvalidFoldCount(models.len()));
        }
        let pos_folds = positive.folds(self.fold_count)?;
        let neg_folds = negative.folds(self.fold_count)?;

        let mut result = CrossValidation {
            positive_accuracies: Vec::with_capacity(self.fold_count),
            negative_accuracies: Vec::with_capacity(self.fold_count),
            fold_accuracies: Vec::with_capacity(self.fold_count),
        };

        for (fold, pair) in models.iter().enumerate() {
            let pos_acc = positive.held_out_accuracy(&pos_folds[fold], pair);
            let neg_acc = negative.held_out_accuracy(&neg_folds[fold], pair);
            let acc = (pos_acc + neg_acc) / 2.0;
            tracing::info!(fold, pos_acc, neg_acc, acc, "fold evaluated");

            result.positive_accuracies.push(pos_acc);
            result.negative_accuracies.push(neg_acc);
            result.fold_accuracies.push(acc);
        }

        Ok(result)
    }

    /// Train and evaluate every fold in memory
    pub fn cross_validate(&self, pos_dir: &Path, neg_dir: &Path) -> Result<CrossValidation> {
        require_path(pos_dir)?;
        require_path(neg_dir)?;

        let positive = ClassCorpus::load(pos_dir, Polarity::Positive)?;
        let negative = ClassCorpus::load(neg_dir, Polarity::Negative)?;
        let models = self.train(&positive, &negative)?;
        self.evaluate(&positive, &negative, &models)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_corpus(dir: &Path, docs: &[&str]) {
        std::fs::create_dir_all(dir).unwrap();
        for (i, doc) in docs.iter().enumerate() {
            std::fs::write(dir.join(format!("cv{i:03}.txt")), doc).unwrap();
        }
    }

    fn sample_dirs() -> (TempDir, PathBuf, PathBuf) {
        let temp = TempDir::new().unwrap();
        let pos = temp.path().join("pos");
        let neg = temp.path().join("neg");
        write_corpus(
            &pos,
            &[
                "a wonderful moving film",
                "wonderful acting and a great cast",
                "great fun and wonderful",
                "a great and moving story",
            ],
        );
        write_corpus(
            &neg,
            &[
                "a boring awful film",
                "awful acting and a dull cast",
                "dull and boring plot",
                "a boring and awful story",
            ],
        );
        (temp, pos, neg)
    }

    #[test]
    fn test_folds_are_sorted_contiguous_blocks() {
        let (_temp, pos, _neg) = sample_dirs();
        let positive = ClassCorpus::load(&pos, Polarity::Positive).unwrap();

        let folds = positive.folds(2).unwrap();
        assert_eq!(
            folds,
            vec![
                vec![pos.join("cv000.txt"), pos.join("cv001.txt")],
                vec![pos.join("cv002.txt"), pos.join("cv003.txt")],
            ]
        );
        assert!(matches!(
            positive.folds(5),
            Err(Error::TooFewDocuments { found: 4, .. })
        ));
    }

    #[test]
    fn test_new_rejects_zero_folds() {
        assert!(matches!(
            Classifier::new(1.0, 0),
            Err(Error::InvalidFoldCount(0))
        ));
    }

    #[test]
    fn test_train_fold_excludes_held_out() {
        let (_temp, pos, neg) = sample_dirs();
        let positive = ClassCorpus::load(&pos, Polarity::Positive).unwrap();
        let negative = ClassCorpus::load(&neg, Polarity::Negative).unwrap();
        let classifier = Classifier::new(1.0, 2).unwrap();

        let pos_folds = positive.folds(2).unwrap();
        let neg_folds = negative.folds(2).unwrap();

        let fold0 = classifier.train_fold(&positive, &pos_folds[0], &negative, &neg_folds[0]);
        // cv000 and cv001 are held out of fold 0; "fun" only appears in cv002
        assert!(fold0.positive.unigram("fun").is_some());
        assert!(fold0.positive.unigram("acting").is_none());
        assert_eq!(fold0.positive.polarity(), Some(Polarity::Positive));
        assert_eq!(fold0.negative.polarity(), Some(Polarity::Negative));

        let fold1 = classifier.train_fold(&positive, &pos_folds[1], &negative, &neg_folds[1]);
        assert!(fold1.positive.unigram("fun").is_none());
        assert!(fold1.positive.unigram("acting").is_some());
    }

    #[test]
    fn test_cross_validate_reports_each_fold() {
        let (_temp, pos, neg) = sample_dirs();
        let classifier = Classifier::new(1.0, 2).unwrap();

        let result = classifier.cross_validate(&pos, &neg).unwrap();
        assert_eq!(result.fold_accuracies.len(), 2);
        for (i, acc) in result.fold_accuracies.iter().enumerate() {
            let expected = (result.positive_accuracies[i] + result.negative_accuracies[i]) / 2.0;
            assert!((acc - expected).abs() < 1e-12);
            assert!((0.0..=1.0).contains(acc));
        }
        assert!(result.mean() > 0.5, "mean accuracy {}", result.mean());
    }

    #[test]
    fn test_too_few_documents() {
        let (_temp, pos, neg) = sample_dirs();
        let classifier = Classifier::new(1.0, 10).unwrap();
        let result = classifier.cross_validate(&pos, &neg);
        assert!(matches!(
            result,
            Err(Error::TooFewDocuments {
                found: 4,
                folds: 10,
                ..
            })
        ));
    }

    #[test]
    fn test_missing_directory() {
        let (temp, pos, _neg) = sample_dirs();
        let classifier = Classifier::new(1.0, 2).unwrap();
        let result = classifier.cross_validate(&pos, &temp.path().join("missing"));
        assert!(matches!(result, Err(Error::PathNotFound { .. })));
    }

    #[test]
    fn test_fold_files_roundtrip() {
        let (temp, pos, neg) = sample_dirs();
        let positive = ClassCorpus::load(&pos, Polarity::Positive).unwrap();
        let negative = ClassCorpus::load(&neg, Polarity::Negative).unwrap();
        let classifier = Classifier::new(1.0, 2).unwrap();
        let models = classifier.train(&positive, &negative).unwrap();

        let prefix = temp.path().join("reviews").to_string_lossy().to_string();
        let written = save_fold_models(&prefix, &models).unwrap();
        assert_eq!(written.len(), 2);
        assert!(written[1].to_string_lossy().ends_with("reviews_1.nb"));

        let loaded = load_fold_models(&prefix, 2).unwrap();
        assert_eq!(loaded, models);

        let from_files = classifier.evaluate(&positive, &negative, &loaded).unwrap();
        let in_memory = classifier.evaluate(&positive, &negative, &models).unwrap();
        assert_eq!(from_files, in_memory);
    }

    #[test]
    fn test_load_fold_models_requires_every_file() {
        let temp = TempDir::new().unwrap();
        let prefix = temp.path().join("none").to_string_lossy().to_string();
        assert!(matches!(
            load_fold_models(&prefix, 3),
            Err(Error::PathNotFound { .. })
        ));
    }

    #[test]
    fn test_classify_review_file() {
        let (temp, pos, neg) = sample_dirs();
        let positive = ClassCorpus::load(&pos, Polarity::Positive).unwrap();
        let negative = ClassCorpus::load(&neg, Polarity::Negative).unwrap();
        let models = FoldModels {
            positive: positive.train_excluding(&[], 1.0),
            negative: negative.train_excluding(&[], 1.0),
        };

        let review = temp.path().join("review.txt");
        std::fs::write(&review, "dull and awful").unwrap();
        assert_eq!(models.classify(&vectorize_file(&review).unwrap()), Polarity::Negative);
    }

    #[test]
    fn test_mean_accuracy() {
        let cv = CrossValidation {
            positive_accuracies: vec![1.0, 0.5],
            negative_accuracies: vec![0.5, 0.5],
            fold_accuracies: vec![0.75, 0.5],
        };
        assert!((cv.mean() - 0.625).abs() < 1e-12);
        let json = serde_json::to_string(&cv).unwrap();
        assert!(json.contains("fold_accuracies"));
    }
}
