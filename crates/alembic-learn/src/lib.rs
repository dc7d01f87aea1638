//! Naive Bayes polarity classifier with k-fold cross-validation

mod bayes;
mod classifier;
mod partition;

pub use bayes::{classify, naive_bayes};
pub use classifier::{
    ClassCorpus, Classifier, CrossValidation, FoldModels, fold_model_path, load_fold_models,
    save_fold_models,
};
pub use partition::{fold_range, partition};
