//! Error types for the segmentation pipeline.
//!
//! Every operation validates its input eagerly and propagates one of these
//! variants to the caller; there is no retry or recovery logic, because the
//! whole workflow is a one-shot, human-supervised computation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The dataset has zero records.
    #[error("dataset has no records")]
    EmptyInput,
    /// A feature column has zero variance, so standardization is undefined.
    /// The caller must decide whether to drop the feature.
    #[error("feature column {0} has zero variance, standardization is undefined")]
    DegenerateFeature(usize),
    /// A requested cluster count outside the range the operation supports:
    /// `[1, n_samples]` for fitting, `(1, n_samples)` for silhouette scoring.
    #[error("k = {k} outside valid range [{min}, {max}]")]
    InvalidK { k: usize, min: usize, max: usize },
    /// A label vector whose length differs from the number of records.
    #[error("number of labels ({0}) does not match number of records ({1})")]
    LabelMismatch(usize, usize),
    /// A cluster label outside the declared number of clusters.
    #[error("cluster label {label} outside [0, {n_clusters})")]
    LabelOutOfRange { label: usize, n_clusters: usize },
    /// The id column and the record rows disagree in length.
    #[error("number of ids ({0}) does not match number of records ({1})")]
    IdMismatch(usize, usize),
    /// The feature name list and the record columns disagree in length.
    #[error("number of feature names ({0}) does not match number of feature columns ({1})")]
    FeatureNameMismatch(usize, usize),
    #[error("max_n_iterations cannot be 0")]
    MaxIterations,
    #[error("tolerance must be greater than 0")]
    Tolerance,
}
