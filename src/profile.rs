//! Per-cluster summaries on the original feature scale.
//!
//! Clustering runs on standardized points, but z-scores make poor reading.
//! The profiler goes back to the raw table and reports, per cluster, the
//! arithmetic mean of every original attribute. Reporting only; it has no
//! influence on the clustering itself.

use ndarray::{Array1, Array2, ArrayBase, Data, Ix1};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::dataset::{Dataset, Float};
use crate::error::{Error, Result};

/// Per-cluster means of the original features, plus member counts.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct ClusterProfile<F> {
    means: Array2<F>,
    counts: Array1<usize>,
    feature_names: Vec<String>,
}

impl<F: Float> ClusterProfile<F> {
    /// Mean matrix with shape `(n_clusters, n_features)`, in the original
    /// units. A cluster without members keeps a zero row; check `counts`.
    pub fn means(&self) -> &Array2<F> {
        &self.means
    }

    pub fn counts(&self) -> &Array1<usize> {
        &self.counts
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn n_clusters(&self) -> usize {
        self.means.nrows()
    }
}

/// Compute, for each cluster, the mean of every original (unstandardized)
/// attribute over the records assigned to it.
///
/// `labels` must hold one entry per record, each in `[0, n_clusters)`.
pub fn profile<F: Float, L: Data<Elem = usize>>(
    dataset: &Dataset<F>,
    labels: &ArrayBase<L, Ix1>,
    n_clusters: usize,
) -> Result<ClusterProfile<F>> {
    let n_samples = dataset.nsamples();
    if n_samples == 0 {
        return Err(Error::EmptyInput);
    }
    if labels.len() != n_samples {
        return Err(Error::LabelMismatch(labels.len(), n_samples));
    }
    if n_clusters == 0 {
        return Err(Error::InvalidK {
            k: 0,
            min: 1,
            max: n_samples,
        });
    }

    let mut means = Array2::zeros((n_clusters, dataset.nfeatures()));
    let mut counts = Array1::zeros(n_clusters);
    for (record, &label) in dataset.records().rows().into_iter().zip(labels.iter()) {
        if label >= n_clusters {
            return Err(Error::LabelOutOfRange { label, n_clusters });
        }
        let mut row = means.row_mut(label);
        row += &record;
        counts[label] += 1;
    }
    for (mut row, &count) in means.rows_mut().into_iter().zip(counts.iter()) {
        if count > 0 {
            row /= F::cast(count);
        }
    }

    Ok(ClusterProfile {
        means,
        counts,
        feature_names: dataset.feature_names().to_vec(),
    })
}
