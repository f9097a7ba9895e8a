//! Model-order selection: WCSS and silhouette score across candidate
//! cluster counts.
//!
//! [`evaluate`] produces the full curve; choosing the "best" K from it (the
//! elbow in the WCSS column, or the silhouette maximum) is deliberately left
//! to the caller.

use ndarray::{ArrayBase, Data, Ix1, Ix2};
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::dataset::Float;
use crate::error::{Error, Result};
use crate::k_means::{sq_l2_dist, KMeans, KMeansInit};

/// The two model-selection statistics for one candidate cluster count.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct EvaluationRecord<F> {
    pub k: usize,
    /// Within-cluster sum of squares: the total squared Euclidean distance
    /// from each point to its assigned centroid.
    pub wcss: F,
    /// Mean per-point silhouette score, in `[-1, 1]`.
    pub silhouette: F,
}

/// The ordered sequence of [`EvaluationRecord`]s produced by one sweep.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct EvaluationCurve<F> {
    records: Vec<EvaluationRecord<F>>,
}

impl<F> EvaluationCurve<F> {
    pub fn records(&self) -> &[EvaluationRecord<F>] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EvaluationRecord<F>> {
        self.records.iter()
    }
}

impl<'a, F> IntoIterator for &'a EvaluationCurve<F> {
    type Item = &'a EvaluationRecord<F>;
    type IntoIter = std::slice::Iter<'a, EvaluationRecord<F>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Run one K-Means fit for every K in `k_range` and record `(k, wcss,
/// silhouette)` per candidate.
///
/// Every candidate must satisfy `1 < K < n_samples`, since the silhouette
/// score is undefined at the edges; the whole range is validated before any
/// engine run. Each run gets its own `Xoshiro256Plus` seeded from `seed`, so
/// the trials are isolated and the sweep order cannot leak rng state between
/// them. The engine runs with k-means++ seeding to keep the WCSS column
/// monotone in practice.
pub fn evaluate<F: Float, D: Data<Elem = F>>(
    observations: &ArrayBase<D, Ix2>,
    k_range: &[usize],
    seed: u64,
) -> Result<EvaluationCurve<F>> {
    let observations = observations.view();
    let n_samples = observations.nrows();
    if n_samples == 0 {
        return Err(Error::EmptyInput);
    }
    for &k in k_range {
        if k <= 1 || k >= n_samples {
            return Err(Error::InvalidK {
                k,
                min: 2,
                max: n_samples - 1,
            });
        }
    }

    let mut records = Vec::with_capacity(k_range.len());
    for &k in k_range {
        let rng = Xoshiro256Plus::seed_from_u64(seed);
        let model = KMeans::params_with_rng(k, rng)
            .init_method(KMeansInit::KMeansPlusPlus)
            .fit(&observations)?;
        let silhouette = silhouette_score(&observations, model.labels(), k)?;
        log::info!(
            "k = {}: wcss = {}, silhouette = {}",
            k,
            model.inertia(),
            silhouette
        );
        records.push(EvaluationRecord {
            k,
            wcss: model.inertia(),
            silhouette,
        });
    }
    Ok(EvaluationCurve { records })
}

/// Evaluate the quality of a clustering with the mean silhouette score.
///
/// For each point, `a` is the mean Euclidean distance to the other points of
/// its own cluster and `b` the minimum over the other clusters of the mean
/// distance to that cluster's points; the per-point score is
/// `(b - a) / max(a, b)`, or 0 when the point's cluster has size one. Each
/// per-point score lies in `[-1, 1]` and the aggregate is their mean.
///
/// Defined only for `1 < n_clusters < n_samples`; anything else fails with
/// [`Error::InvalidK`].
pub fn silhouette_score<F: Float, D: Data<Elem = F>, L: Data<Elem = usize>>(
    observations: &ArrayBase<D, Ix2>,
    labels: &ArrayBase<L, Ix1>,
    n_clusters: usize,
) -> Result<F> {
    let n_samples = observations.nrows();
    if n_samples == 0 {
        return Err(Error::EmptyInput);
    }
    if labels.len() != n_samples {
        return Err(Error::LabelMismatch(labels.len(), n_samples));
    }
    if n_clusters <= 1 || n_clusters >= n_samples {
        return Err(Error::InvalidK {
            k: n_clusters,
            min: 2,
            max: n_samples - 1,
        });
    }

    let mut counts = vec![0usize; n_clusters];
    for &label in labels.iter() {
        if label >= n_clusters {
            return Err(Error::LabelOutOfRange { label, n_clusters });
        }
        counts[label] += 1;
    }

    let mut totals = vec![F::zero(); n_clusters];
    let mut score_sum = F::zero();
    for (i, point) in observations.rows().into_iter().enumerate() {
        for total in totals.iter_mut() {
            *total = F::zero();
        }
        // Distance from `point` to every cluster; its own contributes zero.
        for (j, other) in observations.rows().into_iter().enumerate() {
            totals[labels[j]] += sq_l2_dist(&point, &other).sqrt();
        }

        let own = labels[i];
        score_sum += if counts[own] == 1 {
            F::zero()
        } else {
            let a = totals[own] / F::cast(counts[own] - 1);
            let mut b = F::infinity();
            for (cluster, (&total, &count)) in totals.iter().zip(counts.iter()).enumerate() {
                if cluster != own && count > 0 {
                    let mean = total / F::cast(count);
                    if mean < b {
                        b = mean;
                    }
                }
            }
            let denom = F::max(a, b);
            if b.is_infinite() || denom == F::zero() {
                // Every other cluster is empty, or the point coincides with
                // both its own and the nearest cluster: nothing to separate.
                F::zero()
            } else {
                (b - a) / denom
            }
        };
    }
    Ok(score_sum / F::cast(n_samples))
}
