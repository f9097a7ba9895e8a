use ndarray::{Array1, Array2, ArrayBase, Data, Ix1, Ix2, Zip};
use ndarray_rand::rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::dataset::Float;
use crate::error::Result;
use crate::k_means::KMeansParams;

/// K-means clustering aims to partition a set of unlabeled observations into
/// clusters, where each observation belongs to the cluster with the nearest
/// mean. The mean of the points within a cluster is called *centroid*.
///
/// This is the classic *standard algorithm* (also known as Lloyd's
/// algorithm), run once per fit:
/// - initialization step: seed the centroids with one of the
///   [`KMeansInit`](crate::KMeansInit) strategies;
/// - assignment step: assign each observation to the nearest centroid
///   (squared Euclidean distance, exact ties broken toward the lowest
///   cluster index);
/// - update step: recompute each centroid as the mean of its members. A
///   cluster that ends an iteration empty keeps its previous centroid for
///   that iteration (freeze policy).
///
/// Assignment and update repeat until no observation changes cluster, or the
/// total squared centroid movement drops to `tolerance` or below (then
/// `converged()` reports `true`), or until `max_n_iterations` is exhausted
/// (then it reports `false`).
///
/// The fitted model is a pure function of the observations and of the rng
/// handed to [`params_with_rng`](KMeans::params_with_rng): refitting with
/// the same seed reproduces centroids and labels exactly.
///
/// ```
/// use customer_segmentation::KMeans;
/// use ndarray::array;
/// use ndarray_rand::rand::SeedableRng;
/// use rand_xoshiro::Xoshiro256Plus;
///
/// let observations = array![[0.0, 0.0], [0.2, 0.1], [9.0, 9.0], [9.1, 8.9]];
/// let rng = Xoshiro256Plus::seed_from_u64(42);
/// let model = KMeans::params_with_rng(2, rng).fit(&observations).unwrap();
///
/// assert_eq!(model.labels()[0], model.labels()[1]);
/// assert_eq!(model.labels()[2], model.labels()[3]);
/// assert!(model.converged());
/// ```
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct KMeans<F> {
    centroids: Array2<F>,
    labels: Array1<usize>,
    cluster_counts: Array1<usize>,
    inertia: F,
    n_iterations: u64,
    converged: bool,
}

impl<F: Float> KMeans<F> {
    /// Configure a run with default hyperparameters and a fixed default
    /// seed; see [`KMeansParams`] for the defaults.
    pub fn params(n_clusters: usize) -> KMeansParams<F, Xoshiro256Plus> {
        KMeansParams::new(n_clusters, Xoshiro256Plus::seed_from_u64(42))
    }

    /// Configure a run with an explicitly seeded random number generator.
    pub fn params_with_rng<R: Rng>(n_clusters: usize, rng: R) -> KMeansParams<F, R> {
        KMeansParams::new(n_clusters, rng)
    }

    /// The final centroids as a matrix with shape `(n_clusters, n_features)`.
    pub fn centroids(&self) -> &Array2<F> {
        &self.centroids
    }

    /// The cluster index of every training observation, in input order.
    pub fn labels(&self) -> &Array1<usize> {
        &self.labels
    }

    /// The number of training observations in each cluster.
    pub fn cluster_counts(&self) -> &Array1<usize> {
        &self.cluster_counts
    }

    /// The within-cluster sum of squares of the training set: the total
    /// squared Euclidean distance from each observation to its centroid.
    pub fn inertia(&self) -> F {
        self.inertia
    }

    /// How many assignment/update iterations the run actually used.
    pub fn n_iterations(&self) -> u64 {
        self.n_iterations
    }

    /// Whether the run ended by convergence rather than the iteration cap.
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Assign each row of `observations` to the nearest frozen centroid,
    /// with the same lowest-index tie-break as training.
    pub fn predict<D: Data<Elem = F>>(&self, observations: &ArrayBase<D, Ix2>) -> Array1<usize> {
        let mut labels = Array1::zeros(observations.nrows());
        Zip::from(observations.rows())
            .and(&mut labels)
            .for_each(|observation, label| {
                *label = closest_centroid(&self.centroids, &observation).0;
            });
        labels
    }
}

impl<F: Float, R: Rng + Clone> KMeansParams<F, R> {
    /// Given an input matrix `observations`, with shape
    /// `(n_observations, n_features)`, `fit` identifies `n_clusters`
    /// centroids based on the training data distribution and returns the
    /// fitted [`KMeans`] model.
    pub fn fit<D: Data<Elem = F>>(&self, observations: &ArrayBase<D, Ix2>) -> Result<KMeans<F>> {
        let observations = observations.view();
        let n_samples = observations.nrows();
        self.validate(n_samples)?;

        let mut rng = self.rng().clone();
        let n_clusters = self.n_clusters();
        let mut centroids = self.init().run(n_clusters, observations, &mut rng);

        let mut labels = Array1::zeros(n_samples);
        let mut dists = Array1::zeros(n_samples);
        update_labels_and_dists(&centroids, &observations, &mut labels, &mut dists);

        let mut converged = false;
        let mut n_iterations = 0;
        for n_iter in 1..=self.max_iterations() {
            n_iterations = n_iter;
            let new_centroids = compute_centroids(&centroids, &observations, &labels);
            let movement = (&new_centroids - &centroids).mapv(|x| x * x).sum();
            centroids = new_centroids;

            let previous = labels.clone();
            update_labels_and_dists(&centroids, &observations, &mut labels, &mut dists);
            log::debug!("iteration {}: centroid movement {}", n_iter, movement);

            if labels == previous || movement <= self.convergence_tolerance() {
                converged = true;
                break;
            }
        }
        if converged {
            log::info!(
                "k-means converged after {} iterations (k = {})",
                n_iterations,
                n_clusters
            );
        } else {
            log::info!(
                "k-means hit the iteration cap ({}) without converging (k = {})",
                n_iterations,
                n_clusters
            );
        }

        let mut cluster_counts = Array1::zeros(n_clusters);
        for &label in &labels {
            cluster_counts[label] += 1;
        }
        Ok(KMeans {
            centroids,
            labels,
            cluster_counts,
            inertia: dists.sum(),
            n_iterations,
            converged,
        })
    }
}

/// `compute_centroids` returns a 2-dimensional array, where the i-th row
/// corresponds to the mean of the observations assigned to the i-th cluster.
/// An empty cluster keeps its previous centroid for this iteration.
fn compute_centroids<F: Float>(
    old_centroids: &Array2<F>,
    // (n_observations, n_features)
    observations: &ArrayBase<impl Data<Elem = F>, Ix2>,
    // (n_observations,)
    labels: &ArrayBase<impl Data<Elem = usize>, Ix1>,
) -> Array2<F> {
    let n_clusters = old_centroids.nrows();
    let mut counts: Array1<usize> = Array1::zeros(n_clusters);
    let mut centroids = Array2::zeros((n_clusters, observations.ncols()));

    Zip::from(observations.rows())
        .and(labels)
        .for_each(|observation, &label| {
            let mut centroid = centroids.row_mut(label);
            centroid += &observation;
            counts[label] += 1;
        });

    Zip::from(centroids.rows_mut())
        .and(old_centroids.rows())
        .and(&counts)
        .for_each(|mut centroid, old_centroid, &count| {
            if count == 0 {
                centroid.assign(&old_centroid);
            } else {
                centroid /= F::cast(count);
            }
        });
    centroids
}

// Updates `labels` with the index of the closest centroid of each
// observation and `dists` with the squared distance to it.
fn update_labels_and_dists<F: Float>(
    centroids: &Array2<F>,
    observations: &ArrayBase<impl Data<Elem = F>, Ix2>,
    labels: &mut Array1<usize>,
    dists: &mut Array1<F>,
) {
    Zip::from(observations.rows())
        .and(labels)
        .and(dists)
        .for_each(|observation, label, dist| {
            let (l, d) = closest_centroid(centroids, &observation);
            *label = l;
            *dist = d;
        });
}

/// Given a matrix of centroids with shape `(n_centroids, n_features)` and an
/// observation, return the index of the closest centroid and the squared
/// distance to it. The strict comparison keeps the lowest index on ties.
pub(crate) fn closest_centroid<F: Float>(
    centroids: &ArrayBase<impl Data<Elem = F>, Ix2>,
    observation: &ArrayBase<impl Data<Elem = F>, Ix1>,
) -> (usize, F) {
    let first_centroid = centroids.row(0);
    let (mut closest_index, mut minimum_distance) =
        (0, sq_l2_dist(&first_centroid, observation));

    for (centroid_index, centroid) in centroids.rows().into_iter().enumerate() {
        let distance = sq_l2_dist(&centroid, observation);
        if distance < minimum_distance {
            closest_index = centroid_index;
            minimum_distance = distance;
        }
    }
    (closest_index, minimum_distance)
}

pub(crate) fn sq_l2_dist<F: Float>(
    a: &ArrayBase<impl Data<Elem = F>, Ix1>,
    b: &ArrayBase<impl Data<Elem = F>, Ix1>,
) -> F {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| (x - y) * (x - y))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::k_means::KMeansInit;
    use crate::standardize::StandardScaler;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn two_far_blobs() -> Array2<f64> {
        array![
            [0.0, 0.0],
            [0.0, 1.0],
            [1.0, 0.0],
            [10.0, 10.0],
            [10.0, 11.0],
            [11.0, 10.0]
        ]
    }

    #[test]
    fn separated_blobs_are_recovered_after_standardization() {
        let raw = two_far_blobs();
        let points = StandardScaler::new().fit(&raw).unwrap().transform(&raw);

        let model = KMeans::params(2).fit(&points).unwrap();
        assert!(model.converged());

        let labels = model.labels();
        // Grouping must be exact; the numbering of the two labels is arbitrary.
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[0], labels[2]);
        assert_eq!(labels[3], labels[4]);
        assert_eq!(labels[3], labels[5]);
        assert_ne!(labels[0], labels[3]);
    }

    #[test]
    fn assignment_is_total_and_in_range() {
        let points = two_far_blobs();
        for k in 1..=points.nrows() {
            let model = KMeans::params(k).fit(&points).unwrap();
            assert_eq!(model.labels().len(), points.nrows());
            assert!(model.labels().iter().all(|&l| l < k));
            assert_eq!(model.cluster_counts().sum(), points.nrows());
        }
    }

    #[test]
    fn same_seed_gives_identical_models() {
        use ndarray_rand::rand::SeedableRng;
        use rand_xoshiro::Xoshiro256Plus;

        let points = two_far_blobs();
        for init in [KMeansInit::Random, KMeansInit::KMeansPlusPlus] {
            let fit = |seed| {
                KMeans::params_with_rng(3, Xoshiro256Plus::seed_from_u64(seed))
                    .init_method(init)
                    .fit(&points)
                    .unwrap()
            };
            let first = fit(1234);
            let second = fit(1234);
            assert_eq!(first.labels(), second.labels());
            assert_abs_diff_eq!(first.centroids(), second.centroids(), epsilon = 1e-12);
        }
    }

    #[test]
    fn one_cluster_per_point_has_zero_inertia() {
        let points = two_far_blobs();
        let model = KMeans::params(points.nrows()).fit(&points).unwrap();

        assert!(model.converged());
        assert_abs_diff_eq!(model.inertia(), 0.0, epsilon = 1e-12);
        // Every cluster holds exactly one point.
        assert!(model.cluster_counts().iter().all(|&c| c == 1));
    }

    #[test]
    fn empty_input_is_rejected() {
        let points = Array2::<f64>::zeros((0, 2));
        let res = KMeans::params(1).fit(&points);
        assert!(matches!(res, Err(crate::Error::EmptyInput)));
    }

    #[test]
    fn single_cluster_centroid_is_the_global_mean() {
        let points = two_far_blobs();
        let model = KMeans::params(1).fit(&points).unwrap();

        let expected = points.mean_axis(ndarray::Axis(0)).unwrap();
        assert_abs_diff_eq!(model.centroids().row(0), expected, epsilon = 1e-12);
        assert!(model.labels().iter().all(|&l| l == 0));
    }

    #[test]
    fn ties_break_toward_the_lowest_cluster_index() {
        let centroids = array![[0.0, 0.0], [2.0, 0.0]];
        let observation = array![1.0, 0.0];
        let (index, dist) = closest_centroid(&centroids, &observation);
        assert_eq!(index, 0);
        assert_abs_diff_eq!(dist, 1.0);
    }

    #[test]
    fn compute_centroids_averages_members() {
        let observations = array![[0.0, 0.0], [2.0, 2.0], [10.0, 0.0]];
        let labels = array![0, 0, 1];
        let old_centroids = array![[5.0, 5.0], [9.0, 1.0]];

        let centroids = compute_centroids(&old_centroids, &observations, &labels);
        assert_abs_diff_eq!(centroids, array![[1.0, 1.0], [10.0, 0.0]], epsilon = 1e-12);
    }

    #[test]
    fn empty_cluster_keeps_its_previous_centroid() {
        let observations = array![[1.0, 2.0]];
        let labels = array![0];
        let old_centroids = array![[7.0, 7.0], [3.0, 4.0]];

        let centroids = compute_centroids(&old_centroids, &observations, &labels);
        assert_abs_diff_eq!(centroids, array![[1.0, 2.0], [3.0, 4.0]], epsilon = 1e-12);
    }

    #[test]
    fn predict_matches_training_labels() {
        let points = two_far_blobs();
        let model = KMeans::params(2).fit(&points).unwrap();
        assert_eq!(&model.predict(&points), model.labels());
    }

    #[test]
    fn predict_assigns_new_points_to_the_nearest_blob() {
        let points = two_far_blobs();
        let model = KMeans::params(2).fit(&points).unwrap();

        let new_points = array![[0.5, 0.5], [10.5, 10.5]];
        let predicted = model.predict(&new_points);
        assert_eq!(predicted[0], model.labels()[0]);
        assert_eq!(predicted[1], model.labels()[3]);
    }

    #[test]
    fn iteration_cap_is_reported() {
        use ndarray_rand::rand::SeedableRng;
        use rand_xoshiro::Xoshiro256Plus;

        // One iteration on spread-out data is not enough to stabilize.
        let points = array![
            [0.0, 0.0],
            [1.0, 5.0],
            [2.0, 1.0],
            [8.0, 3.0],
            [9.0, 9.0],
            [4.0, 7.0],
            [6.0, 2.0],
            [3.0, 8.0]
        ];
        let model = KMeans::params_with_rng(4, Xoshiro256Plus::seed_from_u64(3))
            .max_n_iterations(1)
            .tolerance(1e-12)
            .fit(&points)
            .unwrap();
        assert_eq!(model.n_iterations(), 1);
    }
}
