use ndarray::{s, Array1, Array2, ArrayView2, Axis};
use ndarray_rand::rand;
use ndarray_rand::rand::distributions::{Distribution, WeightedIndex};
use ndarray_rand::rand::Rng;

use crate::dataset::Float;
use crate::k_means::algorithm::closest_centroid;

/// Strategy for seeding the initial centroids.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KMeansInit {
    /// Draw `n_clusters` distinct observations uniformly at random.
    Random,
    /// D² weighted seeding: each subsequent centroid is drawn with
    /// probability proportional to the squared distance from the already
    /// chosen ones. Less sensitive to a poor draw than `Random`.
    KMeansPlusPlus,
}

impl KMeansInit {
    pub(crate) fn run<F: Float>(
        &self,
        n_clusters: usize,
        observations: ArrayView2<F>,
        rng: &mut impl Rng,
    ) -> Array2<F> {
        match self {
            Self::Random => random_init(n_clusters, observations, rng),
            Self::KMeansPlusPlus => k_means_plusplus(n_clusters, observations, rng),
        }
    }
}

fn random_init<F: Float>(
    n_clusters: usize,
    observations: ArrayView2<F>,
    rng: &mut impl Rng,
) -> Array2<F> {
    let (n_samples, _) = observations.dim();
    let indices = rand::seq::index::sample(rng, n_samples, n_clusters).into_vec();
    observations.select(Axis(0), &indices)
}

fn k_means_plusplus<F: Float>(
    n_clusters: usize,
    observations: ArrayView2<F>,
    rng: &mut impl Rng,
) -> Array2<F> {
    let (n_samples, n_features) = observations.dim();
    let mut centroids = Array2::zeros((n_clusters, n_features));
    let first = rng.gen_range(0..n_samples);
    centroids.row_mut(0).assign(&observations.row(first));

    let mut dists = Array1::zeros(n_samples);
    for c_cnt in 1..n_clusters {
        min_sq_dists(
            &centroids.slice(s![0..c_cnt, ..]),
            &observations,
            &mut dists,
        );
        // Every remaining point can coincide with a chosen centroid (all
        // weights zero); fall back to a uniform draw in that case.
        let centroid_idx = match WeightedIndex::new(dists.iter()) {
            Ok(weights) => weights.sample(rng),
            Err(_) => rng.gen_range(0..n_samples),
        };
        centroids
            .row_mut(c_cnt)
            .assign(&observations.row(centroid_idx));
    }
    centroids
}

fn min_sq_dists<F: Float>(
    centroids: &ArrayView2<F>,
    observations: &ArrayView2<F>,
    dists: &mut Array1<F>,
) {
    for (observation, dist) in observations.rows().into_iter().zip(dists.iter_mut()) {
        *dist = closest_centroid(centroids, &observation).1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::k_means::algorithm::sq_l2_dist;
    use ndarray::array;
    use ndarray_rand::rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;

    #[test]
    fn random_init_picks_distinct_observations() {
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let observations = array![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [3.0, 3.0]];
        let centroids = KMeansInit::Random.run(4, observations.view(), &mut rng);

        // All four points must be selected exactly once.
        let mut seen = vec![false; 4];
        for centroid in centroids.rows() {
            let idx = observations
                .rows()
                .into_iter()
                .position(|row| row == centroid)
                .unwrap();
            assert!(!seen[idx]);
            seen[idx] = true;
        }
    }

    #[test]
    fn plusplus_spreads_centroids_across_far_blobs() {
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let observations = array![
            [0.0, 0.0],
            [0.0, 1.0],
            [1.0, 0.0],
            [1000.0, 1000.0],
            [1000.0, 1001.0],
            [1001.0, 1000.0]
        ];
        let centroids = KMeansInit::KMeansPlusPlus.run(2, observations.view(), &mut rng);

        // One centroid per blob: their distance must be of blob-gap order.
        let gap = sq_l2_dist(&centroids.row(0), &centroids.row(1));
        assert!(gap > 1_000_000.0);
    }

    #[test]
    fn plusplus_handles_duplicate_points() {
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let observations = array![[1.0, 1.0], [1.0, 1.0], [1.0, 1.0]];
        let centroids = KMeansInit::KMeansPlusPlus.run(3, observations.view(), &mut rng);
        assert_eq!(centroids.dim(), (3, 2));
    }
}
