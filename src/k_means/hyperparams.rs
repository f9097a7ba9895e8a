use ndarray_rand::rand::Rng;

use crate::dataset::Float;
use crate::error::{Error, Result};
use crate::k_means::KMeansInit;

/// The set of hyperparameters for one run of the K-Means algorithm,
/// configured with the builder pattern (see [`KMeans::params`](crate::KMeans::params)).
///
/// `n_clusters` is the only mandatory parameter. Defaults for the rest:
/// * `max_n_iterations = 300`
/// * `tolerance = 1e-4`
/// * `init = KMeansInit::Random`
///
/// Validation happens eagerly when `fit` is called, before any work is done.
#[derive(Clone, Debug, PartialEq)]
pub struct KMeansParams<F: Float, R: Rng> {
    /// The number of clusters we will be looking for in the training dataset.
    n_clusters: usize,
    /// We exit the training loop when the number of training iterations
    /// exceeds `max_n_iterations` even if the convergence condition has not
    /// been met.
    max_n_iterations: u64,
    /// The run is considered converged when the total squared movement of
    /// the centroids over one iteration is lower or equal than `tolerance`.
    tolerance: F,
    /// The initialization strategy used to seed the centroids.
    init: KMeansInit,
    /// The random number generator; carried explicitly so every run is
    /// independently reproducible.
    rng: R,
}

impl<F: Float, R: Rng> KMeansParams<F, R> {
    pub(crate) fn new(n_clusters: usize, rng: R) -> Self {
        Self {
            n_clusters,
            max_n_iterations: 300,
            tolerance: F::cast(1e-4),
            init: KMeansInit::Random,
            rng,
        }
    }

    /// Change the value of `max_n_iterations`
    pub fn max_n_iterations(mut self, max_n_iterations: u64) -> Self {
        self.max_n_iterations = max_n_iterations;
        self
    }

    /// Change the value of `tolerance`
    pub fn tolerance(mut self, tolerance: F) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Change the initialization strategy
    pub fn init_method(mut self, init: KMeansInit) -> Self {
        self.init = init;
        self
    }

    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    pub(crate) fn max_iterations(&self) -> u64 {
        self.max_n_iterations
    }

    pub(crate) fn convergence_tolerance(&self) -> F {
        self.tolerance
    }

    pub(crate) fn init(&self) -> KMeansInit {
        self.init
    }

    pub(crate) fn rng(&self) -> &R {
        &self.rng
    }

    /// Check every precondition before the algorithm touches the data.
    pub(crate) fn validate(&self, n_samples: usize) -> Result<()> {
        if n_samples == 0 {
            return Err(Error::EmptyInput);
        }
        if self.n_clusters < 1 || self.n_clusters > n_samples {
            return Err(Error::InvalidK {
                k: self.n_clusters,
                min: 1,
                max: n_samples,
            });
        }
        if self.max_n_iterations == 0 {
            return Err(Error::MaxIterations);
        }
        if !(self.tolerance > F::zero()) {
            return Err(Error::Tolerance);
        }
        Ok(())
    }
}
