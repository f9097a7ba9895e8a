//! Customer records and seeded synthetic data generation.

use std::fmt;
use std::iter::Sum;
use std::ops::AddAssign;

use ndarray::{Array1, Array2, ArrayBase, Data, Ix1, Ix2, ScalarOperand};
use ndarray_rand::rand_distr::{StandardNormal, Uniform};
use ndarray_rand::RandomExt;
use rand::distributions::uniform::SampleUniform;
use rand::Rng;
use num_traits::{FromPrimitive, NumAssignOps, NumCast, Signed};

use crate::error::{Error, Result};

/// Floating point numbers usable as feature values.
///
/// The whole pipeline is generic over this trait; it is implemented for
/// `f32` and `f64`.
pub trait Float:
    num_traits::Float
    + FromPrimitive
    + NumAssignOps
    + Signed
    + Default
    + Sum
    + Send
    + Sync
    + fmt::Display
    + fmt::Debug
    + ScalarOperand
    + SampleUniform
    + for<'a> AddAssign<&'a Self>
    + approx::AbsDiffEq
{
    fn cast<T: NumCast>(x: T) -> Self {
        NumCast::from(x).unwrap()
    }
}

impl Float for f32 {}
impl Float for f64 {}

/// An immutable table of customer records.
///
/// Each row of `records` is one customer's numeric attribute vector; `ids`
/// carries the matching customer identifiers in row order, so a cluster
/// assignment can always be reported back against them. Identifiers never
/// take part in any computation.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset<F> {
    ids: Array1<u64>,
    records: Array2<F>,
    feature_names: Vec<String>,
}

impl<F: Float> Dataset<F> {
    pub fn new(ids: Array1<u64>, records: Array2<F>, feature_names: Vec<String>) -> Result<Self> {
        if ids.len() != records.nrows() {
            return Err(Error::IdMismatch(ids.len(), records.nrows()));
        }
        if feature_names.len() != records.ncols() {
            return Err(Error::FeatureNameMismatch(
                feature_names.len(),
                records.ncols(),
            ));
        }
        Ok(Dataset {
            ids,
            records,
            feature_names,
        })
    }

    pub fn nsamples(&self) -> usize {
        self.records.nrows()
    }

    pub fn nfeatures(&self) -> usize {
        self.records.ncols()
    }

    pub fn ids(&self) -> &Array1<u64> {
        &self.ids
    }

    /// The raw attribute matrix with shape `(n_samples, n_features)`.
    pub fn records(&self) -> &Array2<F> {
        &self.records
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }
}

/// Generate `n` synthetic customers with uniformly drawn age, annual income
/// (in thousands) and spending score, the fixture the whole workflow runs
/// against. Ids are `1..=n` in row order.
pub fn generate_customers(n: usize, rng: &mut impl Rng) -> Dataset<f64> {
    let ages: Array1<u32> = Array1::random_using(n, Uniform::new(18, 70), rng);
    let incomes: Array1<u32> = Array1::random_using(n, Uniform::new(15, 137), rng);
    let scores: Array1<u32> = Array1::random_using(n, Uniform::new(1, 100), rng);

    let mut records = Array2::zeros((n, 3));
    records.column_mut(0).assign(&ages.mapv(|v| v as f64));
    records.column_mut(1).assign(&incomes.mapv(|v| v as f64));
    records.column_mut(2).assign(&scores.mapv(|v| v as f64));

    Dataset {
        ids: (1..=n as u64).collect(),
        records,
        feature_names: vec![
            "age".to_string(),
            "income".to_string(),
            "spending_score".to_string(),
        ],
    }
}

/// Given an input matrix `blob_centroids`, with shape `(n_blobs, n_features)`,
/// generate `blob_size` data points (a "blob") around each of the blob
/// centroids, sampled from a standard normal distribution.
///
/// `blobs` can be used to quickly assemble a synthetic dataset to test or
/// benchmark clustering on a best-case scenario input.
pub fn blobs(
    blob_size: usize,
    blob_centroids: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    rng: &mut impl Rng,
) -> Array2<f64> {
    let (n_centroids, n_features) = blob_centroids.dim();
    let mut out: Array2<f64> = Array2::zeros((n_centroids * blob_size, n_features));

    for (blob_index, blob_centroid) in blob_centroids.rows().into_iter().enumerate() {
        let blob = make_blob(blob_size, &blob_centroid, rng);
        out.slice_mut(ndarray::s![
            blob_index * blob_size..(blob_index + 1) * blob_size,
            ..
        ])
        .assign(&blob);
    }
    out
}

fn make_blob(
    blob_size: usize,
    blob_centroid: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    rng: &mut impl Rng,
) -> Array2<f64> {
    let shape = (blob_size, blob_centroid.len());
    let origin_blob: Array2<f64> = Array2::random_using(shape, StandardNormal, rng);
    origin_blob + blob_centroid
}
