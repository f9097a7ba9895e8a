//! Unsupervised customer segmentation with K-Means.
//!
//! This crate partitions a table of customer records (age, annual income,
//! spending score) into K groups and helps a human analyst pick K. It is a
//! small, linear pipeline rather than a framework:
//!
//! 1. [`standardize`] — per-feature zero-mean/unit-variance scaling;
//! 2. [`k_means`] — Lloyd's iteration with random or k-means++ seeding;
//! 3. [`evaluation`] — a sweep over candidate cluster counts, reporting the
//!    within-cluster sum of squares (WCSS) and the silhouette score per K;
//! 4. [`profile`] — per-cluster means of the original, unscaled features
//!    for interpretation.
//!
//! Each stage consumes and produces an immutable snapshot; randomness is
//! always an explicit, caller-supplied seed so any run can be reproduced.
//!
//! ```
//! use customer_segmentation::{evaluate, generate_customers, KMeans, StandardScaler};
//! use ndarray_rand::rand::SeedableRng;
//! use rand_xoshiro::Xoshiro256Plus;
//!
//! let mut rng = Xoshiro256Plus::seed_from_u64(42);
//! let customers = generate_customers(200, &mut rng);
//!
//! let scaler = StandardScaler::new().fit(customers.records()).unwrap();
//! let points = scaler.transform(customers.records());
//!
//! // Sweep the candidate cluster counts; reading the elbow stays with the caller.
//! let curve = evaluate(&points, &[2, 3, 4, 5, 6], 42).unwrap();
//! assert_eq!(curve.records().len(), 5);
//!
//! let model = KMeans::params_with_rng(4, rng).fit(&points).unwrap();
//! assert_eq!(model.labels().len(), 200);
//! ```

pub mod dataset;
pub mod error;
pub mod evaluation;
pub mod k_means;
pub mod profile;
pub mod standardize;

pub use dataset::{blobs, generate_customers, Dataset, Float};
pub use error::{Error, Result};
pub use evaluation::{evaluate, silhouette_score, EvaluationCurve, EvaluationRecord};
pub use k_means::{KMeans, KMeansInit, KMeansParams};
pub use profile::{profile, ClusterProfile};
pub use standardize::{FittedStandardScaler, StandardScaler};
