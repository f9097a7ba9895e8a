//! Zero-mean, unit-variance feature scaling.
//!
//! K-Means is distance based, so features on wildly different scales (age in
//! years vs. income in thousands) would let one feature dominate the
//! clustering. The scaler learns per-column statistics once over the whole
//! table and applies `(x - mean) / std` everywhere, using the population
//! standard deviation (ddof = 0) consistently.

use ndarray::{Array1, Array2, ArrayBase, Axis, Data, Ix2};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::dataset::Float;
use crate::error::{Error, Result};

/// Entry point for standardization, in a fit/transform pair: `fit` learns
/// the column statistics, the returned [`FittedStandardScaler`] applies
/// them.
#[derive(Clone, Debug, Default)]
pub struct StandardScaler;

impl StandardScaler {
    pub fn new() -> Self {
        Self
    }

    /// Compute per-column mean and population standard deviation over
    /// `records`, shape `(n_samples, n_features)`.
    ///
    /// Fails with [`Error::EmptyInput`] on zero rows and with
    /// [`Error::DegenerateFeature`] when a column is constant, since the
    /// transform would divide by zero. Deciding whether to drop such a
    /// column is left to the caller.
    pub fn fit<F: Float, D: Data<Elem = F>>(
        &self,
        records: &ArrayBase<D, Ix2>,
    ) -> Result<FittedStandardScaler<F>> {
        let means = records.mean_axis(Axis(0)).ok_or(Error::EmptyInput)?;
        let std_devs = records.std_axis(Axis(0), F::zero());
        if let Some(degenerate) = std_devs.iter().position(|&s| !(s > F::zero())) {
            return Err(Error::DegenerateFeature(degenerate));
        }
        Ok(FittedStandardScaler { means, std_devs })
    }
}

/// Per-column statistics learned by [`StandardScaler::fit`].
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct FittedStandardScaler<F> {
    means: Array1<F>,
    std_devs: Array1<F>,
}

impl<F: Float> FittedStandardScaler<F> {
    /// Map every value to `(x - mean) / std` column-wise, returning a new
    /// array; the input is never mutated.
    pub fn transform<D: Data<Elem = F>>(&self, records: &ArrayBase<D, Ix2>) -> Array2<F> {
        (records.to_owned() - &self.means) / &self.std_devs
    }

    pub fn means(&self) -> &Array1<F> {
        &self.means
    }

    pub fn std_devs(&self) -> &Array1<F> {
        &self.std_devs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array2, Axis};
    use ndarray_rand::rand::SeedableRng;
    use ndarray_rand::rand_distr::Uniform;
    use ndarray_rand::RandomExt;
    use rand_xoshiro::Xoshiro256Plus;

    #[test]
    fn standardized_columns_have_zero_mean_unit_variance() {
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let records = Array2::random_using((200, 3), Uniform::new(-50.0, 150.0), &mut rng);

        let scaler = StandardScaler::new().fit(&records).unwrap();
        let standardized = scaler.transform(&records);

        let means = standardized.mean_axis(Axis(0)).unwrap();
        let std_devs = standardized.std_axis(Axis(0), 0.0);
        for j in 0..3 {
            assert_abs_diff_eq!(means[j], 0.0, epsilon = 1e-9);
            assert_abs_diff_eq!(std_devs[j], 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn standardization_is_idempotent() {
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let records = Array2::random_using((100, 2), Uniform::new(0.0, 1000.0), &mut rng);

        let once = StandardScaler::new()
            .fit(&records)
            .unwrap()
            .transform(&records);
        let twice = StandardScaler::new().fit(&once).unwrap().transform(&once);

        assert_abs_diff_eq!(once, twice, epsilon = 1e-9);
    }

    #[test]
    fn known_statistics_are_recovered() {
        let records = array![[1.0, 10.0], [3.0, 10.0], [5.0, 40.0]];
        let scaler = StandardScaler::new().fit(&records).unwrap();
        assert_abs_diff_eq!(scaler.means(), &array![3.0, 20.0], epsilon = 1e-12);
        // population std: sqrt(8/3) and sqrt(200)
        assert_abs_diff_eq!(
            scaler.std_devs(),
            &array![(8.0f64 / 3.0).sqrt(), 200.0f64.sqrt()],
            epsilon = 1e-12
        );
    }

    #[test]
    fn constant_column_is_rejected() {
        let records = array![[1.0, 7.0], [2.0, 7.0], [3.0, 7.0]];
        let res = StandardScaler::new().fit(&records);
        assert_eq!(res.unwrap_err(), Error::DegenerateFeature(1));
    }

    #[test]
    fn empty_input_is_rejected() {
        let records = Array2::<f64>::zeros((0, 3));
        let res = StandardScaler::new().fit(&records);
        assert_eq!(res.unwrap_err(), Error::EmptyInput);
    }
}
