//! Walker initialisation for ensemble samplers.

use ndarray::Array2;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::error::{LensParamError, Result};

/// Draw initial walker positions around a prior mean.
///
/// Every walker is one row; column `j` is drawn from a normal distribution with
/// mean `mean[j]` and standard deviation `sigma[j]`, as produced by
/// [`Param::param_init`](crate::parameters::Param::param_init).
///
/// # Arguments
///
/// * `mean` - Prior mean of every flat-vector slot
/// * `sigma` - Prior width of every flat-vector slot
/// * `n_walkers` - Number of walkers to draw
/// * `rng` - Random number generator
///
/// # Returns
///
/// * `Result<Array2<f64>>` - Walker matrix of shape `(n_walkers, mean.len())`
pub fn sample_walkers<R: Rng + ?Sized>(
    mean: &[f64],
    sigma: &[f64],
    n_walkers: usize,
    rng: &mut R,
) -> Result<Array2<f64>> {
    if mean.len() != sigma.len() {
        return Err(LensParamError::LengthMismatch(format!(
            "{} means but {} sigmas",
            mean.len(),
            sigma.len()
        )));
    }

    let distributions = mean
        .iter()
        .zip(sigma)
        .map(|(&m, &s)| {
            // Normal::new accepts negative widths
            if !s.is_finite() || s < 0.0 {
                return Err(LensParamError::InvalidInput(format!(
                    "prior width {} must be finite and non-negative",
                    s
                )));
            }
            Normal::new(m, s).map_err(|e| {
                LensParamError::InvalidInput(format!("prior N({}, {}): {}", m, s, e))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut walkers = Array2::zeros((n_walkers, mean.len()));
    for mut row in walkers.rows_mut() {
        for (value, dist) in row.iter_mut().zip(&distributions) {
            *value = dist.sample(rng);
        }
    }
    Ok(walkers)
}
