//! Parallel processing utilities for sampler ensembles.
//!
//! Ensemble samplers evaluate many independent walkers per step. A [`Param`]
//! is immutable after construction, so every walker can be unpacked or
//! evaluated concurrently against the same instance.

use ndarray::{Array1, Array2, Axis};
use rayon::prelude::*;

use crate::error::{LensParamError, Result};
use crate::parameters::{Param, SceneKwargs};
use crate::problem::Problem;

/// Unpack every walker (one row per walker) in parallel.
///
/// # Arguments
///
/// * `param` - The parameter layout shared by all walkers
/// * `walkers` - Flat vectors, one per row
///
/// # Returns
///
/// * `Result<Vec<SceneKwargs>>` - One scene per walker, in row order
pub fn get_params_parallel(param: &Param, walkers: &Array2<f64>) -> Result<Vec<SceneKwargs>> {
    (0..walkers.nrows())
        .into_par_iter()
        .map(|i| param.get_params(&walkers.row(i).to_vec()))
        .collect()
}

/// Pack many scenes into a walker matrix (one row per scene) in parallel.
pub fn set_params_parallel(param: &Param, scenes: &[SceneKwargs]) -> Result<Array2<f64>> {
    let n_params = param.num_param().0;
    let rows: Vec<Vec<f64>> = scenes
        .par_iter()
        .map(|scene| param.set_params(scene))
        .collect::<Result<_>>()?;

    let mut walkers = Array2::zeros((rows.len(), n_params));
    for (mut row, values) in walkers.axis_iter_mut(Axis(0)).zip(rows) {
        row.assign(&Array1::from_vec(values));
    }
    Ok(walkers)
}

/// Evaluate the cost of every walker in parallel.
///
/// # Arguments
///
/// * `problem` - The problem to evaluate
/// * `walkers` - Flat vectors, one per row
///
/// # Returns
///
/// * `Result<Array1<f64>>` - Sum of squared residuals of each walker
pub fn eval_cost_parallel(problem: &(dyn Problem + Sync), walkers: &Array2<f64>) -> Result<Array1<f64>> {
    if walkers.ncols() != problem.parameter_count() {
        return Err(LensParamError::CursorMismatch {
            expected: problem.parameter_count(),
            actual: walkers.ncols(),
        });
    }

    let costs: Result<Vec<f64>> = (0..walkers.nrows())
        .into_par_iter()
        .map(|i| problem.eval_cost(&walkers.row(i).to_owned()))
        .collect();

    Ok(Array1::from_vec(costs?))
}
