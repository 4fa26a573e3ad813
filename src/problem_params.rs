//! Integration of the Problem trait with scene parameters
//!
//! This module provides an adapter that lets a problem be written against
//! named, structured scene parameters ([`SceneKwargs`]) while the optimizer
//! only sees the flat vector defined by a [`Param`].

use crate::error::Result;
use crate::parameters::{Param, SceneKwargs};
use crate::problem::Problem;
use ndarray::Array1;

/// A trait for problems that evaluate residuals from structured scene parameters
pub trait SceneProblem {
    /// Evaluate the residuals of a scene
    ///
    /// # Arguments
    ///
    /// * `kwargs` - Keyword mappings of every family, fixed values included
    ///
    /// # Returns
    ///
    /// * A vector of residuals, or an error if the evaluation fails
    fn eval_scene(&self, kwargs: &SceneKwargs) -> Result<Array1<f64>>;

    /// Get the number of residuals in the problem
    fn residual_count(&self) -> usize;
}

/// An adapter that implements Problem for SceneProblem implementations
///
/// Every evaluation unpacks the flat vector through the [`Param`] before
/// handing the scene to the wrapped problem.
pub struct SceneProblemAdapter<'a, P: SceneProblem + ?Sized> {
    problem: &'a P,
    param: &'a Param,
}

impl<'a, P: SceneProblem + ?Sized> SceneProblemAdapter<'a, P> {
    /// Create a new adapter for a SceneProblem implementation
    pub fn new(problem: &'a P, param: &'a Param) -> Self {
        Self { problem, param }
    }

    /// The parameter layout used by this adapter
    pub fn param(&self) -> &Param {
        self.param
    }

    /// Pack a starting scene into the optimizer's vector type
    pub fn initial_params(&self, kwargs: &SceneKwargs) -> Result<Array1<f64>> {
        Ok(Array1::from_vec(self.param.set_params(kwargs)?))
    }

    /// Unpack an optimizer result into a scene
    pub fn scene(&self, params: &Array1<f64>) -> Result<SceneKwargs> {
        match params.as_slice() {
            Some(args) => self.param.get_params(args),
            None => self.param.get_params(&params.to_vec()),
        }
    }
}

impl<'a, P: SceneProblem + ?Sized> Problem for SceneProblemAdapter<'a, P> {
    fn eval(&self, params: &Array1<f64>) -> Result<Array1<f64>> {
        let kwargs = self.scene(params)?;
        self.problem.eval_scene(&kwargs)
    }

    fn parameter_count(&self) -> usize {
        self.param.num_param().0
    }

    fn residual_count(&self) -> usize {
        self.problem.residual_count()
    }
}
