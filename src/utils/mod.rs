//! Utility functions and helpers for the lensparams-rs library.

pub mod parallel;
pub mod sampling;

// Parallel implementations
pub use parallel::{eval_cost_parallel, get_params_parallel, set_params_parallel};

// Sampler initialisation
pub use sampling::sample_walkers;
