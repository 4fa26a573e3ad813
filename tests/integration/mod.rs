//! End-to-end workflows across modules

mod sampler_workflow;
mod staged_fitting;
