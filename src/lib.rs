//! # lensparams-rs
//!
//! `lensparams-rs` translates between the flat parameter vector used by
//! optimizers and samplers and the structured, per-model keyword mappings that
//! describe a strong-lensing scene.
//!
//! The library provides:
//! - A registry of lens, light, point-source and cosmology models and their
//!   parameter names
//! - Per-family packing and unpacking with fixed parameters and linear
//!   amplitudes removed from the vector
//! - A scene-level aggregator with a fixed family order and prior widths
//! - Rules for freezing whole families between fitting stages
//! - Adapters that expose a scene-level residual function as a flat-vector
//!   [`Problem`]
//!
//! ## Basic Usage
//!
//! ```
//! use lensparams_rs::kwargs;
//! use lensparams_rs::parameters::{FixedConfig, ModelConfig, Param, SceneKwargs};
//!
//! let model = ModelConfig {
//!     lens_model_list: vec!["SIS".to_string()],
//!     ..Default::default()
//! };
//! let param = Param::new(&model, &FixedConfig::default(), true).unwrap();
//!
//! let mut scene = SceneKwargs::new();
//! scene.lens.push(kwargs! { "theta_E" => 1.2, "center_x" => 0.0, "center_y" => 0.1 });
//!
//! let flat = param.set_params(&scene).unwrap();
//! assert_eq!(flat, vec![1.2, 0.0, 0.1]);
//! assert_eq!(param.get_params(&flat).unwrap(), scene);
//! ```

// Public modules
pub mod error;

// Parameter system
pub mod parameters;

// Optimizer and sampler seams
pub mod problem;
pub mod problem_params;
pub mod utils;

// Instrument description
pub mod observation;

// Re-exports for convenience
pub use error::{LensParamError, Result};
pub use parameters::{Param, SceneKwargs};
pub use problem::Problem;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
