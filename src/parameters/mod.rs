//! # Parameter System
//!
//! This module translates between structured scene descriptions and the flat,
//! unlabeled parameter vectors consumed by optimizers and samplers.
//!
//! ## Key Features
//!
//! - **Model Registry**: Every family/variant pair maps to a fixed, ordered list of parameter names
//! - **Fixed Masks**: Per-instance values that are held fixed and never enter the flat vector
//! - **Per-Point Parameters**: Image positions and amplitudes occupy one slot per image
//! - **Linear Amplitudes**: Point source amplitudes can be left to an external linear solve
//! - **Staged Fitting**: Fixed masks can be updated between optimization stages
//!
//! ## Core Components
//!
//! - [`ModelSpec`]: A model variant tagged with its [`Family`]
//! - [`FamilyParams`]: Pack/unpack of the instances of one family
//! - [`Param`]: Pack/unpack of a whole scene in [`Family::ORDER`]
//! - [`ParamUpdate`]: Derives fixed masks for the next fitting stage
//!
//! ## Example Usage
//!
//! ```rust
//! use lensparams_rs::kwargs;
//! use lensparams_rs::parameters::{FixedConfig, ModelConfig, Param, SceneKwargs};
//!
//! let model = ModelConfig {
//!     lens_model_list: vec!["SPEP".to_string()],
//!     point_source_model_list: vec!["LENSED_POSITION".to_string()],
//!     num_point_source_list: vec![2],
//!     ..Default::default()
//! };
//! let fixed = FixedConfig {
//!     lens: vec![kwargs! { "gamma" => 2.0 }],
//!     ..Default::default()
//! };
//!
//! // Point source amplitudes are solved linearly and stay out of the vector
//! let param = Param::new(&model, &fixed, true).unwrap();
//! let (num, labels) = param.num_param();
//! assert_eq!(num, 5 + 4);
//! assert_eq!(labels[5], "ra_image");
//!
//! let mut scene = SceneKwargs::new();
//! scene.lens.push(kwargs! {
//!     "theta_E" => 1.1, "gamma" => 2.0, "e1" => 0.05, "e2" => -0.02,
//!     "center_x" => 0.0, "center_y" => 0.0,
//! });
//! scene.point_source.push(kwargs! {
//!     "ra_image" => [1.0, -1.0], "dec_image" => [0.5, -0.5], "point_amp" => [1.0, 1.0],
//! });
//!
//! let args = param.set_params(&scene).unwrap();
//! assert_eq!(args.len(), num);
//! let unpacked = param.get_params(&args).unwrap();
//! assert_eq!(unpacked.lens, scene.lens);
//! ```

pub mod codec;
pub mod param;
pub mod registry;
pub mod update;
pub mod value;


// Re-export key types
pub use codec::{FamilyParams, LINEAR_SENTINEL};
pub use param::{ModelConfig, Param, ParamConfig, ParamLayout};
pub use registry::{
    lookup, CosmoModel, Family, LensModel, LightModel, ModelSpec, ParamShape, ParamSpec,
    PointSourceModel,
};
pub use update::{FixOptions, ParamUpdate};
pub use value::{FixedConfig, FixedMask, Kwargs, ParamValue, SceneKwargs};
