//! Scene-wide parameter handling
//!
//! This module provides [`Param`], which composes one [`FamilyParams`] per family
//! in [`Family::ORDER`] and threads a single cursor across family boundaries.
//! It is the only interface an optimizer or sampler needs: [`Param::num_param`],
//! [`Param::set_params`] and [`Param::get_params`].

use crate::error::{LensParamError, Result};
use crate::parameters::codec::FamilyParams;
use crate::parameters::registry::Family;
use crate::parameters::value::{FixedConfig, SceneKwargs};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Model lists of a scene
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Lens mass profiles
    pub lens_model_list: Vec<String>,

    /// Source surface brightness profiles
    pub source_light_model_list: Vec<String>,

    /// Lens surface brightness profiles
    pub lens_light_model_list: Vec<String>,

    /// Point source parameterisations
    pub point_source_model_list: Vec<String>,

    /// Cosmological sampling parameterisation, if any
    pub cosmo_type: Option<String>,

    /// Number of images of each point source instance
    pub num_point_source_list: Vec<usize>,

    /// Point source instances whose images share one overall amplitude
    pub fixed_magnification_list: Vec<bool>,
}

impl ModelConfig {
    /// Variant names of a family, in flat-vector order
    pub fn model_list(&self, family: Family) -> Vec<&str> {
        match family {
            Family::Lens => self.lens_model_list.iter().map(String::as_str).collect(),
            Family::SourceLight => self
                .source_light_model_list
                .iter()
                .map(String::as_str)
                .collect(),
            Family::LensLight => self
                .lens_light_model_list
                .iter()
                .map(String::as_str)
                .collect(),
            Family::PointSource => self
                .point_source_model_list
                .iter()
                .map(String::as_str)
                .collect(),
            Family::Cosmology => self.cosmo_type.iter().map(String::as_str).collect(),
        }
    }
}

fn default_linear_solver() -> bool {
    true
}

/// Complete run configuration of the parameter handling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamConfig {
    /// Model lists and point counts
    #[serde(default)]
    pub model: ModelConfig,

    /// Initial fixed masks
    #[serde(default)]
    pub fixed: FixedConfig,

    /// Solve point source amplitudes linearly instead of sampling them
    #[serde(default = "default_linear_solver")]
    pub linear_solver: bool,
}

impl Default for ParamConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            fixed: FixedConfig::default(),
            linear_solver: default_linear_solver(),
        }
    }
}

impl ParamConfig {
    /// Parse a configuration from a JSON string
    ///
    /// # Examples
    ///
    /// ```
    /// use lensparams_rs::parameters::ParamConfig;
    ///
    /// let config = ParamConfig::from_json(r#"{
    ///     "model": {"lens_model_list": ["SPEP"]},
    ///     "fixed": {"lens": [{"gamma": 1.9}]}
    /// }"#).unwrap();
    /// assert!(config.linear_solver);
    /// assert_eq!(config.model.lens_model_list, vec!["SPEP"]);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the configuration to a JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a configuration from a JSON file
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        Self::from_json(&contents)
    }

    /// Save the configuration to a JSON file
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Structural fingerprint of a flat vector
///
/// Two [`Param`] instances produce interchangeable flat vectors only if their
/// layouts are equal. The layout is serializable so it can travel with vectors
/// across process boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamLayout {
    /// Free slot count of each family, in [`Family::ORDER`]
    pub counts: Vec<(Family, usize)>,

    /// Parameter name of every slot
    pub labels: Vec<String>,
}

impl ParamLayout {
    /// Total number of slots
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the layout has no slots
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Packing and unpacking of a whole scene
///
/// # Examples
///
/// ```
/// use lensparams_rs::kwargs;
/// use lensparams_rs::parameters::{FixedConfig, ModelConfig, Param, SceneKwargs};
///
/// let model = ModelConfig {
///     lens_model_list: vec!["SIS".to_string()],
///     ..Default::default()
/// };
/// let param = Param::new(&model, &FixedConfig::default(), true).unwrap();
///
/// let mut scene = SceneKwargs::new();
/// scene.lens.push(kwargs! { "theta_E" => 1.2, "center_x" => 0.0, "center_y" => 0.1 });
///
/// let args = param.set_params(&scene).unwrap();
/// assert_eq!(args, vec![1.2, 0.0, 0.1]);
/// assert_eq!(param.get_params(&args).unwrap(), scene);
/// ```
#[derive(Debug, Clone)]
pub struct Param {
    model: ModelConfig,
    linear_solver: bool,
    families: Vec<FamilyParams>,
    num_free: usize,
}

impl Param {
    /// Build the per-family codecs
    ///
    /// # Arguments
    ///
    /// * `model` - Model lists and point counts
    /// * `fixed` - Fixed masks, one list per family (empty lists leave a family free)
    /// * `linear_solver` - Fix point source amplitudes for an external linear solve
    pub fn new(model: &ModelConfig, fixed: &FixedConfig, linear_solver: bool) -> Result<Self> {
        let families = Family::ORDER
            .iter()
            .map(|&family| -> Result<FamilyParams> {
                let names = model.model_list(family);
                let codec = FamilyParams::new(family, &names[..], fixed[family].clone())?;
                let codec = match family {
                    Family::PointSource => codec
                        .with_num_points(model.num_point_source_list.clone())?
                        .with_fixed_magnification(model.fixed_magnification_list.clone())?
                        .with_linear_solver(linear_solver),
                    _ => codec.with_linear_solver(false),
                };
                Ok(codec)
            })
            .collect::<Result<Vec<_>>>()?;

        let num_free: usize = families.iter().map(FamilyParams::num_free).sum();
        debug!("built scene params with {} free parameters", num_free);

        Ok(Self {
            model: model.clone(),
            linear_solver,
            families,
            num_free,
        })
    }

    /// Build from a run configuration
    pub fn from_config(config: &ParamConfig) -> Result<Self> {
        Self::new(&config.model, &config.fixed, config.linear_solver)
    }

    /// Rebuild with new fixed masks, keeping models and options
    pub fn with_fixed(&self, fixed: &FixedConfig) -> Result<Self> {
        Self::new(&self.model, fixed, self.linear_solver)
    }

    /// Model lists of the scene
    pub fn model(&self) -> &ModelConfig {
        &self.model
    }

    /// Whether point source amplitudes are solved linearly
    pub fn linear_solver(&self) -> bool {
        self.linear_solver
    }

    /// Codec of one family
    pub fn family(&self, family: Family) -> &FamilyParams {
        &self.families[family.index()]
    }

    /// Fixed masks in effect, including linear-solver substitutions
    pub fn fixed(&self) -> FixedConfig {
        let mut fixed = FixedConfig::new();
        for codec in &self.families {
            fixed[codec.family()] = codec.fixed().to_vec();
        }
        fixed
    }

    /// Number of free parameters and the label of every flat-vector slot
    pub fn num_param(&self) -> (usize, Vec<String>) {
        let mut labels = Vec::with_capacity(self.num_free);
        for codec in &self.families {
            labels.extend(codec.num_param().1);
        }
        (labels.len(), labels)
    }

    /// Number of point source amplitudes produced by the external linear solve
    ///
    /// Counted whether or not `linear_solver` is set; light amplitudes are sampled
    /// and do not count.
    pub fn num_param_linear(&self) -> usize {
        self.family(Family::PointSource).num_param_linear()
    }

    /// Pack a scene into a flat vector
    pub fn set_params(&self, kwargs: &SceneKwargs) -> Result<Vec<f64>> {
        let mut args = Vec::with_capacity(self.num_free);
        for codec in &self.families {
            args.extend(codec.set_params(&kwargs[codec.family()])?);
        }
        Ok(args)
    }

    /// Unpack a flat vector into a scene
    ///
    /// # Returns
    ///
    /// The scene, or `CursorMismatch` if the vector length differs from
    /// [`Param::num_param`]
    pub fn get_params(&self, args: &[f64]) -> Result<SceneKwargs> {
        if args.len() != self.num_free {
            return Err(LensParamError::CursorMismatch {
                expected: self.num_free,
                actual: args.len(),
            });
        }

        let mut scene = SceneKwargs::new();
        let mut cursor = 0;
        for codec in &self.families {
            let (kwargs, next) = codec.get_params(args, cursor)?;
            scene[codec.family()] = kwargs;
            cursor = next;
        }

        if cursor != args.len() {
            return Err(LensParamError::CursorMismatch {
                expected: cursor,
                actual: args.len(),
            });
        }
        Ok(scene)
    }

    /// Build the prior mean and width vectors for a sampler
    pub fn param_init(&self, kwargs_mean: &SceneKwargs) -> Result<(Vec<f64>, Vec<f64>)> {
        let mut mean = Vec::with_capacity(self.num_free);
        let mut sigma = Vec::with_capacity(self.num_free);
        for codec in &self.families {
            let (m, s) = codec.param_init(&kwargs_mean[codec.family()])?;
            mean.extend(m);
            sigma.extend(s);
        }
        Ok((mean, sigma))
    }

    /// Structural fingerprint of the flat vector
    pub fn layout(&self) -> ParamLayout {
        let counts = self
            .families
            .iter()
            .map(|codec| (codec.family(), codec.num_free()))
            .collect();
        ParamLayout {
            counts,
            labels: self.num_param().1,
        }
    }

    /// Unpack a flat vector that was packed under `layout`
    ///
    /// Fails with `LayoutMismatch` if `layout` differs from this instance's layout,
    /// e.g. after a fixed-mask change or a family reordering on the producing side.
    pub fn get_params_checked(&self, args: &[f64], layout: &ParamLayout) -> Result<SceneKwargs> {
        let own = self.layout();
        if own != *layout {
            let detail = match own
                .labels
                .iter()
                .zip(&layout.labels)
                .position(|(a, b)| a != b)
            {
                Some(i) => format!(
                    "slot {} is '{}' here but '{}' in the supplied layout",
                    i, own.labels[i], layout.labels[i]
                ),
                None => format!(
                    "{} slots here, {} in the supplied layout",
                    own.len(),
                    layout.len()
                ),
            };
            return Err(LensParamError::LayoutMismatch(detail));
        }
        self.get_params(args)
    }
}
