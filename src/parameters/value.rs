//! Keyword-mapping representation of scene parameters
//!
//! This module provides the structured side of the packing contract: a
//! [`ParamValue`] is either a scalar or a per-point array, a [`Kwargs`] maps
//! parameter names to values for one component instance, and [`SceneKwargs`]
//! holds one list of instances per family.

use crate::parameters::registry::Family;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::{Index, IndexMut};

/// A single parameter value: either a scalar or a per-point array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Scalar(f64),
    Array(Vec<f64>),
}

impl ParamValue {
    /// Get the scalar value, if this is a scalar
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            ParamValue::Scalar(v) => Some(*v),
            ParamValue::Array(_) => None,
        }
    }

    /// Get the array elements, if this is an array
    pub fn as_array(&self) -> Option<&[f64]> {
        match self {
            ParamValue::Scalar(_) => None,
            ParamValue::Array(v) => Some(v),
        }
    }

    /// Whether this value is array-shaped
    pub fn is_array(&self) -> bool {
        matches!(self, ParamValue::Array(_))
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Scalar(v)
    }
}

impl From<Vec<f64>> for ParamValue {
    fn from(v: Vec<f64>) -> Self {
        ParamValue::Array(v)
    }
}

impl From<&[f64]> for ParamValue {
    fn from(v: &[f64]) -> Self {
        ParamValue::Array(v.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for ParamValue {
    fn from(v: [f64; N]) -> Self {
        ParamValue::Array(v.to_vec())
    }
}

/// Keyword arguments of one component instance.
pub type Kwargs = BTreeMap<String, ParamValue>;

/// Fixed parameters of one component instance, with the values substituted on unpack.
pub type FixedMask = Kwargs;

/// Whether a mask list fixes nothing, e.g. `[{}]` placeholders for an unused family
pub(crate) fn all_free(masks: &[FixedMask]) -> bool {
    masks.iter().all(FixedMask::is_empty)
}

/// Build a [`Kwargs`] mapping from `name => value` pairs.
///
/// # Examples
///
/// ```
/// use lensparams_rs::kwargs;
/// use lensparams_rs::parameters::ParamValue;
///
/// let kw = kwargs! { "theta_E" => 1.0, "ra_image" => vec![-1.0, 1.0] };
/// assert_eq!(kw["theta_E"], ParamValue::Scalar(1.0));
/// assert_eq!(kw["ra_image"].as_array().unwrap().len(), 2);
/// ```
#[macro_export]
macro_rules! kwargs {
    () => {
        $crate::parameters::Kwargs::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut kw = $crate::parameters::Kwargs::new();
        $(
            kw.insert(
                ::std::string::String::from($name),
                $crate::parameters::ParamValue::from($value),
            );
        )+
        kw
    }};
}

/// Keyword mappings for a whole scene, one instance list per family.
///
/// The same structure carries fixed masks (see [`FixedConfig`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneKwargs {
    pub lens: Vec<Kwargs>,
    pub source: Vec<Kwargs>,
    pub lens_light: Vec<Kwargs>,
    pub point_source: Vec<Kwargs>,
    pub cosmo: Vec<Kwargs>,
}

/// Per-family fixed masks.
pub type FixedConfig = SceneKwargs;

impl SceneKwargs {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the instance list of a family
    pub fn get(&self, family: Family) -> &Vec<Kwargs> {
        match family {
            Family::Lens => &self.lens,
            Family::SourceLight => &self.source,
            Family::LensLight => &self.lens_light,
            Family::PointSource => &self.point_source,
            Family::Cosmology => &self.cosmo,
        }
    }

    /// Get the mutable instance list of a family
    pub fn get_mut(&mut self, family: Family) -> &mut Vec<Kwargs> {
        match family {
            Family::Lens => &mut self.lens,
            Family::SourceLight => &mut self.source,
            Family::LensLight => &mut self.lens_light,
            Family::PointSource => &mut self.point_source,
            Family::Cosmology => &mut self.cosmo,
        }
    }
}

impl Index<Family> for SceneKwargs {
    type Output = Vec<Kwargs>;

    fn index(&self, family: Family) -> &Self::Output {
        self.get(family)
    }
}

impl IndexMut<Family> for SceneKwargs {
    fn index_mut(&mut self, family: Family) -> &mut Self::Output {
        self.get_mut(family)
    }
}
