//! Model registry
//!
//! Every component family exposes a closed set of model variants. Each variant
//! maps to a fixed, ordered list of [`ParamSpec`] descriptors which define the
//! positional layout of that variant's slice of the flat vector. Adding a
//! variant means adding an enum member and one parameter table here; the codec
//! never branches on variant names.

use crate::error::{LensParamError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A category of scene component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    Lens,
    SourceLight,
    LensLight,
    PointSource,
    Cosmology,
}

impl Family {
    /// Processing order of the families in the flat vector.
    pub const ORDER: [Family; 5] = [
        Family::Lens,
        Family::SourceLight,
        Family::LensLight,
        Family::PointSource,
        Family::Cosmology,
    ];

    /// Human-readable family name
    pub fn name(&self) -> &'static str {
        match self {
            Family::Lens => "lens",
            Family::SourceLight => "source light",
            Family::LensLight => "lens light",
            Family::PointSource => "point source",
            Family::Cosmology => "cosmology",
        }
    }

    /// Position of the family in [`Family::ORDER`]
    pub fn index(&self) -> usize {
        match self {
            Family::Lens => 0,
            Family::SourceLight => 1,
            Family::LensLight => 2,
            Family::PointSource => 3,
            Family::Cosmology => 4,
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Shape of a parameter in the flat vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamShape {
    /// Occupies exactly one slot
    Scalar,
    /// Occupies one slot per point of the instance
    PerPoint,
}

/// Descriptor of one named parameter of a model variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    /// Keyword name
    pub name: &'static str,

    /// Scalar or per-point shape
    pub shape: ParamShape,

    /// Amplitude-like parameter that a linear solve can provide
    pub linear: bool,

    /// Field of a mean mapping holding the prior width of this parameter
    pub sigma_key: &'static str,
}

const fn scalar(name: &'static str, sigma_key: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        shape: ParamShape::Scalar,
        linear: false,
        sigma_key,
    }
}

const fn linear(name: &'static str, sigma_key: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        shape: ParamShape::Scalar,
        linear: true,
        sigma_key,
    }
}

const fn per_point(name: &'static str, sigma_key: &'static str, linear: bool) -> ParamSpec {
    ParamSpec {
        name,
        shape: ParamShape::PerPoint,
        linear,
        sigma_key,
    }
}

const THETA_E: ParamSpec = scalar("theta_E", "theta_E_sigma");
const GAMMA: ParamSpec = scalar("gamma", "gamma_sigma");
const E1: ParamSpec = scalar("e1", "ellipse_sigma");
const E2: ParamSpec = scalar("e2", "ellipse_sigma");
const CENTER_X: ParamSpec = scalar("center_x", "center_x_sigma");
const CENTER_Y: ParamSpec = scalar("center_y", "center_y_sigma");
const RS: ParamSpec = scalar("Rs", "Rs_sigma");

static SPEP_PARAMS: [ParamSpec; 6] = [THETA_E, GAMMA, E1, E2, CENTER_X, CENTER_Y];
static SIE_PARAMS: [ParamSpec; 5] = [THETA_E, E1, E2, CENTER_X, CENTER_Y];
static SIS_PARAMS: [ParamSpec; 3] = [THETA_E, CENTER_X, CENTER_Y];
static SPP_PARAMS: [ParamSpec; 4] = [THETA_E, GAMMA, CENTER_X, CENTER_Y];
static NFW_PARAMS: [ParamSpec; 4] = [
    RS,
    scalar("theta_Rs", "theta_Rs_sigma"),
    CENTER_X,
    CENTER_Y,
];
static SHEAR_PARAMS: [ParamSpec; 2] = [E1, E2];
static CONVERGENCE_PARAMS: [ParamSpec; 1] = [scalar("kappa_ext", "kappa_ext_sigma")];

static GAUSSIAN_PARAMS: [ParamSpec; 5] = [
    linear("amp", "amp_sigma"),
    scalar("sigma_x", "sigma_x_sigma"),
    scalar("sigma_y", "sigma_y_sigma"),
    CENTER_X,
    CENTER_Y,
];
static SERSIC_PARAMS: [ParamSpec; 5] = [
    linear("I0_sersic", "I0_sersic_sigma"),
    scalar("R_sersic", "R_sersic_sigma"),
    scalar("n_sersic", "n_sersic_sigma"),
    CENTER_X,
    CENTER_Y,
];
static SERSIC_ELLIPSE_PARAMS: [ParamSpec; 7] = [
    linear("I0_sersic", "I0_sersic_sigma"),
    scalar("R_sersic", "R_sersic_sigma"),
    scalar("n_sersic", "n_sersic_sigma"),
    E1,
    E2,
    CENTER_X,
    CENTER_Y,
];
static HERNQUIST_PARAMS: [ParamSpec; 4] = [linear("amp", "amp_sigma"), RS, CENTER_X, CENTER_Y];
static UNIFORM_PARAMS: [ParamSpec; 1] = [linear("mean", "mean_sigma")];

static IMAGE_POSITION_PARAMS: [ParamSpec; 3] = [
    per_point("ra_image", "pos_sigma", false),
    per_point("dec_image", "pos_sigma", false),
    per_point("point_amp", "point_amp_sigma", true),
];
static SOURCE_POSITION_PARAMS: [ParamSpec; 3] = [
    scalar("ra_source", "pos_sigma"),
    scalar("dec_source", "pos_sigma"),
    linear("point_amp", "point_amp_sigma"),
];

static D_DT_PARAMS: [ParamSpec; 1] = [scalar("D_dt", "D_dt_sigma")];

static NO_PARAMS: [ParamSpec; 0] = [];

macro_rules! variant_enum {
    (
        $(#[$meta:meta])*
        $enum_name:ident, $family:path {
            $($variant:ident => $tag:literal, $params:expr;)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $enum_name {
            $($variant,)+
        }

        impl $enum_name {
            /// All registered variants
            pub const ALL: &'static [$enum_name] = &[$($enum_name::$variant,)+];

            /// Registry tag of the variant
            pub fn name(&self) -> &'static str {
                match self {
                    $($enum_name::$variant => $tag,)+
                }
            }

            /// Ordered parameter descriptors of the variant
            pub fn params(&self) -> &'static [ParamSpec] {
                match self {
                    $($enum_name::$variant => &$params[..],)+
                }
            }
        }

        impl FromStr for $enum_name {
            type Err = LensParamError;

            fn from_str(s: &str) -> Result<Self> {
                let family: Family = $family;
                match s {
                    $($tag => Ok($enum_name::$variant),)+
                    _ => Err(LensParamError::UnknownModel {
                        family: family.name().to_string(),
                        variant: s.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $enum_name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

variant_enum! {
    /// Lens mass profiles
    LensModel, Family::Lens {
        Spep => "SPEP", SPEP_PARAMS;
        Spemd => "SPEMD", SPEP_PARAMS;
        Sie => "SIE", SIE_PARAMS;
        Sis => "SIS", SIS_PARAMS;
        Spp => "SPP", SPP_PARAMS;
        Nfw => "NFW", NFW_PARAMS;
        PointMass => "POINT_MASS", SIS_PARAMS;
        Shear => "SHEAR", SHEAR_PARAMS;
        Convergence => "CONVERGENCE", CONVERGENCE_PARAMS;
        None => "NONE", NO_PARAMS;
    }
}

variant_enum! {
    /// Surface brightness profiles, shared by source and lens light
    LightModel, Family::SourceLight {
        Gaussian => "GAUSSIAN", GAUSSIAN_PARAMS;
        Sersic => "SERSIC", SERSIC_PARAMS;
        SersicEllipse => "SERSIC_ELLIPSE", SERSIC_ELLIPSE_PARAMS;
        Hernquist => "HERNQUIST", HERNQUIST_PARAMS;
        Uniform => "UNIFORM", UNIFORM_PARAMS;
        None => "NONE", NO_PARAMS;
    }
}

variant_enum! {
    /// Point source parameterisations
    PointSourceModel, Family::PointSource {
        LensedPosition => "LENSED_POSITION", IMAGE_POSITION_PARAMS;
        Unlensed => "UNLENSED", IMAGE_POSITION_PARAMS;
        SourcePosition => "SOURCE_POSITION", SOURCE_POSITION_PARAMS;
    }
}

variant_enum! {
    /// Cosmological sampling parameters
    CosmoModel, Family::Cosmology {
        DDt => "D_dt", D_DT_PARAMS;
        None => "NONE", NO_PARAMS;
    }
}

/// A model variant tagged with its family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelSpec {
    Lens(LensModel),
    SourceLight(LightModel),
    LensLight(LightModel),
    PointSource(PointSourceModel),
    Cosmology(CosmoModel),
}

impl ModelSpec {
    /// Resolve a variant name within a family
    ///
    /// # Examples
    ///
    /// ```
    /// use lensparams_rs::parameters::{Family, ModelSpec};
    ///
    /// let spec = ModelSpec::parse(Family::Lens, "SPEP").unwrap();
    /// assert_eq!(spec.params()[0].name, "theta_E");
    /// assert!(ModelSpec::parse(Family::Lens, "GAUSSIAN").is_err());
    /// ```
    pub fn parse(family: Family, variant: &str) -> Result<Self> {
        let spec = match family {
            Family::Lens => ModelSpec::Lens(variant.parse()?),
            Family::SourceLight => ModelSpec::SourceLight(parse_light(family, variant)?),
            Family::LensLight => ModelSpec::LensLight(parse_light(family, variant)?),
            Family::PointSource => ModelSpec::PointSource(variant.parse()?),
            Family::Cosmology => ModelSpec::Cosmology(variant.parse()?),
        };
        Ok(spec)
    }

    /// Family the variant belongs to
    pub fn family(&self) -> Family {
        match self {
            ModelSpec::Lens(_) => Family::Lens,
            ModelSpec::SourceLight(_) => Family::SourceLight,
            ModelSpec::LensLight(_) => Family::LensLight,
            ModelSpec::PointSource(_) => Family::PointSource,
            ModelSpec::Cosmology(_) => Family::Cosmology,
        }
    }

    /// Registry tag of the variant
    pub fn name(&self) -> &'static str {
        match self {
            ModelSpec::Lens(m) => m.name(),
            ModelSpec::SourceLight(m) | ModelSpec::LensLight(m) => m.name(),
            ModelSpec::PointSource(m) => m.name(),
            ModelSpec::Cosmology(m) => m.name(),
        }
    }

    /// Ordered parameter descriptors of the variant
    pub fn params(&self) -> &'static [ParamSpec] {
        match self {
            ModelSpec::Lens(m) => m.params(),
            ModelSpec::SourceLight(m) | ModelSpec::LensLight(m) => m.params(),
            ModelSpec::PointSource(m) => m.params(),
            ModelSpec::Cosmology(m) => m.params(),
        }
    }
}

impl fmt::Display for ModelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.family(), self.name())
    }
}

// The light enum reports source light in its errors; re-tag for lens light.
fn parse_light(family: Family, variant: &str) -> Result<LightModel> {
    variant.parse().map_err(|_| LensParamError::UnknownModel {
        family: family.name().to_string(),
        variant: variant.to_string(),
    })
}

/// Look up the ordered parameter descriptors of a family/variant pair
pub fn lookup(family: Family, variant: &str) -> Result<&'static [ParamSpec]> {
    Ok(ModelSpec::parse(family, variant)?.params())
}
