//! Per-family packing of keyword mappings into a flat parameter vector
//!
//! A [`FamilyParams`] owns the model list of one component family together with
//! one fixed mask per instance. It translates between a list of [`Kwargs`]
//! (one per instance) and a contiguous slice of the flat vector. The traversal
//! order is always: instance order, then registry parameter order, then array
//! element order for per-point parameters.

use crate::error::{LensParamError, Result};
use crate::parameters::registry::{Family, ModelSpec, ParamShape, ParamSpec};
use crate::parameters::value::{all_free, FixedMask, Kwargs, ParamValue};
use log::debug;

/// Value substituted for linear parameters that are solved outside the flat vector.
pub const LINEAR_SENTINEL: f64 = 1.0;

/// Packing and unpacking of the parameters of one component family
///
/// # Examples
///
/// ```
/// use lensparams_rs::kwargs;
/// use lensparams_rs::parameters::{Family, FamilyParams};
///
/// let lens = FamilyParams::new(Family::Lens, &["SPEP"], vec![kwargs! { "gamma" => 1.9 }]).unwrap();
/// let (num, labels) = lens.num_param();
/// assert_eq!(num, 5);
/// assert_eq!(labels[0], "theta_E");
///
/// let (kwargs, cursor) = lens.get_params(&[1.0, 0.1, -0.1, 0.0, 0.0], 0).unwrap();
/// assert_eq!(cursor, 5);
/// assert_eq!(kwargs[0]["gamma"].as_scalar(), Some(1.9));
/// ```
#[derive(Debug, Clone)]
pub struct FamilyParams {
    family: Family,
    models: Vec<ModelSpec>,
    fixed: Vec<FixedMask>,
    num_points: Vec<usize>,
    fixed_magnification: Vec<bool>,
    linear_solver: bool,
}

impl FamilyParams {
    /// Create the codec for a family
    ///
    /// # Arguments
    ///
    /// * `family` - Family the models belong to
    /// * `models` - Variant names, one per instance, in flat-vector order
    /// * `fixed` - One fixed mask per instance; an empty list, or a list of empty
    ///   placeholder masks of any length, leaves every instance free
    ///
    /// # Returns
    ///
    /// The codec, or `UnknownModel` if a variant is not registered for the family,
    /// or `LengthMismatch` if a list with real entries has a different length than the
    /// model list
    pub fn new<S: AsRef<str>>(family: Family, models: &[S], fixed: Vec<FixedMask>) -> Result<Self> {
        let models = models
            .iter()
            .map(|m| ModelSpec::parse(family, m.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        let fixed = if all_free(&fixed) {
            vec![FixedMask::new(); models.len()]
        } else {
            check_len(family, "fixed masks", fixed.len(), models.len())?;
            fixed
        };

        let n = models.len();
        Ok(Self {
            family,
            models,
            fixed,
            num_points: vec![0; n],
            fixed_magnification: vec![false; n],
            linear_solver: false,
        })
    }

    /// Set the number of points of each instance (per-point parameters only)
    pub fn with_num_points(mut self, num_points: Vec<usize>) -> Result<Self> {
        if !num_points.is_empty() {
            check_len(self.family, "point counts", num_points.len(), self.models.len())?;
            self.num_points = num_points;
        }
        Ok(self)
    }

    /// Mark instances whose images share one overall amplitude in the linear solve
    pub fn with_fixed_magnification(mut self, fixed_magnification: Vec<bool>) -> Result<Self> {
        if !fixed_magnification.is_empty() {
            check_len(
                self.family,
                "fixed magnification flags",
                fixed_magnification.len(),
                self.models.len(),
            )?;
            self.fixed_magnification = fixed_magnification;
        }
        Ok(self)
    }

    /// Enable or disable linear-solver mode
    ///
    /// When enabled, every linear parameter of every instance is fixed to
    /// [`LINEAR_SENTINEL`], replacing any value the caller put in the mask, so later
    /// pack and unpack calls never see it as free.
    pub fn with_linear_solver(mut self, linear_solver: bool) -> Self {
        self.linear_solver = linear_solver;
        if linear_solver {
            for (model, fixed) in self.models.iter().zip(self.fixed.iter_mut()) {
                for spec in model.params().iter().filter(|p| p.linear) {
                    fixed.insert(spec.name.to_string(), ParamValue::Scalar(LINEAR_SENTINEL));
                }
            }
        }
        debug!(
            "{} params: {} instances, {} free slots (linear solver: {})",
            self.family,
            self.models.len(),
            self.num_free(),
            linear_solver
        );
        self
    }

    /// Family of this codec
    pub fn family(&self) -> Family {
        self.family
    }

    /// Model variants, one per instance
    pub fn models(&self) -> &[ModelSpec] {
        &self.models
    }

    /// Fixed masks after linear-solver substitution
    pub fn fixed(&self) -> &[FixedMask] {
        &self.fixed
    }

    /// Number of points of each instance
    pub fn num_points(&self) -> &[usize] {
        &self.num_points
    }

    /// Whether linear parameters are solved outside the flat vector
    pub fn linear_solver(&self) -> bool {
        self.linear_solver
    }

    /// Number of instances
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Whether the family has no instances
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    fn slot_count(&self, k: usize, spec: &ParamSpec) -> usize {
        match spec.shape {
            ParamShape::Scalar => 1,
            ParamShape::PerPoint => self.num_points[k],
        }
    }

    /// Free parameters in flat-vector order as `(instance, descriptor, slots)`
    fn free_params(&self) -> impl Iterator<Item = (usize, &'static ParamSpec, usize)> + '_ {
        self.models.iter().enumerate().flat_map(move |(k, model)| {
            model
                .params()
                .iter()
                .filter(move |spec| !self.fixed[k].contains_key(spec.name))
                .map(move |spec| (k, spec, self.slot_count(k, spec)))
                .filter(|(_, _, n)| *n > 0)
        })
    }

    /// Unpack the family's slice of a flat vector
    ///
    /// # Arguments
    ///
    /// * `args` - The full flat vector
    /// * `cursor` - Offset of the family's first slot
    ///
    /// # Returns
    ///
    /// One keyword mapping per instance and the cursor past the family's last slot.
    /// Fixed parameters are copied from the masks without consuming slots.
    pub fn get_params(&self, args: &[f64], mut cursor: usize) -> Result<(Vec<Kwargs>, usize)> {
        let mut kwargs_list = Vec::with_capacity(self.models.len());

        for (k, model) in self.models.iter().enumerate() {
            let fixed = &self.fixed[k];
            let mut kwargs = Kwargs::new();

            for spec in model.params() {
                if let Some(value) = fixed.get(spec.name) {
                    kwargs.insert(spec.name.to_string(), value.clone());
                    continue;
                }

                let n = self.slot_count(k, spec);
                let end = match cursor.checked_add(n) {
                    Some(end) if end <= args.len() => end,
                    Some(end) => {
                        return Err(LensParamError::CursorMismatch {
                            expected: end,
                            actual: args.len(),
                        })
                    }
                    None => {
                        return Err(LensParamError::CursorMismatch {
                            expected: usize::MAX,
                            actual: args.len(),
                        })
                    }
                };

                let value = match spec.shape {
                    ParamShape::Scalar => ParamValue::Scalar(args[cursor]),
                    ParamShape::PerPoint => ParamValue::Array(args[cursor..end].to_vec()),
                };
                kwargs.insert(spec.name.to_string(), value);
                cursor = end;
            }

            kwargs_list.push(kwargs);
        }

        Ok((kwargs_list, cursor))
    }

    /// Pack keyword mappings into the family's slice of a flat vector
    ///
    /// Per-point arrays longer than the instance's point count are truncated;
    /// shorter ones are rejected with `LengthMismatch`.
    pub fn set_params(&self, kwargs_list: &[Kwargs]) -> Result<Vec<f64>> {
        check_len(self.family, "keyword mappings", kwargs_list.len(), self.models.len())?;

        let mut args = Vec::new();
        for (k, spec, n) in self.free_params() {
            args.extend_from_slice(packed_values(&kwargs_list[k], k, spec, n)?);
        }
        Ok(args)
    }

    /// Count the free slots and label each one with its parameter name
    pub fn num_param(&self) -> (usize, Vec<String>) {
        let mut labels = Vec::new();
        for (_, spec, n) in self.free_params() {
            labels.extend(std::iter::repeat(spec.name.to_string()).take(n));
        }
        (labels.len(), labels)
    }

    /// Number of free slots, without building labels
    pub fn num_free(&self) -> usize {
        self.free_params().map(|(_, _, n)| n).sum()
    }

    /// Build the prior mean and width of every free slot
    ///
    /// Means are read like [`FamilyParams::set_params`]; each width comes from the
    /// descriptor's sigma field of the same mapping (`pos_sigma`, `ellipse_sigma`,
    /// `<name>_sigma`, ...). A scalar width is shared by all points of a per-point
    /// parameter; an array width gives one value per point.
    pub fn param_init(&self, kwargs_mean_list: &[Kwargs]) -> Result<(Vec<f64>, Vec<f64>)> {
        check_len(
            self.family,
            "mean keyword mappings",
            kwargs_mean_list.len(),
            self.models.len(),
        )?;

        let mut mean = Vec::new();
        let mut sigma = Vec::new();
        for (k, spec, n) in self.free_params() {
            let kwargs = &kwargs_mean_list[k];
            mean.extend_from_slice(packed_values(kwargs, k, spec, n)?);

            let width = kwargs
                .get(spec.sigma_key)
                .ok_or_else(|| LensParamError::MissingSigmaField {
                    field: spec.sigma_key.to_string(),
                    param: spec.name.to_string(),
                    instance: k,
                })?;
            match width {
                ParamValue::Scalar(s) => sigma.extend(std::iter::repeat(*s).take(n)),
                ParamValue::Array(values) => {
                    if values.len() < n {
                        return Err(LensParamError::LengthMismatch(format!(
                            "'{}' of {} instance {} has {} elements, expected {}",
                            spec.sigma_key,
                            self.family,
                            k,
                            values.len(),
                            n
                        )));
                    }
                    sigma.extend_from_slice(&values[..n]);
                }
            }
        }
        Ok((mean, sigma))
    }

    /// Number of coefficients produced by the external linear solve
    ///
    /// Counted whether or not linear-solver mode is enabled. A scalar linear
    /// parameter counts once; a per-point one counts once per point, or once in
    /// total for an instance with fixed magnification.
    pub fn num_param_linear(&self) -> usize {
        let mut num = 0;
        for (k, model) in self.models.iter().enumerate() {
            for spec in model.params().iter().filter(|p| p.linear) {
                num += match spec.shape {
                    ParamShape::Scalar => 1,
                    ParamShape::PerPoint if self.fixed_magnification[k] => 1,
                    ParamShape::PerPoint => self.num_points[k],
                };
            }
        }
        num
    }
}

fn check_len(family: Family, what: &str, got: usize, expected: usize) -> Result<()> {
    if got != expected {
        return Err(LensParamError::LengthMismatch(format!(
            "{} has {} models but {} {}",
            family, expected, got, what
        )));
    }
    Ok(())
}

/// Values of one free parameter as they appear in the flat vector
fn packed_values<'a>(kwargs: &'a Kwargs, k: usize, spec: &ParamSpec, n: usize) -> Result<&'a [f64]> {
    let value = kwargs
        .get(spec.name)
        .ok_or_else(|| LensParamError::MissingParameter {
            param: spec.name.to_string(),
            instance: k,
        })?;

    match (spec.shape, value) {
        (ParamShape::Scalar, ParamValue::Scalar(v)) => Ok(std::slice::from_ref(v)),
        (ParamShape::PerPoint, ParamValue::Array(values)) => {
            if values.len() < n {
                return Err(LensParamError::LengthMismatch(format!(
                    "'{}' of instance {} has {} elements, expected {}",
                    spec.name,
                    k,
                    values.len(),
                    n
                )));
            }
            if values.len() > n {
                debug!(
                    "discarding {} surplus elements of '{}' (instance {})",
                    values.len() - n,
                    spec.name,
                    k
                );
            }
            Ok(&values[..n])
        }
        (ParamShape::Scalar, ParamValue::Array(_)) => Err(LensParamError::ShapeMismatch {
            param: spec.name.to_string(),
            expected: "scalar".to_string(),
        }),
        (ParamShape::PerPoint, ParamValue::Scalar(_)) => Err(LensParamError::ShapeMismatch {
            param: spec.name.to_string(),
            expected: format!("array of {} elements", n),
        }),
    }
}
