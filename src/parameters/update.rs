//! Fixed-mask updates between fitting stages
//!
//! Staged fitting alternates rounds in which different parameter subsets are
//! held fixed. [`ParamUpdate`] keeps the masks a run started with and derives
//! new masks from a fitted scene. It never touches flat vectors: the result
//! must be fed to [`Param::with_fixed`](crate::parameters::Param::with_fixed)
//! before the next pack/unpack round, since slot counts depend on the masks.

use crate::error::{LensParamError, Result};
use crate::parameters::registry::Family;
use crate::parameters::value::{all_free, FixedConfig, FixedMask, Kwargs, SceneKwargs};
use log::debug;
use serde::{Deserialize, Serialize};

/// Which families to freeze in [`ParamUpdate::update_fixed_simple`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixOptions {
    pub fix_lens: bool,
    pub fix_source: bool,
    pub fix_lens_light: bool,
    pub fix_point_source: bool,
    pub fix_cosmo: bool,

    /// Hold the lens `gamma` fixed at its fitted value, even when the lens is not frozen;
    /// when unset, a frozen lens keeps `gamma` free
    pub gamma_fixed: bool,
}

impl FixOptions {
    /// Freeze every family
    pub fn all() -> Self {
        Self {
            fix_lens: true,
            fix_source: true,
            fix_lens_light: true,
            fix_point_source: true,
            fix_cosmo: true,
            gamma_fixed: true,
        }
    }

    /// Whether a family is frozen
    pub fn fixes(&self, family: Family) -> bool {
        match family {
            Family::Lens => self.fix_lens,
            Family::SourceLight => self.fix_source,
            Family::LensLight => self.fix_lens_light,
            Family::PointSource => self.fix_point_source,
            Family::Cosmology => self.fix_cosmo,
        }
    }
}

const GAMMA: &str = "gamma";

/// Derives fixed masks for the next fitting stage
#[derive(Debug, Clone, Default)]
pub struct ParamUpdate {
    init_fixed: FixedConfig,
}

impl ParamUpdate {
    /// Create an updater around the masks the run started with
    pub fn new(init_fixed: FixedConfig) -> Self {
        Self { init_fixed }
    }

    /// Masks the run started with
    pub fn init_fixed(&self) -> &FixedConfig {
        &self.init_fixed
    }

    /// Freeze whole families at their fitted values
    ///
    /// For every family selected in `options`, each key present in the fitted
    /// keyword mapping of an instance is fixed to its fitted value, on top of the
    /// initial mask. Families that are not selected get their initial masks back.
    ///
    /// # Examples
    ///
    /// ```
    /// use lensparams_rs::kwargs;
    /// use lensparams_rs::parameters::{FixOptions, FixedConfig, ParamUpdate, SceneKwargs};
    ///
    /// let update = ParamUpdate::new(FixedConfig::default());
    /// let mut fitted = SceneKwargs::new();
    /// fitted.lens.push(kwargs! { "theta_E" => 1.0, "gamma" => 2.0 });
    ///
    /// let options = FixOptions { fix_lens: true, ..Default::default() };
    /// let fixed = update.update_fixed_simple(&fitted, options).unwrap();
    /// assert!(fixed.lens[0].contains_key("theta_E"));
    /// assert!(!fixed.lens[0].contains_key("gamma"));
    /// ```
    pub fn update_fixed_simple(
        &self,
        kwargs: &SceneKwargs,
        options: FixOptions,
    ) -> Result<FixedConfig> {
        let mut fixed = FixedConfig::new();

        for family in Family::ORDER {
            let init = self.init_masks(family, kwargs[family].len())?;
            fixed[family] = if options.fixes(family) {
                init.into_iter()
                    .zip(&kwargs[family])
                    .map(|(mask, fitted)| merge(mask, fitted))
                    .collect()
            } else {
                init
            };
        }

        let init_lens = self.init_masks(Family::Lens, kwargs.lens.len())?;
        for (k, mask) in fixed.lens.iter_mut().enumerate() {
            match kwargs.lens[k].get(GAMMA) {
                Some(gamma) if options.gamma_fixed => {
                    mask.insert(GAMMA.to_string(), gamma.clone());
                }
                _ if options.fix_lens && !options.gamma_fixed => match init_lens[k].get(GAMMA) {
                    Some(gamma) => {
                        mask.insert(GAMMA.to_string(), gamma.clone());
                    }
                    None => {
                        mask.remove(GAMMA);
                    }
                },
                _ => {}
            }
        }

        debug!("updated fixed masks with {:?}", options);
        Ok(fixed)
    }

    /// Fix selected parameters of one family at their fitted values
    ///
    /// Other families, and unnamed parameters of this family, keep their initial
    /// masks. Names missing from an instance's fitted mapping are skipped.
    pub fn fix_names(
        &self,
        kwargs: &SceneKwargs,
        family: Family,
        names: &[&str],
    ) -> Result<FixedConfig> {
        let mut fixed = self.init_fixed.clone();
        let mut masks = self.init_masks(family, kwargs[family].len())?;

        for (mask, fitted) in masks.iter_mut().zip(&kwargs[family]) {
            for name in names {
                if let Some(value) = fitted.get(*name) {
                    mask.insert(name.to_string(), value.clone());
                }
            }
        }

        fixed[family] = masks;
        Ok(fixed)
    }

    /// Initial masks of a family, expanded to `n` empty masks if they fix nothing
    fn init_masks(&self, family: Family, n: usize) -> Result<Vec<FixedMask>> {
        let init = &self.init_fixed[family];
        if all_free(init) {
            return Ok(vec![FixedMask::new(); n]);
        }
        if init.len() != n {
            return Err(LensParamError::LengthMismatch(format!(
                "{} has {} initial fixed masks but {} fitted keyword mappings",
                family,
                init.len(),
                n
            )));
        }
        Ok(init.clone())
    }
}

fn merge(mut mask: FixedMask, fitted: &Kwargs) -> FixedMask {
    for (name, value) in fitted {
        mask.insert(name.clone(), value.clone());
    }
    mask
}
