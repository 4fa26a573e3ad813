//! Instrument and observation properties
//!
//! [`Data`] composes an [`Instrument`] and an [`Observation`] and derives the
//! quantities a model image needs in the count unit of the data. Noise
//! estimation itself is left to the consumer.

use crate::error::{LensParamError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Detector properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    /// Standard deviation of the read-out noise, in electrons
    pub read_noise: f64,

    /// Pixel size in arcseconds
    pub pixel_scale: f64,

    /// Electrons per ADU
    pub ccd_gain: f64,
}

/// Point spread function model of an observation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PsfType {
    #[default]
    Gaussian,
    Pixel,
    None,
}

/// Exposure and sky properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Exposure time of a single exposure, in seconds
    pub exposure_time: f64,

    /// Sky brightness in magnitudes per square arcsecond
    pub sky_brightness: f64,

    /// Magnitude registered as one ADU per second
    pub magnitude_zero_point: f64,

    /// Full width at half maximum of the PSF, in arcseconds
    pub seeing: f64,

    /// Number of combined exposures
    #[serde(default = "default_num_exposures")]
    pub num_exposures: u32,

    #[serde(default)]
    pub psf_type: PsfType,
}

fn default_num_exposures() -> u32 {
    1
}

impl Observation {
    /// Summed exposure time of all exposures
    pub fn total_exposure_time(&self) -> f64 {
        self.exposure_time * self.num_exposures as f64
    }
}

/// Unit of the data counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CountUnit {
    /// Electrons, assumed IID
    #[serde(rename = "e-")]
    Electrons,

    /// Analog-to-digital units
    #[serde(rename = "ADU")]
    Adu,
}

impl FromStr for CountUnit {
    type Err = LensParamError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "e-" => Ok(CountUnit::Electrons),
            "ADU" => Ok(CountUnit::Adu),
            _ => Err(LensParamError::InvalidInput(format!(
                "count unit '{}' not supported, choose 'e-' or 'ADU'",
                s
            ))),
        }
    }
}

impl fmt::Display for CountUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountUnit::Electrons => f.write_str("e-"),
            CountUnit::Adu => f.write_str("ADU"),
        }
    }
}

/// Convert an apparent magnitude to ADU per second
pub fn magnitude_to_cps(magnitude: f64, magnitude_zero_point: f64) -> f64 {
    10f64.powf(-(magnitude - magnitude_zero_point) / 2.5)
}

/// An instrument and an observation expressed in one count unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Data {
    pub instrument: Instrument,
    pub observation: Observation,
    pub count_unit: CountUnit,
}

impl Data {
    /// Combine an instrument and an observation
    pub fn new(instrument: Instrument, observation: Observation, count_unit: CountUnit) -> Self {
        Self {
            instrument,
            observation,
            count_unit,
        }
    }

    /// Summed exposure time of all exposures
    pub fn exposure_time(&self) -> f64 {
        self.observation.total_exposure_time()
    }

    /// Read noise standard deviation in the data unit
    pub fn read_noise(&self) -> f64 {
        match self.count_unit {
            CountUnit::Adu => self.instrument.read_noise / self.instrument.ccd_gain,
            CountUnit::Electrons => self.instrument.read_noise,
        }
    }

    /// Sky brightness in counts per second per square arcsecond, in the data unit
    pub fn sky_brightness(&self) -> f64 {
        self.magnitude_to_cps(self.observation.sky_brightness)
    }

    /// Counts per second of an object of the given magnitude, in the data unit
    ///
    /// # Examples
    ///
    /// ```
    /// use lensparams_rs::observation::{CountUnit, Data, Instrument, Observation, PsfType};
    ///
    /// let data = Data::new(
    ///     Instrument { read_noise: 4.0, pixel_scale: 0.05, ccd_gain: 2.0 },
    ///     Observation {
    ///         exposure_time: 100.0,
    ///         sky_brightness: 22.0,
    ///         magnitude_zero_point: 25.0,
    ///         seeing: 0.1,
    ///         num_exposures: 2,
    ///         psf_type: PsfType::Gaussian,
    ///     },
    ///     CountUnit::Electrons,
    /// );
    /// assert_eq!(data.magnitude_to_cps(25.0), 2.0);
    /// assert_eq!(data.exposure_time(), 200.0);
    /// ```
    pub fn magnitude_to_cps(&self, magnitude: f64) -> f64 {
        let cps = magnitude_to_cps(magnitude, self.observation.magnitude_zero_point);
        match self.count_unit {
            CountUnit::Electrons => cps * self.instrument.ccd_gain,
            CountUnit::Adu => cps,
        }
    }
}
