// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to abstract beam calculations.
//!
//! [`PspecBeam`] is a trait detailing how a beam model converts flux densities
//! into brightness temperatures. By making this trait, we can neatly abstract
//! over multiple beam models, including a simple [`NoBeam`] type (which
//! doesn't change units at all).

mod error;

pub use error::BeamError;

use log::trace;
use ndarray::prelude::*;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::{
    constants::{JY_PER_SI, K_BOLTZMANN, PI, VEL_C},
    pol::Polarisation,
};

/// Supported beam types.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
pub enum BeamType {
    /// A circular Gaussian beam whose width scales inversely with frequency.
    #[strum(serialize = "gaussian")]
    Gaussian,

    /// a.k.a. `NoBeam`. All conversion factors are 1.
    #[strum(serialize = "none")]
    None,
}

/// A trait abstracting beam code functions.
pub trait PspecBeam: Sync + Send {
    /// Get the type of beam.
    fn get_beam_type(&self) -> BeamType;

    /// Get the beam's integrated power (solid angle) at a frequency
    /// \[steradians\].
    fn get_omega(&self, freq_hz: f64, pol: Polarisation) -> Result<f64, BeamError>;

    /// Get the factors converting Jy to mK for each frequency.
    ///
    /// In the Rayleigh-Jeans limit, a flux density `S` spread over the beam
    /// solid angle `Ω` corresponds to a brightness temperature `T = S c^2 / (2
    /// k ν^2 Ω)`.
    fn jy_to_mk(&self, freqs_hz: &[f64], pol: Polarisation) -> Result<Array1<f64>, BeamError> {
        freqs_hz
            .iter()
            .map(|&freq_hz| {
                if !freq_hz.is_finite() || freq_hz <= 0.0 {
                    return Err(BeamError::BadFreq(freq_hz));
                }
                let omega = self.get_omega(freq_hz, pol)?;
                let kelvin_per_jy =
                    VEL_C * VEL_C / (2.0 * K_BOLTZMANN * freq_hz * freq_hz * omega * JY_PER_SI);
                Ok(kelvin_per_jy * 1e3)
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Array1::from)
    }
}

/// A Gaussian beam. Its full width at half maximum is `fwhm_rad` at
/// `ref_freq_hz` and scales as 1/ν. Both polarisations have the same
/// response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianBeam {
    fwhm_rad: f64,
    ref_freq_hz: f64,
}

impl GaussianBeam {
    pub fn new(fwhm_rad: f64, ref_freq_hz: f64) -> Result<GaussianBeam, BeamError> {
        if !fwhm_rad.is_finite() || fwhm_rad <= 0.0 || fwhm_rad >= PI {
            return Err(BeamError::BadFwhm(fwhm_rad));
        }
        if !ref_freq_hz.is_finite() || ref_freq_hz <= 0.0 {
            return Err(BeamError::BadFreq(ref_freq_hz));
        }
        Ok(GaussianBeam {
            fwhm_rad,
            ref_freq_hz,
        })
    }

    pub fn fwhm_at(&self, freq_hz: f64) -> f64 {
        self.fwhm_rad * self.ref_freq_hz / freq_hz
    }
}

impl PspecBeam for GaussianBeam {
    fn get_beam_type(&self) -> BeamType {
        BeamType::Gaussian
    }

    fn get_omega(&self, freq_hz: f64, _pol: Polarisation) -> Result<f64, BeamError> {
        if !freq_hz.is_finite() || freq_hz <= 0.0 {
            return Err(BeamError::BadFreq(freq_hz));
        }
        let fwhm = self.fwhm_at(freq_hz);
        let omega = PI * fwhm * fwhm / (4.0 * std::f64::consts::LN_2);
        trace!("Gaussian beam solid angle at {freq_hz} Hz: {omega} sr");
        Ok(omega)
    }
}

/// A beam implementation that doesn't change units; all conversion factors
/// are 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBeam;

impl PspecBeam for NoBeam {
    fn get_beam_type(&self) -> BeamType {
        BeamType::None
    }

    fn get_omega(&self, freq_hz: f64, _pol: Polarisation) -> Result<f64, BeamError> {
        // The solid angle for which the conversion is unity.
        Ok(VEL_C * VEL_C * 1e3 / (2.0 * K_BOLTZMANN * freq_hz * freq_hz * JY_PER_SI))
    }

    fn jy_to_mk(&self, freqs_hz: &[f64], _pol: Polarisation) -> Result<Array1<f64>, BeamError> {
        Ok(Array1::ones(freqs_hz.len()))
    }
}

/// Create a beam object from a type and, for a Gaussian beam, its FWHM at a
/// reference frequency.
pub fn create_beam_object(
    beam_type: BeamType,
    fwhm_rad: f64,
    ref_freq_hz: f64,
) -> Result<Box<dyn PspecBeam>, BeamError> {
    match beam_type {
        BeamType::Gaussian => Ok(Box::new(GaussianBeam::new(fwhm_rad, ref_freq_hz)?)),
        BeamType::None => Ok(Box::new(NoBeam)),
    }
}
