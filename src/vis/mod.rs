// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! In-memory visibility data.
//!
//! Reading visibilities from disk is the business of a [`VisRead`]
//! implementor; all that is needed here is a dataset indexed by time,
//! baseline, frequency and polarisation, plus the metadata needed to split,
//! scale and rephase it.

mod error;

pub use error::{VisError, VisReadError};

use std::collections::HashSet;

use hifitime::Epoch;
use log::debug;
use marlu::{c64, UVW};
use ndarray::prelude::*;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use vec1::Vec1;

use crate::{
    baseline::{antnums_to_baseline, AntPair},
    pol::Polarisation,
    redundancy::BaselineGeometry,
};

/// A trait abstracting the source of visibilities.
pub trait VisRead: Sync + Send {
    /// Read the whole dataset into memory.
    fn read(&self) -> Result<VisData, VisReadError>;
}

/// The units of visibility amplitudes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
pub enum VisUnits {
    #[strum(serialize = "Jy")]
    Jansky,

    #[strum(serialize = "mK")]
    MilliKelvin,

    #[strum(serialize = "UNCALIB")]
    Uncalibrated,
}

/// Whether a dataset's phases still track its own phase centre, or have been
/// rotated onto another dataset's. Rephasing is only allowed once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseState {
    Raw,
    Rephased,
}

/// Visibilities and their metadata. The visibility array is indexed by
/// (timestep, baseline, frequency, polarisation).
#[derive(Debug, Clone)]
pub struct VisData {
    vis_tbfp: Array4<c64>,

    /// The UVWs of each baseline at each timestep \[metres\].
    uvws_tb: Array2<UVW>,

    /// Ascendingly sorted, unique timestamps.
    timestamps: Vec1<Epoch>,

    /// The local sidereal time of each timestamp \[radians\].
    lsts_rad: Vec<f64>,

    ant_pairs: Vec<AntPair>,

    freqs_hz: Vec<f64>,

    pols: Vec<Polarisation>,

    /// The latitude of the array \[radians\].
    latitude_rad: f64,

    units: VisUnits,

    phase_state: PhaseState,
}

fn check_shape(array: &'static str, expected: &[usize], got: &[usize]) -> Result<(), VisError> {
    if expected != got {
        return Err(VisError::BadArrayShape {
            array,
            expected: expected.to_vec(),
            got: got.to_vec(),
        });
    }
    Ok(())
}

impl VisData {
    /// Create a new [`VisData`]. The visibilities are assumed to be phased to
    /// zenith at each timestamp, i.e. [`PhaseState::Raw`].
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        vis_tbfp: Array4<c64>,
        uvws_tb: Array2<UVW>,
        timestamps: Vec1<Epoch>,
        lsts_rad: Vec<f64>,
        ant_pairs: Vec<AntPair>,
        freqs_hz: Vec<f64>,
        pols: Vec<Polarisation>,
        latitude_rad: f64,
        units: VisUnits,
    ) -> Result<VisData, VisError> {
        if timestamps.len() != lsts_rad.len() {
            return Err(VisError::TimesLstsMismatch {
                timestamps: timestamps.len(),
                lsts: lsts_rad.len(),
            });
        }
        check_shape(
            "visibility",
            &[timestamps.len(), ant_pairs.len(), freqs_hz.len(), pols.len()],
            vis_tbfp.shape(),
        )?;
        check_shape("UVW", &[timestamps.len(), ant_pairs.len()], uvws_tb.shape())?;

        let mut seen = HashSet::with_capacity(ant_pairs.len());
        for &(ant1, ant2) in &ant_pairs {
            // Make sure the antennas can be described by baseline numbers.
            antnums_to_baseline(ant1, ant2, false)?;
            if !seen.insert((ant1.min(ant2), ant1.max(ant2))) {
                return Err(VisError::DuplicateBaseline((ant1, ant2)));
            }
        }

        Ok(VisData {
            vis_tbfp,
            uvws_tb,
            timestamps,
            lsts_rad,
            ant_pairs,
            freqs_hz,
            pols,
            latitude_rad,
            units,
            phase_state: PhaseState::Raw,
        })
    }

    pub fn vis(&self) -> ArrayView4<c64> {
        self.vis_tbfp.view()
    }

    pub(crate) fn vis_mut(&mut self) -> ArrayViewMut4<c64> {
        self.vis_tbfp.view_mut()
    }

    pub fn uvws(&self) -> ArrayView2<UVW> {
        self.uvws_tb.view()
    }

    pub fn timestamps(&self) -> &Vec1<Epoch> {
        &self.timestamps
    }

    pub fn lsts_rad(&self) -> &[f64] {
        &self.lsts_rad
    }

    pub fn ant_pairs(&self) -> &[AntPair] {
        &self.ant_pairs
    }

    pub fn freqs_hz(&self) -> &[f64] {
        &self.freqs_hz
    }

    pub fn pols(&self) -> &[Polarisation] {
        &self.pols
    }

    pub fn latitude_rad(&self) -> f64 {
        self.latitude_rad
    }

    pub fn units(&self) -> VisUnits {
        self.units
    }

    pub(crate) fn set_units(&mut self, units: VisUnits) {
        self.units = units;
    }

    pub fn phase_state(&self) -> PhaseState {
        self.phase_state
    }

    pub(crate) fn set_phase_state(&mut self, phase_state: PhaseState) {
        self.phase_state = phase_state;
    }

    pub fn num_timesteps(&self) -> usize {
        self.timestamps.len()
    }

    pub fn num_freqs(&self) -> usize {
        self.freqs_hz.len()
    }

    /// Find the index of a baseline. The second value is `true` if the
    /// baseline is stored with its antennas reversed, in which case its
    /// visibilities must be conjugated.
    pub fn baseline_index(&self, bl: AntPair) -> Option<(usize, bool)> {
        self.ant_pairs.iter().enumerate().find_map(|(i, &stored)| {
            if stored == bl {
                Some((i, false))
            } else if stored == (bl.1, bl.0) {
                Some((i, true))
            } else {
                None
            }
        })
    }

    pub fn pol_index(&self, pol: Polarisation) -> Option<usize> {
        self.pols.iter().position(|&p| p == pol)
    }

    /// Get a copy of the visibilities for a baseline and polarisation, with
    /// shape (timestep, frequency). Returns `None` if either isn't present.
    pub fn get_data(&self, bl: AntPair, pol: Polarisation) -> Option<Array2<c64>> {
        let (i_bl, conjugate) = self.baseline_index(bl)?;
        let i_pol = self.pol_index(pol)?;
        let data = self.vis_tbfp.slice(s![.., i_bl, .., i_pol]);
        Some(if conjugate {
            data.mapv(|v| v.conj())
        } else {
            data.to_owned()
        })
    }

    /// Make a new dataset from a subset of timesteps. Nothing is shared with
    /// `self`.
    pub fn select_timesteps(&self, timesteps: &[usize]) -> Result<VisData, VisError> {
        if timesteps.is_empty() {
            return Err(VisError::EmptyTimeSelection);
        }
        if let Some(&bad) = timesteps.iter().find(|&&t| t >= self.num_timesteps()) {
            return Err(VisError::BadTimestep {
                got: bad,
                num_times: self.num_timesteps(),
            });
        }

        let timestamps = timesteps
            .iter()
            .map(|&t| self.timestamps[t])
            .collect::<Vec<_>>();
        let timestamps = Vec1::try_from_vec(timestamps).map_err(|_| VisError::EmptyTimeSelection)?;
        Ok(VisData {
            vis_tbfp: self.vis_tbfp.select(Axis(0), timesteps),
            uvws_tb: self.uvws_tb.select(Axis(0), timesteps),
            timestamps,
            lsts_rad: timesteps.iter().map(|&t| self.lsts_rad[t]).collect(),
            ant_pairs: self.ant_pairs.clone(),
            freqs_hz: self.freqs_hz.clone(),
            pols: self.pols.clone(),
            latitude_rad: self.latitude_rad,
            units: self.units,
            phase_state: self.phase_state,
        })
    }

    /// Split the dataset into two halves of interleaved timesteps. The first
    /// half gets the even timesteps (never the last timestep), the second half
    /// gets the odd timesteps, so both halves always have the same number of
    /// timesteps. Cross-multiplying the halves avoids a noise bias.
    pub fn split_interleaved(&self) -> Result<(VisData, VisData), VisError> {
        let n = self.num_timesteps();
        if n < 2 {
            return Err(VisError::TooFewTimesToInterleave(n));
        }
        let even: Vec<usize> = (0..n - 1).step_by(2).collect();
        let odd: Vec<usize> = (1..n).step_by(2).collect();
        debug!(
            "Interleaving {n} timesteps into halves of {} and {}",
            even.len(),
            odd.len()
        );
        Ok((self.select_timesteps(&even)?, self.select_timesteps(&odd)?))
    }

    /// Get the baseline numbers and UVWs of the cross-correlation baselines at
    /// the first timestep. Auto-correlations are left out; they would all
    /// form a zero-length group. Antenna positions are assumed not to change
    /// over the observation.
    pub fn geometry_snapshot(&self) -> Result<BaselineGeometry, VisError> {
        let mut baselines = Vec::with_capacity(self.ant_pairs.len());
        let mut uvws = Vec::with_capacity(self.ant_pairs.len());
        for (&(ant1, ant2), &uvw) in self.ant_pairs.iter().zip(self.uvws_tb.row(0)) {
            if ant1 == ant2 {
                continue;
            }
            baselines.push(antnums_to_baseline(ant1, ant2, false)?);
            uvws.push(uvw);
        }
        let num_autos = self.ant_pairs.len() - baselines.len();
        if num_autos > 0 {
            debug!("Ignoring {num_autos} auto-correlation baselines for redundancy");
        }
        Ok(BaselineGeometry { baselines, uvws })
    }
}

impl VisRead for VisData {
    fn read(&self) -> Result<VisData, VisReadError> {
        Ok(self.clone())
    }
}
