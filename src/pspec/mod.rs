// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to drive power-spectrum estimation.
//!
//! [`PspecData`] holds the datasets to be cross-multiplied and configures the
//! estimation; the numerical work is delegated to a [`PspecEstimator`]. An
//! estimator is free to reorder or deduplicate the baseline pairs it is given,
//! so the results always describe the pairs that were actually computed, not
//! the pairs that were requested.

mod delay;
mod error;

pub use delay::DelaySpectrumEstimator;
pub use error::{EstimationError, PairingError, PspecError};

use hifitime::Epoch;
use itertools::Itertools;
use log::{debug, info, trace};
use marlu::c64;
use ndarray::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::{
    baseline::AntPair,
    beam::{BeamType, PspecBeam},
    blpairs::{antnums_to_blpair, BaselinePair},
    pol::PolPair,
    rephase::rephase_to_dset,
    taper::Taper,
    vis::{VisData, VisUnits},
};

/// A half-open range of channel indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct SpectralWindow {
    pub start: usize,
    pub end: usize,
}

impl SpectralWindow {
    pub fn num_chans(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check that this window is non-empty and fits inside `num_freqs`
    /// channels.
    pub fn validate(&self, num_freqs: usize) -> Result<(), EstimationError> {
        if self.num_chans() == 0 {
            return Err(EstimationError::EmptySpectralWindow {
                spw: self.to_string(),
            });
        }
        if self.end > num_freqs {
            return Err(EstimationError::SpectralWindowOutOfRange {
                spw: self.to_string(),
                num_freqs,
            });
        }
        Ok(())
    }
}

impl From<(usize, usize)> for SpectralWindow {
    fn from((start, end): (usize, usize)) -> Self {
        SpectralWindow { start, end }
    }
}

impl From<SpectralWindow> for (usize, usize) {
    fn from(spw: SpectralWindow) -> Self {
        (spw.start, spw.end)
    }
}

impl std::fmt::Display for SpectralWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// How the data are weighted before being cross-multiplied.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
pub enum Weighting {
    #[strum(serialize = "identity")]
    #[serde(rename = "identity")]
    Identity,

    /// Inverse covariance.
    #[strum(serialize = "iC")]
    #[serde(rename = "iC")]
    InverseCovariance,
}

/// The normalisation convention of the estimated spectra.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
pub enum Normalisation {
    #[strum(serialize = "I")]
    #[serde(rename = "I")]
    I,

    #[strum(serialize = "H^-1")]
    #[serde(rename = "H^-1")]
    HInv,

    #[strum(serialize = "V^-1/2")]
    #[serde(rename = "V^-1/2")]
    VInvSqrt,
}

/// Settings passed through to a [`PspecEstimator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    pub weighting: Weighting,
    pub norm: Normalisation,
    pub taper: Taper,
}

/// The spectra of a single spectral window.
#[derive(Debug, Clone, PartialEq)]
pub struct SpwSpectra {
    pub spw: SpectralWindow,

    /// The baseline pairs that were computed, in the order of the first axis
    /// of `data`.
    pub blpairs: Vec<BaselinePair>,

    pub pol_pairs: Vec<PolPair>,

    /// The delay of each spectral bin \[seconds\].
    pub delays_s: Array1<f64>,

    /// The spectra, indexed by (baseline pair, timestep, delay, polarisation
    /// pair).
    pub data: Array4<c64>,
}

/// A trait abstracting the numerical estimation of power spectra.
pub trait PspecEstimator: Sync + Send {
    /// Estimate spectra for spectral window `spw` by cross-multiplying the
    /// first baseline of each pair in `dset1` with the second baseline in
    /// `dset2`. Timesteps are paired by index.
    fn estimate(
        &self,
        dset1: &VisData,
        dset2: &VisData,
        blpairs: &[BaselinePair],
        pol_pairs: &[PolPair],
        spw: SpectralWindow,
        config: &EstimatorConfig,
    ) -> Result<SpwSpectra, EstimationError>;
}

/// Power spectra for all spectral windows, and the metadata describing them.
#[derive(Debug, Clone)]
pub struct UVPSpec {
    pub spws: Vec<SpwSpectra>,

    /// The baseline-pair number of each (baseline pair, timestep) row of the
    /// spectra.
    pub blpair_array: Vec<u64>,

    /// The timestamps of the two datasets that were cross-multiplied at each
    /// timestep.
    pub time_pairs: Vec<(Epoch, Epoch)>,

    pub config: EstimatorConfig,

    /// The units of the visibilities that were cross-multiplied.
    pub vis_units: VisUnits,

    pub beam_type: BeamType,
}

impl UVPSpec {
    pub fn num_timesteps(&self) -> usize {
        self.time_pairs.len()
    }

    /// Get the unique baseline-pair numbers in ascending order.
    pub fn get_blpairs(&self) -> Vec<u64> {
        self.blpair_array.iter().copied().sorted().dedup().collect()
    }

    /// Get the spectra of a baseline pair and polarisation pair in a spectral
    /// window, indexed by (timestep, delay).
    pub fn get_data(
        &self,
        spw_index: usize,
        blpair: BaselinePair,
        pol_pair: PolPair,
    ) -> Option<ArrayView2<c64>> {
        let spectra = self.spws.get(spw_index)?;
        let i_blpair = spectra.blpairs.iter().position(|&p| p == blpair)?;
        let i_pol_pair = spectra.pol_pairs.iter().position(|&p| p == pol_pair)?;
        Some(spectra.data.slice(s![i_blpair, .., .., i_pol_pair]))
    }
}

/// Datasets to be cross-multiplied, and the beam and estimator to use.
pub struct PspecData<'a> {
    dsets: Vec<VisData>,
    beam: &'a dyn PspecBeam,
    estimator: &'a dyn PspecEstimator,
}

impl<'a> PspecData<'a> {
    pub fn new(
        dsets: Vec<VisData>,
        beam: &'a dyn PspecBeam,
        estimator: &'a dyn PspecEstimator,
    ) -> PspecData<'a> {
        PspecData {
            dsets,
            beam,
            estimator,
        }
    }

    pub fn dsets(&self) -> &[VisData] {
        &self.dsets
    }

    /// Rephase all datasets onto the dataset at `ref_index`. This can only be
    /// done once.
    pub fn rephase_to_dset(&mut self, ref_index: usize) -> Result<(), PspecError> {
        rephase_to_dset(&mut self.dsets, ref_index)?;
        Ok(())
    }

    fn get_dset(&self, index: usize) -> Result<&VisData, PspecError> {
        self.dsets.get(index).ok_or(PspecError::BadDsetIndex {
            index,
            num_dsets: self.dsets.len(),
        })
    }

    /// Estimate power spectra for each pair (`bls1[i]`, `bls2[i]`), each
    /// polarisation pair and each spectral window. The first baseline of each
    /// pair is taken from dataset `dset_indices.0`, the second from
    /// `dset_indices.1`.
    ///
    /// Everything is validated before any estimation happens. Spectral windows
    /// are estimated in parallel.
    #[allow(clippy::too_many_arguments)]
    pub fn pspec(
        &self,
        bls1: &[AntPair],
        bls2: &[AntPair],
        dset_indices: (usize, usize),
        pol_pairs: &[PolPair],
        spws: &[SpectralWindow],
        config: &EstimatorConfig,
    ) -> Result<UVPSpec, PspecError> {
        let dset1 = self.get_dset(dset_indices.0)?;
        let dset2 = self.get_dset(dset_indices.1)?;

        if bls1.len() != bls2.len() {
            return Err(PairingError::LengthMismatch {
                bls1: bls1.len(),
                bls2: bls2.len(),
            }
            .into());
        }
        if bls1.is_empty() {
            return Err(PairingError::NoBlpairs.into());
        }
        if pol_pairs.is_empty() {
            return Err(PairingError::NoPolPairs.into());
        }
        for (&bl, dset) in bls1
            .iter()
            .map(|bl| (bl, dset_indices.0))
            .chain(bls2.iter().map(|bl| (bl, dset_indices.1)))
        {
            let vis = &self.dsets[dset];
            if vis.baseline_index(bl).is_none() {
                return Err(PairingError::MissingBaseline { bl, dset }.into());
            }
        }
        for &(pol1, pol2) in pol_pairs {
            if dset1.pol_index(pol1).is_none() {
                return Err(PairingError::MissingPol {
                    pol: pol1,
                    dset: dset_indices.0,
                }
                .into());
            }
            if dset2.pol_index(pol2).is_none() {
                return Err(PairingError::MissingPol {
                    pol: pol2,
                    dset: dset_indices.1,
                }
                .into());
            }
        }
        let blpairs: Vec<BaselinePair> = bls1.iter().copied().zip(bls2.iter().copied()).collect();
        for &blpair in &blpairs {
            antnums_to_blpair(blpair).map_err(PairingError::from)?;
        }

        if dset1.num_timesteps() != dset2.num_timesteps() {
            return Err(EstimationError::TimestepMismatch {
                num_timesteps1: dset1.num_timesteps(),
                num_timesteps2: dset2.num_timesteps(),
            }
            .into());
        }
        if dset1.freqs_hz() != dset2.freqs_hz() {
            return Err(EstimationError::FreqMismatch.into());
        }
        if spws.is_empty() {
            return Err(EstimationError::NoSpectralWindows.into());
        }
        for spw in spws {
            spw.validate(dset1.num_freqs())?;
        }

        info!(
            "Estimating power spectra for {} baseline pairs, {} polarisation pairs and {} spectral windows",
            blpairs.len(),
            pol_pairs.len(),
            spws.len()
        );
        debug!(
            "Weighting: {}, normalisation: {}, taper: {}",
            config.weighting, config.norm, config.taper
        );
        let spectra = spws
            .par_iter()
            .map(|&spw| {
                trace!("Estimating spectral window {spw}");
                self.estimator
                    .estimate(dset1, dset2, &blpairs, pol_pairs, spw, config)
                    .map_err(|e| match e {
                        EstimationError::MissingData { bl, pol, dset } => {
                            EstimationError::MissingData {
                                bl,
                                pol,
                                dset: if dset == 0 {
                                    dset_indices.0
                                } else {
                                    dset_indices.1
                                },
                            }
                        }
                        e => e,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        // Read back the pairs that were actually computed. Every spectral
        // window must agree, otherwise the rows of the results are ambiguous.
        let computed = spectra
            .first()
            .map(|s| s.blpairs.clone())
            .unwrap_or_default();
        if let Some(s) = spectra.iter().find(|s| s.blpairs != computed) {
            return Err(EstimationError::InconsistentBlpairs {
                spw: s.spw.to_string(),
            }
            .into());
        }
        let num_timesteps = dset1.num_timesteps();
        let mut blpair_array = Vec::with_capacity(computed.len() * num_timesteps);
        for &blpair in &computed {
            let number = antnums_to_blpair(blpair).map_err(PairingError::from)?;
            blpair_array.extend(std::iter::repeat(number).take(num_timesteps));
        }
        if computed.len() != blpairs.len() {
            debug!(
                "{} baseline pairs were requested, but {} were computed",
                blpairs.len(),
                computed.len()
            );
        }

        Ok(UVPSpec {
            spws: spectra,
            blpair_array,
            time_pairs: dset1
                .timestamps()
                .iter()
                .copied()
                .zip(dset2.timestamps().iter().copied())
                .collect(),
            config: *config,
            vis_units: dset1.units(),
            beam_type: self.beam.get_beam_type(),
        })
    }
}
