// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The end-to-end power-spectrum calculation.
//!
//! A dataset is split into two halves of interleaved timesteps, converted from
//! Jy to mK, and the second half is rephased onto the first. Redundant groups
//! are found from the geometry of the first timestep, baseline pairs are
//! formed from one group, and these are cross-multiplied between the halves
//! in each spectral window.


use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    beam::PspecBeam,
    blpairs::{select_blpairs, BlpairError, BlpairOptions, GroupPolicy},
    constants::{DEFAULT_REDUNDANCY_TOLERANCE_M, DEFAULT_SPECTRAL_WINDOWS},
    pol::{PolPair, Polarisation},
    pspec::{
        EstimatorConfig, Normalisation, PspecData, PspecError, PspecEstimator, SpectralWindow,
        UVPSpec, Weighting,
    },
    redundancy::{get_baseline_redundancies, RedundancyError},
    taper::Taper,
    units::{jy_to_mk, UnitConversionError},
    vis::{VisError, VisRead, VisReadError},
};

/// Everything that may be configured about a power-spectrum calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PspecParams {
    /// Baselines closer than this are redundant \[metres\].
    pub tolerance_m: f64,

    /// Half-open channel ranges.
    pub spws: Vec<SpectralWindow>,

    pub pol_pairs: Vec<PolPair>,

    pub weighting: Weighting,

    pub norm: Normalisation,

    pub taper: Taper,

    /// The polarisation of the beam used for the Jy to mK conversion of all
    /// polarisations.
    pub beam_pol: Polarisation,

    /// The half that the other half is rephased onto.
    pub ref_dset: usize,

    pub group_policy: GroupPolicy,

    pub exclude_auto_bls: bool,

    pub exclude_permutations: bool,
}

impl Default for PspecParams {
    fn default() -> Self {
        Self {
            tolerance_m: DEFAULT_REDUNDANCY_TOLERANCE_M,
            spws: DEFAULT_SPECTRAL_WINDOWS
                .iter()
                .copied()
                .map(SpectralWindow::from)
                .collect(),
            pol_pairs: vec![(Polarisation::XX, Polarisation::XX)],
            weighting: Weighting::Identity,
            norm: Normalisation::I,
            taper: Taper::BlackmanHarris,
            beam_pol: Polarisation::XX,
            ref_dset: 0,
            group_policy: GroupPolicy::Shortest,
            exclude_auto_bls: true,
            exclude_permutations: false,
        }
    }
}

impl PspecParams {
    fn blpair_options(&self) -> BlpairOptions {
        BlpairOptions {
            policy: self.group_policy,
            exclude_auto_bls: self.exclude_auto_bls,
            exclude_cross_bls: false,
            exclude_permutations: self.exclude_permutations,
        }
    }

    fn estimator_config(&self) -> EstimatorConfig {
        EstimatorConfig {
            weighting: self.weighting,
            norm: self.norm,
            taper: self.taper,
        }
    }
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    VisRead(#[from] VisReadError),

    #[error(transparent)]
    Vis(#[from] VisError),

    #[error(transparent)]
    UnitConversion(#[from] UnitConversionError),

    #[error(transparent)]
    Redundancy(#[from] RedundancyError),

    #[error(transparent)]
    Blpair(#[from] BlpairError),

    #[error(transparent)]
    Pspec(#[from] PspecError),
}

/// Calculate power spectra from the visibilities of `reader`. The spectra and
/// the unique baseline-pair numbers that were actually computed are returned.
pub fn pspec_calc(
    reader: &dyn VisRead,
    beam: &dyn PspecBeam,
    estimator: &dyn PspecEstimator,
    params: &PspecParams,
) -> Result<(UVPSpec, Vec<u64>), PipelineError> {
    let vis = reader.read()?;
    info!(
        "Read {} timesteps, {} baselines, {} channels",
        vis.num_timesteps(),
        vis.ant_pairs().len(),
        vis.num_freqs()
    );

    // Halves of interleaved timesteps have independent noise.
    let (mut half1, mut half2) = vis.split_interleaved()?;
    for half in [&mut half1, &mut half2] {
        jy_to_mk(half, beam, params.beam_pol)?;
    }

    let mut ds = PspecData::new(vec![half1, half2], beam, estimator);
    ds.rephase_to_dset(params.ref_dset)?;

    // Antenna positions don't change, so one timestep's geometry is enough.
    let geometry = vis.geometry_snapshot()?;
    let groups = get_baseline_redundancies(&geometry.baselines, &geometry.uvws, params.tolerance_m)?;
    let selection = select_blpairs(&groups, &params.blpair_options())?;
    debug!(
        "{} redundant groups; using group {} ({:?})",
        groups.groups().len(),
        selection.group_index,
        selection.state
    );

    let uvp = ds.pspec(
        &selection.bls1,
        &selection.bls2,
        (0, 1),
        &params.pol_pairs,
        &params.spws,
        &params.estimator_config(),
    )?;
    let blpairs = uvp.get_blpairs();
    info!("Computed power spectra for {} baseline pairs", blpairs.len());

    Ok((uvp, blpairs))
}
