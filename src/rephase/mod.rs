// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to rephase datasets onto a reference dataset's phase centre.
//!
//! Datasets taken at different LSTs are phased to different parts of the sky
//! (their zeniths at each timestamp). Cross-multiplying them without
//! correction loses coherence in proportion to the LST offset and baseline
//! length. Here, each timestamp of a dataset is fringe-stopped onto the zenith
//! of the reference dataset's corresponding timestamp.
//!
//! Rephasing is one-shot. Every dataset carries a [`PhaseState`], and
//! rephasing a dataset that is already rephased (or using one as the
//! reference) is an error rather than a silent double rotation.

#[cfg(test)]
mod tests;

use log::debug;
use marlu::{HADec, UVW};
use ndarray::Axis;
use thiserror::Error;

use crate::{
    constants::{TAU, VEL_C},
    math::{azel_to_enu, cexp, dot, wrap_angle},
    vis::{PhaseState, VisData},
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RephaseError {
    #[error("Dataset {index} has already been rephased; rephasing can only be done once")]
    AlreadyRephased { index: usize },

    #[error("Reference dataset {index} was requested, but there are only {num_dsets} datasets")]
    BadReferenceIndex { index: usize, num_dsets: usize },

    #[error("Dataset {index} has {got} timesteps, but the reference dataset has {expected}")]
    TimestepMismatch {
        index: usize,
        expected: usize,
        got: usize,
    },

    #[error("Dataset {index} has different frequencies to the reference dataset")]
    FreqMismatch { index: usize },
}

/// Rephase every dataset in `dsets` other than `ref_index` onto the LSTs of
/// `dsets[ref_index]`. Timestamps are matched by index. All datasets must be
/// unrephased; afterwards, every dataset other than the reference is marked
/// [`PhaseState::Rephased`].
pub fn rephase_to_dset(dsets: &mut [VisData], ref_index: usize) -> Result<(), RephaseError> {
    let num_dsets = dsets.len();
    let reference = dsets.get(ref_index).ok_or(RephaseError::BadReferenceIndex {
        index: ref_index,
        num_dsets,
    })?;
    let ref_lsts = reference.lsts_rad().to_vec();
    let ref_freqs = reference.freqs_hz().to_vec();

    // Check everything before touching anything; a failure must leave all
    // datasets untouched.
    for (index, dset) in dsets.iter().enumerate() {
        if dset.phase_state() == PhaseState::Rephased {
            return Err(RephaseError::AlreadyRephased { index });
        }
        if index == ref_index {
            continue;
        }
        if dset.num_timesteps() != ref_lsts.len() {
            return Err(RephaseError::TimestepMismatch {
                index,
                expected: ref_lsts.len(),
                got: dset.num_timesteps(),
            });
        }
        if dset.freqs_hz() != ref_freqs.as_slice() {
            return Err(RephaseError::FreqMismatch { index });
        }
    }

    for (index, dset) in dsets.iter_mut().enumerate() {
        if index == ref_index {
            continue;
        }
        debug!("Rephasing dataset {index} onto dataset {ref_index}");
        rephase_to_lsts(dset, &ref_lsts);
        dset.set_phase_state(PhaseState::Rephased);
    }

    Ok(())
}

/// Rotate the phases of `dset` from zenith at its own LSTs to zenith at
/// `new_lsts_rad`. The number of LSTs must match the number of timesteps.
fn rephase_to_lsts(dset: &mut VisData, new_lsts_rad: &[f64]) {
    let latitude_rad = dset.latitude_rad();
    let freqs_hz = dset.freqs_hz().to_vec();
    let uvws = dset.uvws().to_owned();
    let old_lsts_rad = dset.lsts_rad().to_vec();
    let zenith = azel_to_enu(HADec::from_radians(0.0, latitude_rad).to_azel(latitude_rad));

    let mut vis = dset.vis_mut();
    for (i_time, (&old_lst, &new_lst)) in old_lsts_rad.iter().zip(new_lsts_rad).enumerate() {
        // The new phase centre, as seen from this dataset's timestamp, is
        // offset in hour angle by the LST difference.
        let hour_angle = wrap_angle(old_lst - new_lst);
        let new_centre =
            azel_to_enu(HADec::from_radians(hour_angle, latitude_rad).to_azel(latitude_rad));
        let shift = UVW {
            u: new_centre.u - zenith.u,
            v: new_centre.v - zenith.v,
            w: new_centre.w - zenith.w,
        };

        for (i_bl, mut vis_fp) in vis
            .index_axis_mut(Axis(0), i_time)
            .outer_iter_mut()
            .enumerate()
        {
            let delay_s = dot(uvws[(i_time, i_bl)], shift) / VEL_C;
            for (mut vis_p, &freq_hz) in vis_fp.outer_iter_mut().zip(&freqs_hz) {
                let phasor = cexp(TAU * freq_hz * delay_s);
                vis_p.mapv_inplace(|v| v * phasor);
            }
        }
    }
}
