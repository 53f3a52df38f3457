// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use approx::assert_abs_diff_eq;
use marlu::c64;
use ndarray::prelude::*;

use super::*;
use crate::tests::{hera_like_antennas, synthetic_vis};

/// Make a dataset like `template`, but with different LSTs and visibilities.
fn with_vis_and_lsts(template: &VisData, vis: Array4<c64>, lsts_rad: Vec<f64>) -> VisData {
    VisData::new(
        vis,
        template.uvws().to_owned(),
        template.timestamps().clone(),
        lsts_rad,
        template.ant_pairs().to_vec(),
        template.freqs_hz().to_vec(),
        template.pols().to_vec(),
        template.latitude_rad(),
        template.units(),
    )
    .unwrap()
}

/// A point source at the zenith of `lsts_ref`, as seen by a dataset at
/// `lsts`.
fn source_at_reference_zenith(template: &VisData, lsts: &[f64], lsts_ref: &[f64]) -> Array4<c64> {
    let lat = template.latitude_rad();
    let mut vis = Array4::zeros(template.vis().raw_dim());
    for (i_time, mut vis_bfp) in vis.outer_iter_mut().enumerate() {
        let s = azel_to_enu(HADec::from_radians(lsts[i_time] - lsts_ref[i_time], lat).to_azel(lat));
        for (i_bl, mut vis_fp) in vis_bfp.outer_iter_mut().enumerate() {
            let b = template.uvws()[(i_time, i_bl)];
            for (i_freq, mut vis_p) in vis_fp.outer_iter_mut().enumerate() {
                let freq = template.freqs_hz()[i_freq];
                vis_p.fill(cexp(-TAU * freq / VEL_C * dot(b, s)));
            }
        }
    }
    vis
}

#[test]
fn rephasing_recovers_coherence() {
    let template = synthetic_vis(&hera_like_antennas(), 3, 32);
    let lsts_ref = template.lsts_rad().to_vec();
    // Offset by one 10.7 s integration.
    let lsts_other: Vec<f64> = lsts_ref.iter().map(|l| l + 7.8e-4).collect();

    let ones = Array4::from_elem(template.vis().raw_dim(), c64::new(1.0, 0.0));
    let reference = with_vis_and_lsts(&template, ones.clone(), lsts_ref.clone());
    let other = with_vis_and_lsts(
        &template,
        source_at_reference_zenith(&template, &lsts_other, &lsts_ref),
        lsts_other,
    );
    // Before rephasing, the datasets disagree.
    assert!(
        other
            .vis()
            .iter()
            .map(|v| (v - c64::new(1.0, 0.0)).norm())
            .fold(0.0, f64::max)
            > 1e-3
    );

    let mut dsets = vec![reference, other];
    rephase_to_dset(&mut dsets, 0).unwrap();
    assert_eq!(dsets[0].phase_state(), PhaseState::Raw);
    assert_eq!(dsets[1].phase_state(), PhaseState::Rephased);
    assert_abs_diff_eq!(dsets[0].vis(), ones.view());
    assert_abs_diff_eq!(dsets[1].vis(), ones.view(), epsilon = 1e-9);
}

#[test]
fn rephasing_to_the_same_lsts_does_nothing() {
    let vis = synthetic_vis(&hera_like_antennas(), 2, 16);
    let mut dsets = vec![vis.clone(), vis.clone()];
    rephase_to_dset(&mut dsets, 0).unwrap();
    assert_abs_diff_eq!(dsets[1].vis(), vis.vis(), epsilon = 1e-12);
}

#[test]
fn rephasing_preserves_amplitudes() {
    let vis = synthetic_vis(&hera_like_antennas(), 4, 16);
    let (half1, half2) = vis.split_interleaved().unwrap();
    let amps_before = half2.vis().mapv(|v| v.norm());
    let mut dsets = vec![half1, half2];
    rephase_to_dset(&mut dsets, 0).unwrap();
    let amps_after = dsets[1].vis().mapv(|v| v.norm());
    assert_abs_diff_eq!(amps_after, amps_before, epsilon = 1e-12);
}

#[test]
fn rephasing_twice_is_an_error() {
    let vis = synthetic_vis(&hera_like_antennas(), 4, 8);
    let (half1, half2) = vis.split_interleaved().unwrap();
    let mut dsets = vec![half1, half2];
    rephase_to_dset(&mut dsets, 0).unwrap();
    let after_first = dsets[1].vis().to_owned();

    assert_eq!(
        rephase_to_dset(&mut dsets, 0),
        Err(RephaseError::AlreadyRephased { index: 1 })
    );
    // Swapping the reference is no escape.
    assert_eq!(
        rephase_to_dset(&mut dsets, 1),
        Err(RephaseError::AlreadyRephased { index: 1 })
    );
    // Nothing was changed by the failed attempts.
    assert_eq!(dsets[1].vis(), after_first.view());
}

#[test]
fn bad_rephasing_requests() {
    let vis = synthetic_vis(&hera_like_antennas(), 5, 8);
    let (half1, half2) = vis.split_interleaved().unwrap();
    let mut dsets = vec![half1.clone(), half2];
    assert_eq!(
        rephase_to_dset(&mut dsets, 2),
        Err(RephaseError::BadReferenceIndex {
            index: 2,
            num_dsets: 2
        })
    );

    let mut dsets = vec![half1, vis];
    assert_eq!(
        rephase_to_dset(&mut dsets, 0),
        Err(RephaseError::TimestepMismatch {
            index: 1,
            expected: 2,
            got: 5
        })
    );
    assert_eq!(dsets[1].phase_state(), PhaseState::Raw);

    let narrow = synthetic_vis(&hera_like_antennas(), 5, 4);
    let mut dsets = vec![dsets.remove(1), narrow];
    assert_eq!(
        rephase_to_dset(&mut dsets, 0),
        Err(RephaseError::FreqMismatch { index: 1 })
    );
}
