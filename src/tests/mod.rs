// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Helpful functions for tests. Visibilities are synthesised so that tests
//! don't need any data on disk.

use hifitime::{Duration, Epoch};
use marlu::{c64, UVW};
use ndarray::prelude::*;
use vec1::Vec1;

use crate::{
    baseline::AntPair,
    constants::{HERA_LAT_DEG, TAU, VEL_C},
    pol::Polarisation,
    vis::{VisData, VisUnits},
};

/// The integration time of synthesised data \[seconds\].
pub(crate) const INTEGRATION_TIME_S: f64 = 10.7;

/// Two rows of antennas; 14.6 m E-W spacing, 25 m N-S spacing.
pub(crate) fn hera_like_antennas() -> Vec<(usize, [f64; 3])> {
    let mut antennas = vec![];
    for row in 0..2 {
        for col in 0..3 {
            antennas.push((
                10 * row + col,
                [col as f64 * 14.6, row as f64 * 25.0, 0.0],
            ));
        }
    }
    antennas
}

/// Synthesise zenith-phased visibilities for all cross-correlation baselines
/// of `antennas`. The "sky" is a single point source slightly off zenith, so
/// redundant baselines see the same visibilities. Frequencies start at 100 MHz
/// with 97.65625 kHz channels; polarisations are XX and YY.
pub(crate) fn synthetic_vis(
    antennas: &[(usize, [f64; 3])],
    num_timesteps: usize,
    num_freqs: usize,
) -> VisData {
    synthesise(antennas, num_timesteps, num_freqs, false)
}

/// As [`synthetic_vis`], but auto-correlation baselines are included too, as
/// they are in real observations.
pub(crate) fn synthetic_vis_with_autos(
    antennas: &[(usize, [f64; 3])],
    num_timesteps: usize,
    num_freqs: usize,
) -> VisData {
    synthesise(antennas, num_timesteps, num_freqs, true)
}

fn synthesise(
    antennas: &[(usize, [f64; 3])],
    num_timesteps: usize,
    num_freqs: usize,
    include_autos: bool,
) -> VisData {
    let mut ant_pairs: Vec<AntPair> = vec![];
    let mut enus = vec![];
    for (i, &(ant1, pos1)) in antennas.iter().enumerate() {
        let first = if include_autos { i } else { i + 1 };
        for &(ant2, pos2) in &antennas[first..] {
            ant_pairs.push((ant1, ant2));
            enus.push(UVW {
                u: pos2[0] - pos1[0],
                v: pos2[1] - pos1[1],
                w: pos2[2] - pos1[2],
            });
        }
    }
    let num_baselines = ant_pairs.len();
    let freqs_hz: Vec<f64> = (0..num_freqs)
        .map(|i| 100e6 + i as f64 * 97.65625e3)
        .collect();
    let pols = vec![Polarisation::XX, Polarisation::YY];

    let start = Epoch::from_gpst_seconds(1090008640.0);
    let timestamps: Vec<Epoch> = (0..num_timesteps)
        .map(|i| start + Duration::from_seconds(i as f64 * INTEGRATION_TIME_S))
        .collect();
    let timestamps = Vec1::try_from_vec(timestamps).unwrap();
    let lsts_rad: Vec<f64> = (0..num_timesteps)
        .map(|i| 1.0 + i as f64 * INTEGRATION_TIME_S * TAU / 86164.0905)
        .collect();

    let uvws = Array2::from_shape_fn((num_timesteps, num_baselines), |(_, i_bl)| enus[i_bl]);
    // Direction cosines of the point source, drifting with time.
    let vis = Array4::from_shape_fn(
        (num_timesteps, num_baselines, num_freqs, pols.len()),
        |(i_time, i_bl, i_freq, i_pol)| {
            let l = 0.05 + 1e-4 * i_time as f64;
            let m = -0.02;
            let uvw = enus[i_bl];
            let phase = -TAU * freqs_hz[i_freq] / VEL_C * (uvw.u * l + uvw.v * m);
            let (im, re) = phase.sin_cos();
            c64::new(re, im) * (1.0 + 0.5 * i_pol as f64)
        },
    );

    VisData::new(
        vis,
        uvws,
        timestamps,
        lsts_rad,
        ant_pairs,
        freqs_hz,
        pols,
        HERA_LAT_DEG.to_radians(),
        VisUnits::Jansky,
    )
    .unwrap()
}
