// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A simple delay-spectrum estimator.

use itertools::Itertools;
use log::trace;
use marlu::c64;
use ndarray::prelude::*;
use rustfft::FftPlanner;

use super::{
    EstimationError, EstimatorConfig, Normalisation, PspecEstimator, SpectralWindow, SpwSpectra,
    Weighting,
};
use crate::{
    blpairs::{antnums_to_blpair, BaselinePair},
    pol::PolPair,
    vis::VisData,
};

/// Estimate power spectra by delay-transforming tapered visibilities and
/// cross-multiplying them, i.e. `P(τ) = conj(x̃1(τ)) x̃2(τ) / Σ w²` for each
/// pair of timesteps.
///
/// The baseline pairs given to this estimator are canonicalised: duplicates
/// are removed and the pairs are sorted by their baseline-pair numbers. Only
/// identity weighting and `I` normalisation are supported.
#[derive(Debug, Clone, Copy, Default)]
pub struct DelaySpectrumEstimator;

/// The delays of an fftshifted transform of `n` channels separated by
/// `chan_width_hz` \[seconds\].
pub(super) fn delays(n: usize, chan_width_hz: f64) -> Array1<f64> {
    if n < 2 || chan_width_hz == 0.0 {
        return Array1::zeros(n);
    }
    let half = (n / 2) as f64;
    Array1::from_shape_fn(n, |i| (i as f64 - half) / (n as f64 * chan_width_hz))
}

/// Sort baseline pairs by their numbers and remove duplicates.
fn canonicalise(blpairs: &[BaselinePair]) -> Result<Vec<BaselinePair>, EstimationError> {
    let mut numbered = blpairs
        .iter()
        .map(|&blpair| {
            antnums_to_blpair(blpair)
                .map(|number| (number, blpair))
                .map_err(|e| EstimationError::Internal(e.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    numbered.sort_unstable_by_key(|&(number, _)| number);
    Ok(numbered
        .into_iter()
        .dedup_by(|a, b| a.0 == b.0)
        .map(|(_, blpair)| blpair)
        .collect())
}

impl PspecEstimator for DelaySpectrumEstimator {
    fn estimate(
        &self,
        dset1: &VisData,
        dset2: &VisData,
        blpairs: &[BaselinePair],
        pol_pairs: &[PolPair],
        spw: SpectralWindow,
        config: &EstimatorConfig,
    ) -> Result<SpwSpectra, EstimationError> {
        if config.weighting != Weighting::Identity {
            return Err(EstimationError::Unsupported {
                what: "weighting",
                value: config.weighting.to_string(),
            });
        }
        if config.norm != Normalisation::I {
            return Err(EstimationError::Unsupported {
                what: "normalisation",
                value: config.norm.to_string(),
            });
        }
        if dset1.num_timesteps() != dset2.num_timesteps() {
            return Err(EstimationError::TimestepMismatch {
                num_timesteps1: dset1.num_timesteps(),
                num_timesteps2: dset2.num_timesteps(),
            });
        }
        spw.validate(dset1.num_freqs().min(dset2.num_freqs()))?;

        let blpairs = canonicalise(blpairs)?;
        let num_chans = spw.num_chans();
        let num_timesteps = dset1.num_timesteps();
        let taper = config.taper.generate(num_chans);
        let norm = 1.0 / taper.iter().map(|w| w * w).sum::<f64>();
        let chan_width_hz = match dset1.freqs_hz().get(spw.start..spw.start + 2) {
            Some([f1, f2]) => f2 - f1,
            _ => 0.0,
        };
        trace!("{spw}: {num_chans} channels, normalisation {norm}");

        let fft = FftPlanner::new().plan_fft_forward(num_chans);
        // Taper, transform and fftshift the visibilities of each timestep.
        let transform = |data: Array2<c64>| -> Array2<c64> {
            let mut out = Array2::zeros((num_timesteps, num_chans));
            let mut buffer = vec![c64::default(); num_chans];
            for (data, mut out) in data.outer_iter().zip(out.outer_iter_mut()) {
                let spw_data = data.slice(s![spw.start..spw.end]);
                for ((b, &v), &w) in buffer.iter_mut().zip(spw_data).zip(&taper) {
                    *b = v * w;
                }
                fft.process(&mut buffer);
                for (i, o) in out.iter_mut().enumerate() {
                    *o = buffer[(i + num_chans - num_chans / 2) % num_chans];
                }
            }
            out
        };

        let mut spectra = Array4::zeros((blpairs.len(), num_timesteps, num_chans, pol_pairs.len()));
        for (&(bl1, bl2), mut spectra_tdp) in blpairs.iter().zip(spectra.outer_iter_mut()) {
            for (&(pol1, pol2), mut spectra_td) in pol_pairs
                .iter()
                .zip(spectra_tdp.axis_iter_mut(Axis(2)))
            {
                let x1 = dset1
                    .get_data(bl1, pol1)
                    .ok_or(EstimationError::MissingData {
                        bl: bl1,
                        pol: pol1,
                        dset: 0,
                    })?;
                let x2 = dset2
                    .get_data(bl2, pol2)
                    .ok_or(EstimationError::MissingData {
                        bl: bl2,
                        pol: pol2,
                        dset: 1,
                    })?;
                let x1 = transform(x1);
                let x2 = transform(x2);
                azip!((s in &mut spectra_td, &a in &x1, &b in &x2) *s = a.conj() * b * norm);
            }
        }

        Ok(SpwSpectra {
            spw,
            blpairs,
            pol_pairs: pol_pairs.to_vec(),
            delays_s: delays(num_chans, chan_width_hz),
            data: spectra,
        })
    }
}
