// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with estimating power spectra.

use thiserror::Error;

use crate::{baseline::AntPair, blpairs::BlpairError, pol::Polarisation, rephase::RephaseError};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PspecError {
    #[error("Dataset {index} was requested, but there are only {num_dsets} datasets")]
    BadDsetIndex { index: usize, num_dsets: usize },

    #[error(transparent)]
    Pairing(#[from] PairingError),

    #[error(transparent)]
    Estimation(#[from] EstimationError),

    #[error(transparent)]
    Rephase(#[from] RephaseError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PairingError {
    #[error("Got {bls1} first baselines but {bls2} second baselines; these must be equal")]
    LengthMismatch { bls1: usize, bls2: usize },

    #[error("No baseline pairs were requested")]
    NoBlpairs,

    #[error("No polarisation pairs were requested")]
    NoPolPairs,

    #[error("Baseline {bl:?} isn't present in dataset {dset}")]
    MissingBaseline { bl: AntPair, dset: usize },

    #[error("Polarisation {pol} isn't present in dataset {dset}")]
    MissingPol { pol: Polarisation, dset: usize },

    #[error(transparent)]
    Blpair(#[from] BlpairError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EstimationError {
    #[error("No spectral windows were requested")]
    NoSpectralWindows,

    #[error("Spectral window {spw} contains no channels")]
    EmptySpectralWindow { spw: String },

    #[error("Spectral window {spw} is out of range; the data only have {num_freqs} channels")]
    SpectralWindowOutOfRange { spw: String, num_freqs: usize },

    #[error("The datasets have {num_timesteps1} and {num_timesteps2} timesteps; these must be equal")]
    TimestepMismatch {
        num_timesteps1: usize,
        num_timesteps2: usize,
    },

    #[error("The datasets have different frequencies")]
    FreqMismatch,

    #[error("The {what} '{value}' isn't supported by this estimator")]
    Unsupported { what: &'static str, value: String },

    /// `dset` is 0 for the first dataset of the pair and 1 for the second;
    /// [`PspecData::pspec`](super::PspecData::pspec) reports the index into
    /// its own datasets instead.
    #[error("No data for baseline {bl:?} and polarisation {pol} in dataset {dset}")]
    MissingData {
        bl: AntPair,
        pol: Polarisation,
        dset: usize,
    },

    #[error("The estimator computed different baseline pairs for spectral window {spw} than for the first spectral window")]
    InconsistentBlpairs { spw: String },

    #[error("Estimator failure: {0}")]
    Internal(String),
}
