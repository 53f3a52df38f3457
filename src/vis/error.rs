// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with in-memory visibility data.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum VisError {
    #[error("Visibility {array} array has shape {got:?}, but {expected:?} was expected")]
    BadArrayShape {
        array: &'static str,
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    #[error("Got {timestamps} timestamps but {lsts} LSTs; these must be equal")]
    TimesLstsMismatch { timestamps: usize, lsts: usize },

    #[error("No timesteps were selected")]
    EmptyTimeSelection,

    #[error("Timestep {got} was selected, but there are only {num_times} timesteps")]
    BadTimestep { got: usize, num_times: usize },

    #[error("At least 2 timesteps are needed to interleave visibilities; got {0}")]
    TooFewTimesToInterleave(usize),

    #[error("Baseline {0:?} was supplied more than once")]
    DuplicateBaseline((usize, usize)),

    #[error(transparent)]
    Baseline(#[from] crate::baseline::BaselineError),
}

#[derive(Error, Debug)]
pub enum VisReadError {
    #[error("Couldn't read visibilities from {file}: {err}")]
    Read { file: String, err: String },

    #[error(transparent)]
    Vis(#[from] VisError),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
