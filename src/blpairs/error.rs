// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with selecting baseline pairs.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlpairError {
    #[error("Redundant group {index} was requested, but there are only {num_groups} groups")]
    MissingGroup { index: usize, num_groups: usize },

    #[error("Redundant group {index} produced no baseline pairs (it has {num_baselines} baselines and auto-baseline pairs are excluded)")]
    NoBlpairs { index: usize, num_baselines: usize },

    #[error("Antenna number {0} is too large to be encoded into a baseline-pair number (max 899)")]
    AntennaTooLarge(usize),

    #[error(transparent)]
    Baseline(#[from] crate::baseline::BaselineError),
}
