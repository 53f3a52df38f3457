// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with finding redundant baselines.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RedundancyError {
    #[error("The redundancy tolerance must be a positive, finite number of metres; got {0}")]
    BadTolerance(f64),

    #[error("Got {baselines} baselines but {uvws} separation vectors; these must be equal")]
    LengthMismatch { baselines: usize, uvws: usize },

    #[error("Baseline {0} was supplied more than once")]
    DuplicateBaseline(u64),

    #[error("No baselines were supplied; cannot find redundant groups")]
    NoBaselines,

    #[error(transparent)]
    Baseline(#[from] crate::baseline::BaselineError),
}
