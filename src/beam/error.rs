// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with beam calculations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BeamError {
    #[error("The beam FWHM must be positive and less than pi radians; got {0}")]
    BadFwhm(f64),

    #[error("Frequencies must be positive and finite; got {0} Hz")]
    BadFreq(f64),
}
