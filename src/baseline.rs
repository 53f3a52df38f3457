// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Conversions between antenna pairs and baseline numbers.
//!
//! Two conventions are understood. The default encodes a baseline as
//! `2048 * (ant1 + 1) + (ant2 + 1) + 2^16`, which supports up to 2048
//! antennas. If requested, and if both antenna numbers are less than 255, the
//! compact `256 * (ant1 + 1) + (ant2 + 1)` convention is used instead. Decoding
//! detects which convention a number uses by whether it exceeds 2^16.

use thiserror::Error;

use crate::constants::{BASELINE_2048_OFFSET, MAX_NUM_ANTENNAS};

/// A baseline, identified by its pair of antenna numbers.
pub type AntPair = (usize, usize);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BaselineError {
    #[error("Antenna number {ant} is too large to be encoded into a baseline number (max {max})")]
    AntennaTooLarge { ant: usize, max: usize },

    #[error("Baseline number {0} does not decode to a valid antenna pair")]
    BadBaselineNumber(u64),
}

/// Encode an antenna pair as a baseline number.
pub fn antnums_to_baseline(
    ant1: usize,
    ant2: usize,
    attempt256: bool,
) -> Result<u64, BaselineError> {
    let max = ant1.max(ant2);
    // ant + 1 must stay below the modulus.
    if max + 1 >= MAX_NUM_ANTENNAS {
        return Err(BaselineError::AntennaTooLarge {
            ant: max,
            max: MAX_NUM_ANTENNAS - 2,
        });
    }

    let (ant1, ant2) = (ant1 as u64, ant2 as u64);
    if attempt256 && max < 255 {
        Ok(256 * (ant1 + 1) + (ant2 + 1))
    } else {
        Ok(2048 * (ant1 + 1) + (ant2 + 1) + BASELINE_2048_OFFSET)
    }
}

/// Decode a baseline number into its antenna pair.
pub fn baseline_to_antnums(bl: u64) -> Result<AntPair, BaselineError> {
    let (modulus, offset) = if bl > BASELINE_2048_OFFSET {
        (2048, BASELINE_2048_OFFSET)
    } else {
        (256, 0)
    };
    let bl_no_offset = bl - offset;
    let ant2_plus_1 = bl_no_offset % modulus;
    let ant1_plus_1 = bl_no_offset / modulus;
    if ant1_plus_1 == 0 || ant2_plus_1 == 0 {
        return Err(BaselineError::BadBaselineNumber(bl));
    }
    Ok(((ant1_plus_1 - 1) as usize, (ant2_plus_1 - 1) as usize))
}
