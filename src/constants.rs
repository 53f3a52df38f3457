// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.

All constants *must* be double precision. `hyperpspec` should do as many
calculations as possible in double precision before converting to a lower
precision, if it is ever required.
 */

pub use std::f64::consts::{FRAC_PI_2, PI, TAU};

pub use marlu::constants::VEL_C;

/// Baselines whose separation vectors are closer than this are considered
/// redundant \[metres\].
pub const DEFAULT_REDUNDANCY_TOLERANCE_M: f64 = 0.5;

/// The spectral windows used when none are specified. Each is a half-open
/// range of channel indices.
pub const DEFAULT_SPECTRAL_WINDOWS: [(usize, usize); 2] = [(300, 400), (600, 721)];

/// Boltzmann's constant \[J K^-1\].
pub const K_BOLTZMANN: f64 = 1.380649e-23;

/// The number of Jy in 1 W m^-2 Hz^-1.
pub const JY_PER_SI: f64 = 1e26;

/// Baseline numbers above this value use the 2048-antenna convention.
pub(crate) const BASELINE_2048_OFFSET: u64 = 1 << 16;

/// The maximum number of antennas that can be encoded into a baseline number.
pub const MAX_NUM_ANTENNAS: usize = 2048;

/// Antenna numbers are offset by this amount when encoded into a baseline-pair
/// number. Antenna numbers must be less than `1000 - BLPAIR_ANT_OFFSET`.
pub(crate) const BLPAIR_ANT_OFFSET: u64 = 100;

/// HERA's latitude \[degrees\].
pub const HERA_LAT_DEG: f64 = -30.721526120689507;
