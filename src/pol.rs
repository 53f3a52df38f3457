// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Instrumental polarisations.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Linear instrumental polarisations. Strings are parsed case insensitively,
/// e.g. "xx" and "XX" are both [`Polarisation::XX`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[allow(clippy::upper_case_acronyms)]
pub enum Polarisation {
    #[strum(serialize = "xx")]
    #[serde(alias = "xx")]
    XX,

    #[strum(serialize = "yy")]
    #[serde(alias = "yy")]
    YY,

    #[strum(serialize = "xy")]
    #[serde(alias = "xy")]
    XY,

    #[strum(serialize = "yx")]
    #[serde(alias = "yx")]
    YX,
}

/// A pair of polarisations to cross-multiply; the first applies to the first
/// dataset, the second to the second dataset.
pub type PolPair = (Polarisation, Polarisation);
