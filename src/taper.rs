// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tapering (window) functions applied across a spectral window before the
//! delay transform, to control spectral leakage at the band edges.

use ndarray::prelude::*;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::constants::TAU;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
pub enum Taper {
    #[strum(serialize = "none")]
    #[serde(rename = "none")]
    None,

    /// 4-term Blackman-Harris.
    #[strum(serialize = "blackman-harris")]
    #[serde(rename = "blackman-harris")]
    BlackmanHarris,

    #[strum(serialize = "blackman")]
    #[serde(rename = "blackman")]
    Blackman,

    #[strum(serialize = "hann")]
    #[serde(rename = "hann")]
    Hann,
}

impl Taper {
    /// Generate the symmetric window of length `n`.
    pub fn generate(self, n: usize) -> Array1<f64> {
        if n == 1 {
            return array![1.0];
        }
        let denom = n.saturating_sub(1) as f64;
        Array1::from_shape_fn(n, |i| {
            let x = TAU * i as f64 / denom;
            match self {
                Taper::None => 1.0,
                Taper::BlackmanHarris => {
                    0.35875 - 0.48829 * x.cos() + 0.14128 * (2.0 * x).cos()
                        - 0.01168 * (3.0 * x).cos()
                }
                Taper::Blackman => 0.42 - 0.5 * x.cos() + 0.08 * (2.0 * x).cos(),
                Taper::Hann => 0.5 - 0.5 * x.cos(),
            }
        })
    }
}
