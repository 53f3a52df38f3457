// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to find groups of geometrically redundant baselines.
//!
//! Two baselines are redundant if their separation vectors are closer than a
//! tolerance. Pairwise closeness isn't transitive, so each group has a
//! canonical representative (the first baseline seen that didn't belong to any
//! existing group) and every other baseline is only ever tested against the
//! representatives. This makes the grouping deterministic for a given input
//! order.

mod error;

pub use error::RedundancyError;

use std::collections::HashSet;

use log::{debug, trace};
use marlu::UVW;
use serde::{Deserialize, Serialize};
use vec1::Vec1;

use crate::baseline::{antnums_to_baseline, baseline_to_antnums, AntPair};

/// Baseline numbers and their separation vectors \[metres\] at a single time.
#[derive(Debug, Clone)]
pub struct BaselineGeometry {
    pub baselines: Vec<u64>,
    pub uvws: Vec<UVW>,
}

impl BaselineGeometry {
    /// Form every cross-correlation baseline from antenna East-North-Up
    /// positions \[metres\]. For a zenith phase centre, a baseline's UVW is the
    /// difference of its antennas' ENU positions.
    pub fn from_enu_positions(antennas: &[(usize, [f64; 3])]) -> Result<Self, RedundancyError> {
        let mut baselines = vec![];
        let mut uvws = vec![];
        for (i, &(ant1, pos1)) in antennas.iter().enumerate() {
            for &(ant2, pos2) in &antennas[i + 1..] {
                baselines.push(antnums_to_baseline(ant1, ant2, false)?);
                uvws.push(UVW {
                    u: pos2[0] - pos1[0],
                    v: pos2[1] - pos1[1],
                    w: pos2[2] - pos1[2],
                });
            }
        }
        Ok(Self { baselines, uvws })
    }
}

/// Is every baseline already alone in its redundant group? This happens when
/// only one baseline per unique separation has been kept by some earlier
/// processing (e.g. redundant calibration).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RedundancyState {
    /// The number of groups equals the number of baselines.
    Collapsed,

    /// At least one group has more than one baseline.
    NotCollapsed,
}

/// A set of baselines whose separation vectors all lie within the tolerance
/// of the group's representative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedundantGroup {
    /// Baseline numbers in this group. The first is the representative.
    pub baselines: Vec1<u64>,

    /// The mean separation vector of all baselines in this group \[metres\].
    #[serde(with = "uvw_serde")]
    pub mean_uvw: UVW,

    /// The length of the mean separation vector \[metres\].
    pub length_m: f64,
}

impl RedundantGroup {
    /// The baseline that all others were compared against.
    pub fn representative(&self) -> u64 {
        *self.baselines.first()
    }

    /// Convert this group's baselines into antenna pairs.
    pub fn ant_pairs(&self) -> Result<Vec<AntPair>, RedundancyError> {
        self.baselines
            .iter()
            .map(|&bl| baseline_to_antnums(bl).map_err(RedundancyError::from))
            .collect()
    }
}

/// All redundant groups from a set of baselines, sorted by ascending length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedundancyGroups {
    groups: Vec<RedundantGroup>,
    num_baselines: usize,
    tolerance_m: f64,
}

impl RedundancyGroups {
    pub fn groups(&self) -> &[RedundantGroup] {
        &self.groups
    }

    pub fn num_baselines(&self) -> usize {
        self.num_baselines
    }

    pub fn tolerance_m(&self) -> f64 {
        self.tolerance_m
    }

    pub fn state(&self) -> RedundancyState {
        if self.groups.len() == self.num_baselines {
            RedundancyState::Collapsed
        } else {
            RedundancyState::NotCollapsed
        }
    }

    /// Find the index of the group containing a baseline.
    pub fn group_index_of(&self, bl: u64) -> Option<usize> {
        self.groups.iter().position(|g| g.baselines.contains(&bl))
    }
}

fn distance(a: UVW, b: UVW) -> f64 {
    let (du, dv, dw) = (a.u - b.u, a.v - b.v, a.w - b.w);
    (du * du + dv * dv + dw * dw).sqrt()
}

fn norm(a: UVW) -> f64 {
    (a.u * a.u + a.v * a.v + a.w * a.w).sqrt()
}

/// Partition baselines into groups of redundant baselines. The returned groups
/// are sorted by the length of their mean separation vectors (shortest first);
/// groups with equal lengths keep the order in which their representatives
/// were seen.
///
/// `tolerance_m` is the maximum distance \[metres\] between a baseline's
/// separation vector and a group representative's for the baseline to join
/// that group. A baseline close to more than one representative joins the
/// first-formed group.
pub fn get_baseline_redundancies(
    baselines: &[u64],
    uvws: &[UVW],
    tolerance_m: f64,
) -> Result<RedundancyGroups, RedundancyError> {
    if !tolerance_m.is_finite() || tolerance_m <= 0.0 {
        return Err(RedundancyError::BadTolerance(tolerance_m));
    }
    if baselines.len() != uvws.len() {
        return Err(RedundancyError::LengthMismatch {
            baselines: baselines.len(),
            uvws: uvws.len(),
        });
    }
    if baselines.is_empty() {
        return Err(RedundancyError::NoBaselines);
    }

    let mut seen = HashSet::with_capacity(baselines.len());
    // Each entry is (representative UVW, members, member UVWs).
    let mut groups: Vec<(UVW, Vec1<u64>, Vec<UVW>)> = vec![];
    for (&bl, &uvw) in baselines.iter().zip(uvws) {
        if !seen.insert(bl) {
            return Err(RedundancyError::DuplicateBaseline(bl));
        }

        match groups
            .iter_mut()
            .find(|(rep_uvw, _, _)| distance(*rep_uvw, uvw) < tolerance_m)
        {
            Some((_, members, member_uvws)) => {
                trace!("Baseline {bl} joins the group of {}", members.first());
                members.push(bl);
                member_uvws.push(uvw);
            }
            None => {
                trace!("Baseline {bl} starts a new group");
                groups.push((uvw, Vec1::new(bl), vec![uvw]));
            }
        }
    }

    let mut groups: Vec<RedundantGroup> = groups
        .into_iter()
        .map(|(_, members, member_uvws)| {
            let n = member_uvws.len() as f64;
            let sum = member_uvws.iter().fold(
                UVW {
                    u: 0.0,
                    v: 0.0,
                    w: 0.0,
                },
                |acc, m| UVW {
                    u: acc.u + m.u,
                    v: acc.v + m.v,
                    w: acc.w + m.w,
                },
            );
            let mean_uvw = UVW {
                u: sum.u / n,
                v: sum.v / n,
                w: sum.w / n,
            };
            RedundantGroup {
                baselines: members,
                mean_uvw,
                length_m: norm(mean_uvw),
            }
        })
        .collect();
    // A stable sort keeps ties in first-seen order.
    groups.sort_by(|a, b| a.length_m.total_cmp(&b.length_m));

    debug!(
        "Found {} redundant baseline groups from {} baselines (tolerance {tolerance_m} m)",
        groups.len(),
        baselines.len()
    );

    Ok(RedundancyGroups {
        groups,
        num_baselines: baselines.len(),
        tolerance_m,
    })
}

/// `marlu`'s [`UVW`] is serialised as a plain `[u, v, w]` array.
mod uvw_serde {
    use marlu::UVW;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub(super) fn serialize<S: Serializer>(uvw: &UVW, s: S) -> Result<S::Ok, S::Error> {
        [uvw.u, uvw.v, uvw.w].serialize(s)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<UVW, D::Error> {
        let [u, v, w] = <[f64; 3]>::deserialize(d)?;
        Ok(UVW { u, v, w })
    }
}
