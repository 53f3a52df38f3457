// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to select a redundant group and construct the baseline pairs to be
//! cross-multiplied.

mod error;

pub use error::BlpairError;

use itertools::Itertools;
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::{
    baseline::{baseline_to_antnums, AntPair},
    constants::BLPAIR_ANT_OFFSET,
    redundancy::{RedundancyGroups, RedundancyState},
};

/// An ordered pair of baselines used for cross-multiplication.
pub type BaselinePair = (AntPair, AntPair);

/// How to pick the redundant group that baseline pairs are formed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupPolicy {
    /// Use the shortest group. If the redundancy has been collapsed, the
    /// second-shortest group is used instead.
    Shortest,

    /// Use the group with this index (groups are sorted by length).
    Index(usize),
}

impl Default for GroupPolicy {
    fn default() -> Self {
        Self::Shortest
    }
}

/// Options controlling how baseline pairs are constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlpairOptions {
    pub policy: GroupPolicy,

    /// Don't pair a baseline with itself.
    pub exclude_auto_bls: bool,

    /// Don't pair different baselines.
    pub exclude_cross_bls: bool,

    /// Only keep one of (A, B) and (B, A).
    pub exclude_permutations: bool,
}

impl Default for BlpairOptions {
    fn default() -> Self {
        Self {
            policy: GroupPolicy::Shortest,
            exclude_auto_bls: true,
            exclude_cross_bls: false,
            exclude_permutations: true,
        }
    }
}

/// The baseline pairs chosen for a power-spectrum estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlpairSelection {
    /// The index of the redundant group used.
    pub group_index: usize,

    /// Which redundancy branch was taken.
    pub state: RedundancyState,

    /// The first baseline of each pair.
    pub bls1: Vec<AntPair>,

    /// The second baseline of each pair.
    pub bls2: Vec<AntPair>,

    pub blpairs: Vec<BaselinePair>,
}

/// Construct baseline pairs from a list of baselines. With
/// `exclude_permutations`, only (A, B) with A before B in `bls` is formed,
/// otherwise both (A, B) and (B, A) are. Auto-baseline pairs (A, A) are
/// appended afterwards. Returns the first baselines, the second baselines and
/// the pairs themselves.
pub fn construct_blpairs(
    bls: &[AntPair],
    exclude_auto_bls: bool,
    exclude_cross_bls: bool,
    exclude_permutations: bool,
) -> (Vec<AntPair>, Vec<AntPair>, Vec<BaselinePair>) {
    let mut blpairs: Vec<BaselinePair> = if exclude_permutations {
        bls.iter().copied().tuple_combinations().collect()
    } else {
        bls.iter().copied().permutations(2).map(|p| (p[0], p[1])).collect()
    };
    blpairs.extend(bls.iter().map(|&bl| (bl, bl)));

    blpairs.retain(|(bl1, bl2)| {
        let is_auto = bl1 == bl2;
        !((exclude_auto_bls && is_auto) || (exclude_cross_bls && !is_auto))
    });

    let (bls1, bls2) = blpairs.iter().copied().unzip();
    (bls1, bls2, blpairs)
}

/// Select a redundant group according to `options` and form its baseline
/// pairs.
///
/// If the redundancy is [`RedundancyState::Collapsed`] (every group is a
/// single baseline), the baseline of the selected group is paired only with
/// itself; for [`GroupPolicy::Shortest`], the second-shortest group is used in
/// this case.
pub fn select_blpairs(
    groups: &RedundancyGroups,
    options: &BlpairOptions,
) -> Result<BlpairSelection, BlpairError> {
    let state = groups.state();
    let group_index = match (options.policy, state) {
        (GroupPolicy::Shortest, RedundancyState::NotCollapsed) => 0,
        (GroupPolicy::Shortest, RedundancyState::Collapsed) => 1,
        (GroupPolicy::Index(i), _) => i,
    };
    let group = groups
        .groups()
        .get(group_index)
        .ok_or(BlpairError::MissingGroup {
            index: group_index,
            num_groups: groups.groups().len(),
        })?;
    debug!(
        "Using redundant group {group_index} ({:.2} m, {} baselines, {state:?})",
        group.length_m,
        group.baselines.len()
    );

    let (bls1, bls2, blpairs) = match state {
        RedundancyState::Collapsed => {
            let bl = baseline_to_antnums(group.representative())?;
            (vec![bl], vec![bl], vec![(bl, bl)])
        }
        RedundancyState::NotCollapsed => {
            let ant_pairs = group
                .baselines
                .iter()
                .map(|&bl| baseline_to_antnums(bl))
                .collect::<Result<Vec<_>, _>>()?;
            construct_blpairs(
                &ant_pairs,
                options.exclude_auto_bls,
                options.exclude_cross_bls,
                options.exclude_permutations,
            )
        }
    };
    if blpairs.is_empty() {
        return Err(BlpairError::NoBlpairs {
            index: group_index,
            num_baselines: group.baselines.len(),
        });
    }
    trace!("Baseline pairs: {blpairs:?}");

    Ok(BlpairSelection {
        group_index,
        state,
        bls1,
        bls2,
        blpairs,
    })
}

fn check_blpair_ant(ant: usize) -> Result<u64, BlpairError> {
    if ant as u64 + BLPAIR_ANT_OFFSET >= 1000 {
        return Err(BlpairError::AntennaTooLarge(ant));
    }
    Ok(ant as u64 + BLPAIR_ANT_OFFSET)
}

/// Encode a baseline pair as a single integer. Each antenna number is offset
/// by 100 and occupies three decimal digits, e.g. ((1, 2), (3, 4)) is
/// 101102103104.
pub fn antnums_to_blpair(blpair: BaselinePair) -> Result<u64, BlpairError> {
    let ((a1, a2), (b1, b2)) = blpair;
    Ok(check_blpair_ant(a1)? * 1_000_000_000
        + check_blpair_ant(a2)? * 1_000_000
        + check_blpair_ant(b1)? * 1_000
        + check_blpair_ant(b2)?)
}

/// Decode a baseline-pair number produced by [`antnums_to_blpair`]. `None` is
/// returned if any of the encoded antenna numbers is invalid.
pub fn blpair_to_antnums(blpair: u64) -> Option<BaselinePair> {
    let ant = |scale: u64| {
        ((blpair / scale) % 1000)
            .checked_sub(BLPAIR_ANT_OFFSET)
            .map(|a| a as usize)
    };
    Some((
        (ant(1_000_000_000)?, ant(1_000_000)?),
        (ant(1_000)?, ant(1)?),
    ))
}
