// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Redundant-baseline delay power spectra from radio interferometric
visibilities.

A dataset is split into two halves of interleaved timesteps, converted from
flux-density to brightness-temperature units and rephased for coherence.
Baselines are grouped by geometric redundancy, pairs of redundant baselines
are formed, and their delay spectra are cross-multiplied between the halves.
See [`pipeline::pspec_calc`].
 */

pub mod baseline;
pub mod beam;
pub mod blpairs;
mod cli;
pub mod constants;
pub(crate) mod math;
pub mod pipeline;
pub mod pol;
pub mod pspec;
pub mod redundancy;
pub mod rephase;
pub mod taper;
pub mod units;
pub mod vis;

#[cfg(test)]
mod tests;

// Re-exports.
pub use beam::{create_beam_object, BeamType, GaussianBeam, NoBeam, PspecBeam};
pub use blpairs::{select_blpairs, BlpairOptions, BlpairSelection, GroupPolicy};
pub use cli::{Hyperpspec, HyperpspecError};
pub use pipeline::{pspec_calc, PipelineError, PspecParams};
pub use pol::Polarisation;
pub use pspec::{DelaySpectrumEstimator, PspecData, PspecEstimator, SpectralWindow, UVPSpec};
pub use redundancy::{get_baseline_redundancies, RedundancyGroups, RedundancyState};
pub use vis::{VisData, VisRead, VisUnits};
