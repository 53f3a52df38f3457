// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all hyperpspec-related errors. This should be the *only*
//! error enum that is publicly visible.

use thiserror::Error;

use super::common::LayoutError;
use crate::{baseline::BaselineError, blpairs::BlpairError, redundancy::RedundancyError};

const README: &str = "the \"hyperpspec\" README";

/// The *only* publicly visible error from hyperpspec. Each error message
/// should point to the relevant documentation, unless it's "generic".
#[derive(Error, Debug)]
pub enum HyperpspecError {
    /// An error related to finding redundant baselines.
    #[error("{0}\n\nSee for more info: {README}, section \"Redundant groups\"")]
    Redundancy(String),

    /// An error related to forming baseline pairs.
    #[error("{0}\n\nSee for more info: {README}, section \"Baseline pairs\"")]
    Blpairs(String),

    /// An error related to antenna layouts.
    #[error("{0}\n\nSee for more info: {README}, section \"Antenna layouts\"")]
    Layout(String),

    /// An error related to argument files.
    #[error("{0}\n\nSee for more info: {README}, section \"Argument files\"")]
    ArgFile(String),

    /// A generic error that can't be clarified further with documentation, e.g.
    /// IO errors.
    #[error("{0}")]
    Generic(String),
}

// When changing the error propagation below, ensure `Self::from(e)` uses the
// correct `e`!

impl From<RedundancyError> for HyperpspecError {
    fn from(e: RedundancyError) -> Self {
        Self::Redundancy(e.to_string())
    }
}

impl From<BaselineError> for HyperpspecError {
    fn from(e: BaselineError) -> Self {
        Self::Redundancy(e.to_string())
    }
}

impl From<BlpairError> for HyperpspecError {
    fn from(e: BlpairError) -> Self {
        Self::Blpairs(e.to_string())
    }
}

impl From<LayoutError> for HyperpspecError {
    fn from(e: LayoutError) -> Self {
        match e {
            LayoutError::IO(e) => Self::from(e),
            _ => Self::Layout(e.to_string()),
        }
    }
}

// Library code errors.

impl From<std::io::Error> for HyperpspecError {
    fn from(e: std::io::Error) -> Self {
        Self::Generic(e.to_string())
    }
}

impl From<serde_json::Error> for HyperpspecError {
    fn from(e: serde_json::Error) -> Self {
        Self::Generic(e.to_string())
    }
}

impl From<toml::ser::Error> for HyperpspecError {
    fn from(e: toml::ser::Error) -> Self {
        Self::Generic(e.to_string())
    }
}
