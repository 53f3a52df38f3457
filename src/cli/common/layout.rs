// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Antenna layouts, and the arguments to find redundant baselines from them.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    str::FromStr,
};

use clap::Parser;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{ArgFileTypes, InfoPrinter, ARG_FILE_TYPES_COMMA_SEPARATED, TOLERANCE_HELP};
use crate::{
    cli::HyperpspecError,
    constants::DEFAULT_REDUNDANCY_TOLERANCE_M,
    redundancy::{get_baseline_redundancies, BaselineGeometry, RedundancyGroups},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Antenna {
    pub(crate) number: usize,

    /// East, North and Up position \[metres\].
    pub(crate) enu: [f64; 3],
}

/// The positions of an array's antennas. In TOML, this looks like:
///
/// ```toml
/// [[antennas]]
/// number = 0
/// enu = [0.0, 0.0, 0.0]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct AntennaLayout {
    pub(crate) antennas: Vec<Antenna>,
}

impl AntennaLayout {
    pub(crate) fn read(file: &Path) -> Result<AntennaLayout, LayoutError> {
        let file_type = file
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .and_then(|e| ArgFileTypes::from_str(&e).ok());
        let layout: AntennaLayout = match file_type {
            Some(ArgFileTypes::Toml) => {
                let contents = std::fs::read_to_string(file)?;
                toml::from_str(&contents).map_err(|e| LayoutError::Decode {
                    file: file.display().to_string(),
                    err: e.to_string(),
                })?
            }
            Some(ArgFileTypes::Json) => {
                let contents = std::fs::read_to_string(file)?;
                serde_json::from_str(&contents).map_err(|e| LayoutError::Decode {
                    file: file.display().to_string(),
                    err: e.to_string(),
                })?
            }
            None => return Err(LayoutError::UnknownExtension(file.to_path_buf())),
        };

        if layout.antennas.len() < 2 {
            return Err(LayoutError::TooFewAntennas(layout.antennas.len()));
        }
        let mut seen = HashSet::with_capacity(layout.antennas.len());
        for antenna in &layout.antennas {
            if !seen.insert(antenna.number) {
                return Err(LayoutError::DuplicateAntenna(antenna.number));
            }
        }
        debug!(
            "Read {} antennas from {}",
            layout.antennas.len(),
            file.display()
        );
        Ok(layout)
    }

    pub(crate) fn positions(&self) -> Vec<(usize, [f64; 3])> {
        self.antennas.iter().map(|a| (a.number, a.enu)).collect()
    }
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct LayoutArgs {
    /// Path to the antenna layout file. Each antenna has a number and an
    /// East-North-Up position in metres.
    #[clap(short, long, parse(from_os_str), help_heading = "INPUT LAYOUT")]
    pub(crate) layout: Option<PathBuf>,

    #[clap(short, long, help = TOLERANCE_HELP.as_str(), help_heading = "REDUNDANCY")]
    pub(crate) tolerance: Option<f64>,
}

impl LayoutArgs {
    /// Merge two sets of arguments, preferring those in `self`.
    pub(crate) fn merge(self, other: Self) -> Self {
        Self {
            layout: self.layout.or(other.layout),
            tolerance: self.tolerance.or(other.tolerance),
        }
    }

    /// Read the layout and find its redundant baselines.
    pub(crate) fn parse(self) -> Result<RedundancyGroups, HyperpspecError> {
        let LayoutArgs { layout, tolerance } = self;
        let layout_file = layout.ok_or(LayoutError::NoLayout)?;
        let tolerance = tolerance.unwrap_or(DEFAULT_REDUNDANCY_TOLERANCE_M);

        let layout = AntennaLayout::read(&layout_file)?;
        let geometry = BaselineGeometry::from_enu_positions(&layout.positions())?;
        trace!("Baselines: {:?}", geometry.baselines);
        let groups = get_baseline_redundancies(&geometry.baselines, &geometry.uvws, tolerance)?;

        let mut printer = InfoPrinter::new("Redundancy".into());
        printer.push_block(vec![
            format!("Layout: {}", layout_file.display()).into(),
            format!(
                "{} antennas, {} baselines",
                layout.antennas.len(),
                groups.num_baselines()
            )
            .into(),
        ]);
        printer.push_block(vec![
            format!("Tolerance: {tolerance} m").into(),
            format!(
                "{} redundant groups ({:?})",
                groups.groups().len(),
                groups.state()
            )
            .into(),
        ]);
        printer.display();

        Ok(groups)
    }
}

#[derive(Error, Debug)]
pub(crate) enum LayoutError {
    #[error("No antenna layout file was supplied")]
    NoLayout,

    #[error("Layout file {0:?} doesn't have a recognised file extension! Valid extensions are: {}", *ARG_FILE_TYPES_COMMA_SEPARATED)]
    UnknownExtension(PathBuf),

    #[error("Couldn't decode the antenna layout in {file}: {err}")]
    Decode { file: String, err: String },

    #[error("At least 2 antennas are needed to form baselines; the layout has {0}")]
    TooFewAntennas(usize),

    #[error("Antenna {0} appears more than once in the layout")]
    DuplicateAntenna(usize),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
