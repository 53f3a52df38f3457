// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Print the redundant baseline groups of an antenna layout.

use std::path::PathBuf;

use clap::Parser;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use super::common::{display_warnings, LayoutArgs, ARG_FILE_HELP};
use crate::{
    baseline::baseline_to_antnums, cli::HyperpspecError, redundancy::RedundancyGroups,
};

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct RedundancyArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    #[clap(flatten)]
    #[serde(default)]
    pub(super) layout_args: LayoutArgs,

    /// Also write the redundant groups to this JSON file.
    #[clap(long, parse(from_os_str), help_heading = "OUTPUT FILES")]
    pub(super) json: Option<PathBuf>,
}

impl RedundancyArgs {
    /// Merge the command-line arguments with those in the argument file (if
    /// one was given), preferring the command-line arguments.
    pub(super) fn merge(self) -> Result<RedundancyArgs, HyperpspecError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            let RedundancyArgs {
                args_file: _,
                layout_args,
                json,
            } = unpack_arg_file!(arg_file);

            Ok(RedundancyArgs {
                args_file: None,
                layout_args: cli_args.layout_args.merge(layout_args),
                json: cli_args.json.or(json),
            })
        } else {
            Ok(cli_args)
        }
    }

    pub(super) fn run(self, dry_run: bool) -> Result<(), HyperpspecError> {
        trace!("{:#?}", self);
        let RedundancyArgs {
            args_file: _,
            layout_args,
            json,
        } = self;

        let groups = layout_args.parse()?;
        display_warnings();
        if dry_run {
            info!("Dry run -- exiting now.");
            return Ok(());
        }

        print_groups(&groups)?;
        if let Some(json) = json {
            write_json(&json, &groups)?;
        }
        Ok(())
    }
}

/// Log each group's index, length, mean separation vector and members.
pub(super) fn print_groups(groups: &RedundancyGroups) -> Result<(), HyperpspecError> {
    for (i, group) in groups.groups().iter().enumerate() {
        let members = group
            .baselines
            .iter()
            .map(|&bl| baseline_to_antnums(bl).map(|(a1, a2)| format!("({a1}, {a2})")))
            .collect::<Result<Vec<_>, _>>()?;
        info!(
            "Group {i:>3}: {:>8.3} m ({:>8.3}, {:>8.3}, {:>8.3}); {} baselines: {}",
            group.length_m,
            group.mean_uvw.u,
            group.mean_uvw.v,
            group.mean_uvw.w,
            members.len(),
            members.join(" ")
        );
    }
    Ok(())
}

pub(super) fn write_json<T: Serialize>(
    file: &std::path::Path,
    value: &T,
) -> Result<(), HyperpspecError> {
    let f = std::io::BufWriter::new(std::fs::File::create(file)?);
    serde_json::to_writer_pretty(f, value)?;
    info!("Wrote {}", file.display());
    Ok(())
}
