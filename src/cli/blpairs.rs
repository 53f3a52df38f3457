// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Print the baseline pairs that would be cross-multiplied for an antenna
//! layout.

use std::path::PathBuf;

use clap::Parser;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use super::{
    common::{display_warnings, LayoutArgs, Warn, ARG_FILE_HELP},
    redundancy::{print_groups, write_json},
};
use crate::{
    blpairs::{antnums_to_blpair, select_blpairs, BlpairOptions, GroupPolicy},
    cli::HyperpspecError,
    redundancy::RedundancyState,
};

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct BlpairsArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    #[clap(flatten)]
    #[serde(default)]
    pub(super) layout_args: LayoutArgs,

    /// Use the redundant group with this index (groups are sorted by length).
    /// The default is to use the shortest group, or the second-shortest if
    /// every group has only one baseline.
    #[clap(short, long, help_heading = "PAIRS")]
    pub(super) group: Option<usize>,

    /// Also pair each baseline with itself.
    #[clap(long, help_heading = "PAIRS")]
    #[serde(default)]
    pub(super) include_autos: bool,

    /// Only keep one of (A, B) and (B, A).
    #[clap(long, help_heading = "PAIRS")]
    #[serde(default)]
    pub(super) exclude_permutations: bool,

    /// Also print the redundant groups.
    #[clap(long)]
    #[serde(default)]
    pub(super) print_groups: bool,

    /// Also write the baseline pairs to this JSON file.
    #[clap(long, parse(from_os_str), help_heading = "OUTPUT FILES")]
    pub(super) json: Option<PathBuf>,
}

impl BlpairsArgs {
    /// Merge the command-line arguments with those in the argument file (if
    /// one was given), preferring the command-line arguments.
    pub(super) fn merge(self) -> Result<BlpairsArgs, HyperpspecError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            let BlpairsArgs {
                args_file: _,
                layout_args,
                group,
                include_autos,
                exclude_permutations,
                print_groups,
                json,
            } = unpack_arg_file!(arg_file);

            Ok(BlpairsArgs {
                args_file: None,
                layout_args: cli_args.layout_args.merge(layout_args),
                group: cli_args.group.or(group),
                include_autos: cli_args.include_autos || include_autos,
                exclude_permutations: cli_args.exclude_permutations || exclude_permutations,
                print_groups: cli_args.print_groups || print_groups,
                json: cli_args.json.or(json),
            })
        } else {
            Ok(cli_args)
        }
    }

    pub(super) fn run(self, dry_run: bool) -> Result<(), HyperpspecError> {
        trace!("{:#?}", self);
        let BlpairsArgs {
            args_file: _,
            layout_args,
            group,
            include_autos,
            exclude_permutations,
            print_groups: should_print_groups,
            json,
        } = self;

        let groups = layout_args.parse()?;
        let options = BlpairOptions {
            policy: group.map(GroupPolicy::Index).unwrap_or_default(),
            exclude_auto_bls: !include_autos,
            exclude_cross_bls: false,
            exclude_permutations,
        };
        if groups.state() == RedundancyState::Collapsed {
            "Every redundant group has only one baseline; only a self-pair will be formed".warn();
        }
        display_warnings();
        if dry_run {
            info!("Dry run -- exiting now.");
            return Ok(());
        }

        if should_print_groups {
            print_groups(&groups)?;
        }
        let selection = select_blpairs(&groups, &options)?;
        info!(
            "Using redundant group {} ({:.3} m); redundancy is {:?}",
            selection.group_index,
            groups.groups()[selection.group_index].length_m,
            selection.state
        );
        for &blpair in &selection.blpairs {
            let ((a1, a2), (b1, b2)) = blpair;
            info!(
                "{:>12}: ({a1}, {a2}) x ({b1}, {b2})",
                antnums_to_blpair(blpair)?
            );
        }
        info!("{} baseline pairs", selection.blpairs.len());

        if let Some(json) = json {
            write_json(&json, &selection)?;
        }
        Ok(())
    }
}
