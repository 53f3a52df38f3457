// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Integration tests.
//!
//! Some help for laying out these tests was taken from:
//! https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html

mod blpairs;
mod redundancy;

use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
    process::Output,
    str::from_utf8,
};

use assert_cmd::{output::OutputError, Command};
use indoc::indoc;

fn hyperpspec() -> Command {
    Command::cargo_bin("hyperpspec").unwrap()
}

fn get_cmd_output(result: Result<Output, OutputError>) -> (String, String) {
    let output = match result {
        Ok(o) => o,
        Err(o) => o.as_output().unwrap().clone(),
    };
    (
        from_utf8(&output.stdout).unwrap().to_string(),
        from_utf8(&output.stderr).unwrap().to_string(),
    )
}

fn make_file_in_dir<T: AsRef<Path>, U: AsRef<Path>>(filename: T, dir: U) -> (PathBuf, File) {
    let path = dir.as_ref().join(filename);
    let f = File::create(&path).expect("couldn't make file");
    (path, f)
}

/// Two rows of three antennas; 14.6 m E-W spacing and 25 m N-S spacing. The
/// shortest redundant group has 4 baselines.
fn write_hera_like_layout<T: AsRef<Path>>(dir: T) -> PathBuf {
    let (path, mut f) = make_file_in_dir("layout.toml", dir);
    for row in 0..2 {
        for col in 0..3 {
            writeln!(
                f,
                "[[antennas]]\nnumber = {}\nenu = [{:.1}, {:.1}, 0.0]\n",
                10 * row + col,
                col as f64 * 14.6,
                row as f64 * 25.0
            )
            .unwrap();
        }
    }
    path
}

/// Antennas on a line with no two baselines alike.
fn write_non_redundant_layout<T: AsRef<Path>>(dir: T) -> PathBuf {
    let (path, mut f) = make_file_in_dir("line.toml", dir);
    f.write_all(
        indoc! {r#"
            [[antennas]]
            number = 0
            enu = [0.0, 0.0, 0.0]

            [[antennas]]
            number = 1
            enu = [14.6, 0.0, 0.0]

            [[antennas]]
            number = 3
            enu = [43.8, 0.0, 0.0]
        "#}
        .as_bytes(),
    )
    .unwrap();
    path
}

#[test]
fn test_help() {
    let (stdout, _) = get_cmd_output(hyperpspec().arg("--help").ok());
    assert!(stdout.contains("redundancy"));
    assert!(stdout.contains("blpairs"));
}

#[test]
fn test_no_subcommand_fails() {
    let cmd = hyperpspec().ok();
    assert!(cmd.is_err());
}
