// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use serde_json::Value;
use tempfile::TempDir;

use crate::*;

#[test]
fn test_blpairs_shortest_group() {
    let tmp_dir = TempDir::new().unwrap();
    let layout = write_hera_like_layout(tmp_dir.path());
    let json = tmp_dir.path().join("blpairs.json");

    let cmd = hyperpspec()
        .args([
            "blpairs",
            "--layout",
            &format!("{}", layout.display()),
            "--json",
            &format!("{}", json.display()),
        ])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("12 baseline pairs"), "{stdout}");
    assert!(stdout.contains("NotCollapsed"), "{stdout}");
    assert!(stdout.contains("100101101102: (0, 1) x (1, 2)"), "{stdout}");

    let selection: Value = serde_json::from_reader(std::fs::File::open(&json).unwrap()).unwrap();
    assert_eq!(selection["group_index"], 0);
    assert_eq!(selection["blpairs"].as_array().unwrap().len(), 12);
    assert_eq!(selection["bls1"].as_array().unwrap().len(), 12);
}

#[test]
fn test_blpairs_without_permutations() {
    let tmp_dir = TempDir::new().unwrap();
    let layout = write_hera_like_layout(tmp_dir.path());

    let cmd = hyperpspec()
        .args([
            "blpairs",
            "--layout",
            &format!("{}", layout.display()),
            "--exclude-permutations",
            "--include-autos",
        ])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let (stdout, _) = get_cmd_output(cmd);
    // 6 combinations and 4 self-pairs.
    assert!(stdout.contains("10 baseline pairs"), "{stdout}");
}

#[test]
fn test_blpairs_collapsed() {
    let tmp_dir = TempDir::new().unwrap();
    let layout = write_non_redundant_layout(tmp_dir.path());

    let cmd = hyperpspec()
        .args(["blpairs", "--layout", &format!("{}", layout.display())])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("Collapsed"), "{stdout}");
    assert!(stdout.contains("(1, 3) x (1, 3)"), "{stdout}");
    assert!(stdout.contains("1 baseline pairs"), "{stdout}");
}

#[test]
fn test_blpairs_missing_group() {
    let tmp_dir = TempDir::new().unwrap();
    let layout = write_non_redundant_layout(tmp_dir.path());

    let cmd = hyperpspec()
        .args([
            "blpairs",
            "--layout",
            &format!("{}", layout.display()),
            "--group",
            "7",
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("Redundant group 7 was requested"), "{stderr}");
}

#[test]
fn test_blpairs_dry_run() {
    let tmp_dir = TempDir::new().unwrap();
    let layout = write_hera_like_layout(tmp_dir.path());

    let cmd = hyperpspec()
        .args([
            "blpairs",
            "--layout",
            &format!("{}", layout.display()),
            "--dry-run",
        ])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("Dry run"), "{stdout}");
    assert!(!stdout.contains("baseline pairs"), "{stdout}");
}
