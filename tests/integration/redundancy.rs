// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::io::Write;

use serde_json::Value;
use tempfile::TempDir;

use crate::*;

#[test]
fn test_redundancy_groups() {
    let tmp_dir = TempDir::new().unwrap();
    let layout = write_hera_like_layout(tmp_dir.path());
    let json = tmp_dir.path().join("groups.json");

    let cmd = hyperpspec()
        .args([
            "redundancy",
            "--layout",
            &format!("{}", layout.display()),
            "--json",
            &format!("{}", json.display()),
        ])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("15 baselines"), "{stdout}");
    assert!(stdout.contains("(0, 1) (1, 2) (10, 11) (11, 12)"), "{stdout}");

    let groups: Value = serde_json::from_reader(std::fs::File::open(&json).unwrap()).unwrap();
    let groups = groups["groups"].as_array().unwrap();
    // E-W: 14.6 m and 29.2 m. Between the rows: 5 different E-W offsets.
    assert_eq!(groups.len(), 7);
    assert_eq!(groups[0]["baselines"].as_array().unwrap().len(), 4);
    let length = groups[0]["length_m"].as_f64().unwrap();
    assert!((length - 14.6).abs() < 1e-10);
}

#[test]
fn test_redundancy_tolerance() {
    let tmp_dir = TempDir::new().unwrap();
    let layout = write_hera_like_layout(tmp_dir.path());

    let cmd = hyperpspec()
        .args([
            "redundancy",
            "--layout",
            &format!("{}", layout.display()),
            "--tolerance",
            "0",
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("tolerance"), "{stderr}");
}

#[test]
fn test_redundancy_arg_file_and_save_toml() {
    let tmp_dir = TempDir::new().unwrap();
    let layout = write_hera_like_layout(tmp_dir.path());
    let (arg_file, mut f) = make_file_in_dir("args.toml", tmp_dir.path());
    writeln!(
        f,
        "[layout_args]\nlayout = \"{}\"\ntolerance = 0.5",
        layout.display()
    )
    .unwrap();
    let saved = tmp_dir.path().join("saved.toml");

    let cmd = hyperpspec()
        .args([
            "redundancy",
            &format!("{}", arg_file.display()),
            "--save-toml",
            &format!("{}", saved.display()),
        ])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let saved = std::fs::read_to_string(saved).unwrap();
    assert!(saved.contains("layout.toml"), "{saved}");
    assert!(saved.contains("tolerance = 0.5"), "{saved}");
}

#[test]
fn test_redundancy_missing_layout() {
    let cmd = hyperpspec().args(["redundancy"]).ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("No antenna layout file"), "{stderr}");
}

#[test]
fn test_redundancy_bad_arg_file_extension() {
    let tmp_dir = TempDir::new().unwrap();
    let (arg_file, _) = make_file_in_dir("args.yaml", tmp_dir.path());
    let cmd = hyperpspec()
        .args(["redundancy", &format!("{}", arg_file.display())])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("recognised file extension"), "{stderr}");
}
