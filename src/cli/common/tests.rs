// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::io::Write;

use indoc::indoc;
use tempfile::{Builder, NamedTempFile};

use super::{layout::AntennaLayout, *};
use crate::{cli::HyperpspecError, redundancy::RedundancyState};

fn layout_file(suffix: &str, contents: &str) -> NamedTempFile {
    let mut f = Builder::new().suffix(suffix).tempfile().unwrap();
    f.write_all(contents.as_bytes()).unwrap();
    f.flush().unwrap();
    f
}

const TOML_LAYOUT: &str = indoc! {r#"
    [[antennas]]
    number = 0
    enu = [0.0, 0.0, 0.0]

    [[antennas]]
    number = 1
    enu = [14.6, 0.0, 0.0]

    [[antennas]]
    number = 2
    enu = [29.2, 0.0, 0.0]
"#};

#[test]
fn read_toml_and_json_layouts() {
    let toml_file = layout_file(".toml", TOML_LAYOUT);
    let layout = AntennaLayout::read(toml_file.path()).unwrap();
    assert_eq!(layout.antennas.len(), 3);
    assert_eq!(layout.positions()[1], (1, [14.6, 0.0, 0.0]));

    let json_file = layout_file(
        ".JSON",
        r#"{"antennas": [{"number": 0, "enu": [0, 0, 0]}, {"number": 1, "enu": [14.6, 0, 0]}, {"number": 2, "enu": [29.2, 0, 0]}]}"#,
    );
    assert_eq!(AntennaLayout::read(json_file.path()).unwrap(), layout);
}

#[test]
fn bad_layouts() {
    let f = layout_file(".yaml", TOML_LAYOUT);
    assert!(matches!(
        AntennaLayout::read(f.path()),
        Err(LayoutError::UnknownExtension(_))
    ));

    let f = layout_file(
        ".toml",
        indoc! {r#"
            [[antennas]]
            number = 3
            enu = [0.0, 0.0, 0.0]

            [[antennas]]
            number = 3
            enu = [14.6, 0.0, 0.0]
        "#},
    );
    assert!(matches!(
        AntennaLayout::read(f.path()),
        Err(LayoutError::DuplicateAntenna(3))
    ));

    let f = layout_file(
        ".toml",
        indoc! {r#"
            [[antennas]]
            number = 3
            enu = [0.0, 0.0, 0.0]
        "#},
    );
    assert!(matches!(
        AntennaLayout::read(f.path()),
        Err(LayoutError::TooFewAntennas(1))
    ));

    let f = layout_file(".toml", "antennas = 5");
    assert!(matches!(
        AntennaLayout::read(f.path()),
        Err(LayoutError::Decode { .. })
    ));
}

#[test]
fn layout_args_find_groups() {
    let f = layout_file(".toml", TOML_LAYOUT);
    let args = LayoutArgs {
        layout: Some(f.path().to_path_buf()),
        tolerance: None,
    };
    let groups = args.parse().unwrap();
    assert_eq!(groups.groups().len(), 2);
    assert_eq!(groups.tolerance_m(), 0.5);
    assert_eq!(groups.state(), RedundancyState::NotCollapsed);

    // CLI arguments win over file arguments.
    let merged = LayoutArgs {
        layout: None,
        tolerance: Some(20.0),
    }
    .merge(LayoutArgs {
        layout: Some(f.path().to_path_buf()),
        tolerance: Some(1.0),
    });
    assert_eq!(merged.tolerance, Some(20.0));
    let groups = merged.parse().unwrap();
    assert_eq!(groups.groups().len(), 1);

    let result = LayoutArgs::default().parse();
    assert!(matches!(result, Err(HyperpspecError::Layout(_))));

    let result = LayoutArgs {
        layout: Some(f.path().to_path_buf()),
        tolerance: Some(-1.0),
    }
    .parse();
    assert!(matches!(result, Err(HyperpspecError::Redundancy(_))));
}

#[test]
fn arg_file_types() {
    assert_eq!(*ARG_FILE_TYPES_COMMA_SEPARATED, "toml, json");
}
