//! Integration tests for g3d-export
//!
//! Tests the full pipeline: write OBJ -> convert with the CLI -> decode output

use std::path::Path;
use std::process::Output;

use g3d_common::{Command, PrimitiveType, decode_display_list, strip_nops};
use tempfile::tempdir;

/// 2x2 grid of unit quads in the XY plane
const GRID_OBJ: &str = "\
v 0 0 0
v 1 0 0
v 2 0 0
v 0 1 0
v 1 1 0
v 2 1 0
v 0 2 0
v 1 2 0
v 2 2 0
vt 0 0
vt 1 1
f 1/1 2/1 5/2 4/2
f 2/1 3/1 6/2 5/2
f 4/1 5/1 8/2 7/2
f 5/1 6/1 9/2 8/2
";

/// One triangle, one quad and one pentagon with vertex colors
const MIXED_OBJ: &str = "\
v 0 0 0 1 0 0
v 1 0 0 0 1 0
v 1 1 0 0 0 1
v 0 1 0 1 1 1
v 2 0 0 1 1 1
f 1 2 3
f 1 2 3 4
f 1 2 5 3 4
";

fn g3d_export(args: &[&str]) -> Output {
    std::process::Command::new(env!("CARGO_BIN_EXE_g3d-export"))
        .args(args)
        .output()
        .expect("Failed to run g3d-export")
}

fn export_mesh(input: &Path, output: &Path, extra: &[&str]) {
    let mut args = vec!["mesh", input.to_str().unwrap(), "-o", output.to_str().unwrap()];
    args.extend_from_slice(extra);
    let result = g3d_export(&args);
    assert!(
        result.status.success(),
        "g3d-export mesh failed: {}",
        String::from_utf8_lossy(&result.stderr)
    );
}

fn read_commands(path: &Path) -> Vec<Command> {
    let data = std::fs::read(path).expect("Failed to read display list");
    assert_eq!(data.len() % 4, 0, "display list must be word aligned");
    strip_nops(decode_display_list(&data).expect("Failed to decode display list"))
}

fn count(commands: &[Command], pred: impl Fn(&Command) -> bool) -> usize {
    commands.iter().filter(|c| pred(c)).count()
}

#[test]
fn test_grid_exports_as_quad_strips() {
    let dir = tempdir().expect("Failed to create temp dir");
    let obj_path = dir.path().join("grid.obj");
    let out_path = dir.path().join("grid.g3dl");
    std::fs::write(&obj_path, GRID_OBJ).unwrap();

    export_mesh(&obj_path, &out_path, &["--texture-size", "32x32"]);
    let commands = read_commands(&out_path);

    assert_eq!(commands[0], Command::RestoreMatrix(0));
    let begins = count(&commands, |c| matches!(c, Command::Begin(_)));
    assert_eq!(begins, count(&commands, |c| *c == Command::End));
    assert!(begins <= 2, "4 quads should merge into at most 2 strips");
    assert!(commands.contains(&Command::begin(PrimitiveType::QuadrilateralStrips)));
    assert!(commands.iter().any(|c| matches!(c, Command::TexCoord { .. })));
}

#[test]
fn test_no_strip_keeps_independent_quads() {
    let dir = tempdir().expect("Failed to create temp dir");
    let obj_path = dir.path().join("grid.obj");
    let out_path = dir.path().join("grid.g3dl");
    std::fs::write(&obj_path, GRID_OBJ).unwrap();

    export_mesh(&obj_path, &out_path, &["--no-strip"]);
    let commands = read_commands(&out_path);

    assert_eq!(
        commands
            .iter()
            .filter_map(|c| match c {
                Command::Begin(kind) => Some(*kind),
                _ => None,
            })
            .collect::<Vec<_>>(),
        [PrimitiveType::Quadrilateral as u32]
    );
    assert!(!commands.iter().any(|c| matches!(c, Command::TexCoord { .. })));
}

#[test]
fn test_mixed_faces_with_colors_and_lighting() {
    let dir = tempdir().expect("Failed to create temp dir");
    let obj_path = dir.path().join("mixed.obj");
    let colored = dir.path().join("colored.g3dl");
    let lit = dir.path().join("lit.g3dl");
    std::fs::write(&obj_path, MIXED_OBJ).unwrap();

    export_mesh(&obj_path, &colored, &[]);
    let commands = read_commands(&colored);
    assert!(commands.contains(&Command::begin(PrimitiveType::Triangle)));
    assert!(commands.contains(&Command::begin(PrimitiveType::Quadrilateral)));
    assert!(commands.contains(&Command::Color { r: 248, g: 0, b: 0 }));
    assert!(!commands.iter().any(|c| matches!(c, Command::Normal { .. })));

    export_mesh(&obj_path, &lit, &["--light"]);
    let commands = read_commands(&lit);
    // One normal per drawn vertex: 3 for the triangle, 4 for the quad
    assert_eq!(count(&commands, |c| matches!(c, Command::Normal { .. })), 7);
    assert!(!commands.iter().any(|c| matches!(c, Command::Color { .. })));
}

#[test]
fn test_config_file_and_default_output_path() {
    let dir = tempdir().expect("Failed to create temp dir");
    let obj_path = dir.path().join("grid.obj");
    let config_path = dir.path().join("export.toml");
    std::fs::write(&obj_path, GRID_OBJ).unwrap();
    std::fs::write(&config_path, "use_primitive_strip = false\nflip_yz = true\n").unwrap();

    let result = g3d_export(&[
        "mesh",
        obj_path.to_str().unwrap(),
        "--config",
        config_path.to_str().unwrap(),
    ]);
    assert!(result.status.success());

    let commands = read_commands(&dir.path().join("grid.g3dl"));
    assert!(commands.contains(&Command::begin(PrimitiveType::Quadrilateral)));
}

#[test]
fn test_dump_lists_commands() {
    let dir = tempdir().expect("Failed to create temp dir");
    let obj_path = dir.path().join("grid.obj");
    let out_path = dir.path().join("grid.g3dl");
    std::fs::write(&obj_path, GRID_OBJ).unwrap();
    export_mesh(&obj_path, &out_path, &[]);

    let result = g3d_export(&["dump", out_path.to_str().unwrap()]);
    assert!(result.status.success());
    let listing = String::from_utf8(result.stdout).unwrap();
    assert!(listing.contains("Begin QuadrilateralStrips"));
    assert!(listing.lines().any(|line| line == "End"));
    assert!(!listing.lines().any(|line| line == "Nop"));
}

#[test]
fn test_errors_are_reported() {
    let dir = tempdir().expect("Failed to create temp dir");
    let missing = dir.path().join("missing.obj");
    let result = g3d_export(&["mesh", missing.to_str().unwrap()]);
    assert!(!result.status.success());

    let bad_list = dir.path().join("bad.g3dl");
    std::fs::write(&bad_list, [0xFFu8, 0, 0, 0]).unwrap();
    let result = g3d_export(&["dump", bad_list.to_str().unwrap()]);
    assert!(!result.status.success());

    let result = g3d_export(&["mesh", missing.to_str().unwrap(), "--texture-size", "32"]);
    assert!(!result.status.success());
}
