//! Integration tests for blade-cli
//!
//! Runs the binary end to end: write a skeleton, generate, dump OBJ.

use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

fn blade_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_blade-cli"))
        .args(args)
        .output()
        .expect("Failed to run blade-cli")
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("Temp path is not UTF-8")
}

#[test]
fn test_skeleton_then_generate_obj() {
    let dir = tempdir().expect("Failed to create temp dir");
    let skeleton = dir.path().join("skeleton.toml");
    let obj = dir.path().join("blade.obj");

    let out = blade_cli(&["skeleton", path_str(&skeleton), "--count", "6"]);
    assert!(out.status.success(), "skeleton command failed");
    assert!(skeleton.exists(), "Skeleton file should exist");

    let out = blade_cli(&[
        "generate",
        "--skeleton",
        path_str(&skeleton),
        "-o",
        path_str(&obj),
    ]);
    assert!(out.status.success(), "generate command failed");

    let text = std::fs::read_to_string(&obj).expect("Failed to read OBJ");
    assert!(text.lines().any(|l| l.starts_with("v ")));
    assert!(text.lines().any(|l| l == "g edge"));
    assert!(text.lines().filter(|l| l.starts_with("f ")).count() > 0);
}

#[test]
fn test_generate_with_preset_and_random_carves() {
    let dir = tempdir().expect("Failed to create temp dir");
    let preset = dir.path().join("preset.toml");
    let obj = dir.path().join("carved.obj");
    std::fs::write(
        &preset,
        r#"
quality = "high"
thickness = 0.05

[[carves]]
kind = "groove"
start = 0.1
end = 0.7
depth = 0.4
"#,
    )
    .expect("Failed to write preset");

    let out = blade_cli(&[
        "generate",
        "--preset",
        path_str(&preset),
        "--seed",
        "7",
        "--carves",
        "2",
        "-o",
        path_str(&obj),
        "-v",
    ]);
    assert!(out.status.success(), "generate command failed");
    assert!(obj.exists(), "OBJ file should exist");
}

#[test]
fn test_check_rejects_short_skeleton() {
    let dir = tempdir().expect("Failed to create temp dir");
    let skeleton = dir.path().join("short.toml");
    std::fs::write(
        &skeleton,
        r#"
[[segments]]
center = [0.0, 0.0, 0.0]
left = [-0.1, 0.0, 0.0]
right = [0.1, 0.0, 0.0]
"#,
    )
    .expect("Failed to write skeleton");

    let out = blade_cli(&["check", "--skeleton", path_str(&skeleton)]);
    assert!(!out.status.success(), "check should fail on a single segment");
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("at least 2"), "unexpected error: {}", stderr);
}

#[test]
fn test_check_rejects_bad_preset() {
    let dir = tempdir().expect("Failed to create temp dir");
    let preset = dir.path().join("bad.toml");
    std::fs::write(&preset, "thickness = -1.0\n").expect("Failed to write preset");

    let out = blade_cli(&["check", "--preset", path_str(&preset)]);
    assert!(!out.status.success(), "check should fail on negative thickness");
}

#[test]
fn test_schema_lists_fields() {
    let out = blade_cli(&["schema"]);
    assert!(out.status.success(), "schema command failed");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("thickness"));
    assert!(stdout.contains("carves.radius"));
}
