use assert_cmd::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn repo_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("expected crates/<name> layout")
        .to_path_buf()
}

fn fixture(name: &str) -> PathBuf {
    let path = repo_root().join("fixtures").join("seqdiag").join(name);
    assert!(path.exists(), "fixture missing: {}", path.display());
    path
}

#[test]
fn cli_renders_svg_to_file() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let out = tmp.path().join("out.svg");

    Command::cargo_bin("seqdiag-cli")
        .expect("binary")
        .args([
            "render",
            "--out",
            out.to_string_lossy().as_ref(),
            fixture("login.diag").to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let svg = fs::read_to_string(&out).expect("read svg");
    assert!(svg.starts_with("<svg "));
    assert!(svg.contains("Web Server"));
}

#[test]
fn cli_dumps_model_and_layout_json() {
    let output = Command::cargo_bin("seqdiag-cli")
        .expect("binary")
        .args(["parse", fixture("fragments.diag").to_string_lossy().as_ref()])
        .output()
        .expect("run");
    assert!(output.status.success());
    let model: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(model["participants"].as_array().map(Vec::len), Some(4));

    let output = Command::cargo_bin("seqdiag-cli")
        .expect("binary")
        .args(["layout", fixture("fragments.diag").to_string_lossy().as_ref()])
        .output()
        .expect("run");
    assert!(output.status.success());
    let layout: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert!(layout["size"]["width"].as_f64().unwrap_or(0.0) > 0.0);
    assert_eq!(layout["fragments"].as_array().map(Vec::len), Some(2));
}

#[test]
fn cli_config_overrides_sizes() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let config = tmp.path().join("config.json");
    fs::write(&config, r#"{ "node_width": 200 }"#).expect("write config");

    let output = Command::cargo_bin("seqdiag-cli")
        .expect("binary")
        .args([
            "layout",
            "--config",
            config.to_string_lossy().as_ref(),
            fixture("login.diag").to_string_lossy().as_ref(),
        ])
        .output()
        .expect("run");
    assert!(output.status.success());
    let layout: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    let rect = &layout["participants"][0]["rect"];
    let width = rect["x2"].as_f64().unwrap_or(0.0) - rect["x1"].as_f64().unwrap_or(0.0);
    assert_eq!(width, 200.0);
}

#[test]
fn cli_reports_structural_errors_on_one_line() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = tmp.path().join("bad.diag");
    fs::write(&input, "{ group { A; } group { A; } }").expect("write input");

    let output = Command::cargo_bin("seqdiag-cli")
        .expect("binary")
        .arg(input.to_string_lossy().as_ref())
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.trim().lines().count(), 1, "{stderr}");
}
