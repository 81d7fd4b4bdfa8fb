//! Runs the `wxbox` binary against temporary extension projects.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

#[allow(deprecated)]
fn wxbox() -> Command {
    let mut cmd = Command::cargo_bin("wxbox").unwrap();
    cmd.env_remove("NODE_ENV")
        .env_remove("BABEL_ENV")
        .env_remove("RUST_LOG")
        .env_remove("WXBOX_VENDOR")
        .env_remove("WXBOX_DEV")
        .env_remove("WXBOX_VENDOR_VERSION")
        .arg("--no-color");
    cmd
}

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let app = dir.path().join("app");
    fs::create_dir_all(app.join("scripts")).unwrap();
    fs::write(
        app.join("manifest.json"),
        r#"{ "name": "Tab Tamer", "version": "1.0.0" }"#,
    )
    .unwrap();
    fs::write(app.join("background.js"), "").unwrap();
    fs::write(app.join("scripts/content.js"), "").unwrap();
    dir
}

fn config_json(dir: &Path, extra: &[&str]) -> serde_json::Value {
    let output = wxbox()
        .args(["config", "--cwd"])
        .arg(dir)
        .args(extra)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn config_prints_chromium_configuration() {
    let dir = project();
    let json = config_json(dir.path(), &["--vendor", "chrome", "--vendor-version", "88"]);

    assert_eq!(json["mode"], "production");
    assert_eq!(json["target"]["vendor"], "chrome");
    assert_eq!(json["target"]["version"], 88);
    assert_eq!(json["plugins"].as_array().unwrap().len(), 9);
    assert_eq!(json["plugins"][3]["step"], "provide-shim");
    assert!(json["entry"]["background"].is_string());
    assert!(json["entry"]["scripts/content"].is_string());
}

#[test]
fn config_reads_options_file_and_flags_win() {
    let dir = project();
    fs::write(
        dir.path().join("wxbox.config.json"),
        r#"{ "vendor": "firefox", "vendor_version": 115, "output_dir": "out/[vendor]" }"#,
    )
    .unwrap();

    let json = config_json(dir.path(), &["--dev"]);
    assert_eq!(json["mode"], "development");
    assert_eq!(json["target"]["vendor"], "firefox");
    assert_eq!(json["plugins"].as_array().unwrap().len(), 8);
    assert!(
        json["output"]["path"]
            .as_str()
            .unwrap()
            .ends_with("out/firefox")
    );

    let json = config_json(dir.path(), &["--vendor", "edge"]);
    assert_eq!(json["target"]["vendor"], "edge");
    assert_eq!(json["target"]["version"], 115);
}

#[test]
fn node_env_overrides_dev_flag() {
    let dir = project();
    let output = wxbox()
        .env("NODE_ENV", "production")
        .args(["config", "--dev", "--vendor-version", "100", "--compact", "--cwd"])
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["mode"], "production");
}

#[test]
fn missing_source_dir_is_reported() {
    let dir = TempDir::new().unwrap();
    wxbox()
        .args(["config", "--vendor-version", "90", "--cwd"])
        .arg(dir.path())
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("source directory not found"));
}

#[test]
fn target_prints_compact_id() {
    wxbox()
        .args(["target", "--vendor", "firefox", "--vendor-version", "115.0.2"])
        .assert()
        .success()
        .stdout("firefox115\n");
}

#[test]
fn latest_prints_a_version_number() {
    wxbox()
        .args(["latest", "chrome"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^\d+\n$").unwrap());
}

#[test]
fn latest_rejects_unknown_vendors() {
    wxbox()
        .args(["latest", "netscape"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("netscape"));
}
