//! Shared test helpers for integration tests

#![allow(dead_code)]

use assert_cmd::cargo;
use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

pub const DOC: &str = "assessment.json";

/// Helper to get an mrt command isolated from the caller's environment
pub fn mrt() -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("mrt"));
    cmd.env_remove("MRT_FILE")
        .env_remove("MRT_ANALYST")
        .env_remove("RUST_LOG");
    cmd
}

/// mrt running inside `tmp`, with user config pointed into it
pub fn mrt_in(tmp: &TempDir) -> Command {
    let mut cmd = mrt();
    cmd.current_dir(tmp.path())
        .env("XDG_CONFIG_HOME", tmp.path().join("xdg"))
        .env("HOME", tmp.path());
    cmd
}

/// Temp dir holding a new assessment named "Press 7"
pub fn setup_assessment() -> TempDir {
    let tmp = TempDir::new().unwrap();
    mrt_in(&tmp)
        .args(["new", "--name", "Press 7", "--company", "Acme"])
        .assert()
        .success();
    tmp
}

pub fn doc_path(tmp: &TempDir) -> PathBuf {
    tmp.path().join(DOC)
}

/// Operator / Clear jam with one Crushing hazard, refreshed into the risk table
pub fn setup_with_hazard() -> TempDir {
    let tmp = setup_assessment();
    mrt_in(&tmp).args(["role", "add", "Operator"]).assert().success();
    mrt_in(&tmp)
        .args(["task", "add", "Operator", "Clear jam"])
        .assert()
        .success();
    mrt_in(&tmp)
        .args(["hazard", "add", "Operator", "Clear jam", "Crushing - Ram descends"])
        .assert()
        .success();
    mrt_in(&tmp).args(["risk", "refresh"]).assert().success();
    tmp
}

/// Saved document as raw JSON
pub fn read_json(tmp: &TempDir) -> serde_json::Value {
    let content = std::fs::read_to_string(doc_path(tmp)).unwrap();
    serde_json::from_str(&content).unwrap()
}
