//! CLI and basic command tests

mod common;

use common::{doc_path, mrt, mrt_in, read_json, setup_assessment, setup_with_hazard};
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    mrt()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("risk"));
}

#[test]
fn test_version_displays() {
    mrt()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mrt"));
}

#[test]
fn test_unknown_command_fails() {
    mrt()
        .arg("unknown-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_completions_bash() {
    mrt()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mrt"));
}

// ============================================================================
// New / Info Tests
// ============================================================================

#[test]
fn test_new_creates_document() {
    let tmp = setup_assessment();
    assert!(doc_path(&tmp).exists());

    let json = read_json(&tmp);
    assert_eq!(json["project_info"]["name"], "Press 7");
    assert_eq!(json["project_info"]["company"], "Acme");
    assert!(json["hazard_data"].as_array().unwrap().is_empty());
}

#[test]
fn test_new_requires_name() {
    let tmp = TempDir::new().unwrap();
    mrt_in(&tmp)
        .arg("new")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--name is required"));
    assert!(!doc_path(&tmp).exists());
}

#[test]
fn test_new_refuses_to_overwrite() {
    let tmp = setup_assessment();
    mrt_in(&tmp)
        .args(["new", "--name", "Other"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    mrt_in(&tmp)
        .args(["new", "--name", "Other", "--force"])
        .assert()
        .success();
    assert_eq!(read_json(&tmp)["project_info"]["name"], "Other");
}

#[test]
fn test_file_flag_selects_document() {
    let tmp = TempDir::new().unwrap();
    mrt_in(&tmp)
        .args(["new", "--name", "Cell 3", "-f", "cell3.json"])
        .assert()
        .success();
    assert!(tmp.path().join("cell3.json").exists());

    mrt_in(&tmp)
        .args(["info", "-f", "cell3.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cell 3"));
}

#[test]
fn test_missing_document_has_help() {
    let tmp = TempDir::new().unwrap();
    mrt_in(&tmp)
        .args(["role", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No assessment file"));
}

#[test]
fn test_info_updates_fields() {
    let tmp = setup_assessment();
    mrt_in(&tmp)
        .args(["info", "--facility", "Plant 2", "--stage", "Commissioning"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Plant 2"));

    let json = read_json(&tmp);
    assert_eq!(json["project_info"]["facility"], "Plant 2");
    assert_eq!(json["project_info"]["name"], "Press 7");
}

// ============================================================================
// Hazard Tree Tests
// ============================================================================

#[test]
fn test_build_tree_and_list() {
    let tmp = setup_with_hazard();
    mrt_in(&tmp)
        .args(["role", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Operator"))
        .stdout(predicate::str::contains("Clear jam"))
        .stdout(predicate::str::contains("Crushing - Ram descends"));

    let json = read_json(&tmp);
    assert_eq!(json["hazard_data"][0]["user"], "Operator");
    assert_eq!(json["hazard_data"][0]["tasks"][0]["task"], "Clear jam");
    assert_eq!(
        json["hazard_data"][0]["tasks"][0]["hazards"][0],
        "Crushing - Ram descends"
    );
}

#[test]
fn test_duplicate_role_fails_and_leaves_file() {
    let tmp = setup_with_hazard();
    let before = fs::read_to_string(doc_path(&tmp)).unwrap();

    mrt_in(&tmp)
        .args(["role", "add", "Operator"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    assert_eq!(fs::read_to_string(doc_path(&tmp)).unwrap(), before);
}

#[test]
fn test_task_for_unknown_role_fails() {
    let tmp = setup_assessment();
    mrt_in(&tmp)
        .args(["task", "add", "Ghost", "Clean"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_hazard_with_cause_flag() {
    let tmp = setup_with_hazard();
    mrt_in(&tmp)
        .args([
            "hazard", "add", "Operator", "Clear jam", "Shearing", "--cause", "Die edge",
        ])
        .assert()
        .success();
    let json = read_json(&tmp);
    assert_eq!(
        json["hazard_data"][0]["tasks"][0]["hazards"][1],
        "Shearing - Die edge"
    );
}

#[test]
fn test_hazard_name_with_separator_and_cause_is_rejected() {
    let tmp = setup_with_hazard();
    mrt_in(&tmp)
        .args([
            "hazard", "add", "Operator", "Clear jam", "Crushing - Ram", "--cause", "Die",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot contain"));
    let json = read_json(&tmp);
    assert_eq!(
        json["hazard_data"][0]["tasks"][0]["hazards"]
            .as_array()
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn test_cause_with_separator_keeps_scores_on_refresh() {
    let tmp = setup_with_hazard();
    mrt_in(&tmp)
        .args([
            "hazard", "add", "Operator", "Clear jam", "Pinch", "--cause", "Belt - pulley",
        ])
        .assert()
        .success();
    mrt_in(&tmp).args(["risk", "refresh"]).assert().success();
    mrt_in(&tmp)
        .args(["risk", "set", "2", "--initial-severity", "Minor"])
        .assert()
        .success();
    mrt_in(&tmp).args(["risk", "refresh"]).assert().success();

    let json = read_json(&tmp);
    let rows = json["risk_assessment_data"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    let pinch = rows.iter().find(|r| r["col_4"] == "Pinch").unwrap();
    assert_eq!(pinch["col_5"], "Belt - pulley");
    assert_eq!(pinch["col_6"], "Minor");
}

#[test]
fn test_hazard_pick_from_catalog() {
    let tmp = setup_with_hazard();
    mrt_in(&tmp)
        .args([
            "hazard", "pick", "Operator", "Clear jam", "-c", "Mechanical", "Cutting/Severing", "Impact",
        ])
        .assert()
        .success();

    let json = read_json(&tmp);
    let hazards = json["hazard_data"][0]["tasks"][0]["hazards"]
        .as_array()
        .unwrap();
    assert_eq!(hazards.len(), 3);
}

#[test]
fn test_rename_role_keeps_tasks() {
    let tmp = setup_with_hazard();
    mrt_in(&tmp)
        .args(["role", "rename", "Operator", "Setter"])
        .assert()
        .success();
    let json = read_json(&tmp);
    assert_eq!(json["hazard_data"][0]["user"], "Setter");
    assert_eq!(json["hazard_data"][0]["tasks"][0]["task"], "Clear jam");
}

#[test]
fn test_remove_role_cascades() {
    let tmp = setup_with_hazard();
    mrt_in(&tmp)
        .args(["role", "rm", "Operator", "-y"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mrt risk refresh"));

    let json = read_json(&tmp);
    assert!(json["hazard_data"].as_array().unwrap().is_empty());
}

#[test]
fn test_role_list_json() {
    let tmp = setup_with_hazard();
    let output = mrt_in(&tmp)
        .args(["role", "list", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let users: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(users[0]["name"], "Operator");
}

// ============================================================================
// Catalog / Matrix Tests
// ============================================================================

#[test]
fn test_catalog_categories() {
    mrt()
        .args(["catalog", "categories"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Mechanical"))
        .stdout(predicate::str::contains("Wastes (Lean)"));
}

#[test]
fn test_catalog_infer() {
    mrt()
        .args(["catalog", "infer", "Hydraulic hose burst"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fluid/Pressure"));
}

#[test]
fn test_catalog_methods() {
    mrt()
        .args(["catalog", "methods"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3.2"));
}

#[test]
fn test_matrix_single_pair() {
    mrt()
        .args(["matrix", "Catastrophic", "Remote"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Medium"));
}

#[test]
fn test_matrix_rejects_unknown_level() {
    mrt().args(["matrix", "Fatal", "Remote"]).assert().failure();
}

// ============================================================================
// End-to-end
// ============================================================================

#[test]
fn test_full_workflow() {
    let tmp = setup_with_hazard();

    mrt_in(&tmp)
        .args([
            "risk",
            "set",
            "1",
            "--residual-severity",
            "Serious",
            "--residual-probability",
            "Unlikely",
            "--method",
            "3.2",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("residual Medium"));

    mrt_in(&tmp)
        .args(["control", "populate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 control row"));

    mrt_in(&tmp)
        .args(["alt", "populate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 alternative method row"));

    // Populated rows lack procedures and controls
    mrt_in(&tmp)
        .arg("validate")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Row 1: Missing Procedure"));

    mrt_in(&tmp)
        .args([
            "alt",
            "set",
            "1",
            "--procedure",
            "Stop cycle, open interlocked gate, clear with hook tool",
            "--controls",
            "Interlocked gate, Category 3",
            "--training",
            "Annual jam clearing training",
            "--verification",
            "Daily interlock check",
            "--approvals",
            "Plant manager",
        ])
        .assert()
        .success();

    mrt_in(&tmp)
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("All alternative methods are compliant!"));

    mrt_in(&tmp)
        .args(["report", "report.html"])
        .assert()
        .success();
    let html = fs::read_to_string(tmp.path().join("report.html")).unwrap();
    assert!(html.contains("Press 7"));
    assert!(html.contains("Crushing"));
    assert!(html.contains("3.2 Interlocked guards"));

    mrt_in(&tmp).args(["report", "risks.csv"]).assert().success();
    let csv = fs::read_to_string(tmp.path().join("risks.csv")).unwrap();
    assert!(csv.starts_with("Item ID,User/Role,Task"));
    assert_eq!(csv.lines().count(), 2);
}

#[test]
fn test_report_markdown_with_empty_tables() {
    let tmp = setup_assessment();
    mrt_in(&tmp)
        .args(["report", "out.txt", "--format", "markdown"])
        .assert()
        .success();
    let md = fs::read_to_string(tmp.path().join("out.txt")).unwrap();
    assert!(md.contains("No risk assessment data available"));
    assert!(md.contains("No control system data available"));
    assert!(md.contains("No alternative method data available"));
}

#[test]
fn test_report_uses_config_analyst() {
    let tmp = setup_assessment();
    fs::write(tmp.path().join(".mrt.yaml"), "analyst: Safety Office\n").unwrap();
    mrt_in(&tmp).args(["report", "r.md"]).assert().success();
    let md = fs::read_to_string(tmp.path().join("r.md")).unwrap();
    assert!(md.contains("Safety Office"));
}

#[test]
fn test_invalid_config_is_warned_once() {
    let tmp = setup_assessment();
    fs::write(tmp.path().join(".mrt.yaml"), "analyst: [").unwrap();
    let output = mrt_in(&tmp).args(["role", "list"]).output().unwrap();
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("Invalid config file").count(), 1);
    assert!(stderr.contains(".mrt.yaml"));
}
