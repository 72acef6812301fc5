//! Risk, control system and alternative method table tests

mod common;

use common::{mrt_in, read_json, setup_with_hazard};
use predicates::prelude::*;

// ============================================================================
// Risk Table
// ============================================================================

#[test]
fn test_refresh_builds_one_row_per_hazard() {
    let tmp = setup_with_hazard();
    let json = read_json(&tmp);
    let rows = json["risk_assessment_data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["col_0"], "1");
    assert_eq!(rows[0]["col_1"], "Operator");
    assert_eq!(rows[0]["col_3"], "Mechanical");
    assert_eq!(rows[0]["col_4"], "Crushing");
    assert_eq!(rows[0]["col_5"], "Ram descends");
    assert_eq!(rows[0]["col_8"], "High");
}

#[test]
fn test_refresh_keeps_scores() {
    let tmp = setup_with_hazard();
    mrt_in(&tmp)
        .args(["risk", "set", "1", "--initial-probability", "Remote", "-m", "Two-hand control"])
        .assert()
        .success();

    mrt_in(&tmp)
        .args(["hazard", "add", "Operator", "Clear jam", "Slip - Oily floor"])
        .assert()
        .success();
    mrt_in(&tmp).args(["risk", "refresh"]).assert().success();

    let json = read_json(&tmp);
    let rows = json["risk_assessment_data"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["col_7"], "Remote");
    assert_eq!(rows[0]["col_9"], "Two-hand control");
    assert_eq!(rows[1]["col_0"], "2");
    assert_eq!(rows[1]["col_3"], "Slips/Trips/Falls");
}

#[test]
fn test_refresh_drops_removed_hazards_and_renumbers() {
    let tmp = setup_with_hazard();
    mrt_in(&tmp)
        .args(["hazard", "add", "Operator", "Clear jam", "Shearing - Die edge"])
        .assert()
        .success();
    mrt_in(&tmp).args(["risk", "refresh"]).assert().success();
    mrt_in(&tmp)
        .args(["hazard", "rm", "Operator", "Clear jam", "Crushing - Ram descends", "-y"])
        .assert()
        .success();
    mrt_in(&tmp).args(["risk", "refresh"]).assert().success();

    let json = read_json(&tmp);
    let rows = json["risk_assessment_data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["col_0"], "1");
    assert_eq!(rows[0]["col_4"], "Shearing");
}

#[test]
fn test_set_unknown_item_fails() {
    let tmp = setup_with_hazard();
    mrt_in(&tmp)
        .args(["risk", "set", "9", "--initial-severity", "Minor"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No risk entry with item ID 9"));
}

#[test]
fn test_set_unknown_method_fails() {
    let tmp = setup_with_hazard();
    mrt_in(&tmp)
        .args(["risk", "set", "1", "--method", "9.9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown risk reduction method"));
}

#[test]
fn test_list_filters_by_residual() {
    let tmp = setup_with_hazard();
    mrt_in(&tmp)
        .args(["risk", "set", "1", "--residual-severity", "Minor", "--residual-probability", "Remote"])
        .assert()
        .success();

    mrt_in(&tmp)
        .args(["risk", "list", "--min-residual", "High", "-o", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Crushing").not());

    let output = mrt_in(&tmp)
        .args(["risk", "list", "-o", "json"])
        .output()
        .unwrap();
    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(rows[0]["residual_risk"], "Low");
    assert_eq!(rows[0]["initial_risk"], "High");
}

// ============================================================================
// Control System Table
// ============================================================================

#[test]
fn test_control_populate_uses_residual_risk() {
    let tmp = setup_with_hazard();
    mrt_in(&tmp)
        .args(["risk", "set", "1", "--residual-severity", "Serious", "--residual-probability", "Unlikely"])
        .assert()
        .success();
    mrt_in(&tmp).args(["control", "populate"]).assert().success();

    let json = read_json(&tmp);
    let row = &json["control_system_data"][0];
    assert_eq!(row["col_0"], "Control for Crushing");
    assert_eq!(row["col_1"], "Operator - Clear jam - Crushing - Ram descends");
    assert_eq!(row["col_2"], "High");
    assert_eq!(row["col_3"], "Medium");
    assert_eq!(row["col_4"], "Category 3");
    assert_eq!(row["col_5"], "Category 3");
    assert_eq!(row["col_6"], "Interlock");
}

#[test]
fn test_control_add_and_set() {
    let tmp = setup_with_hazard();
    mrt_in(&tmp)
        .args(["control", "add", "--function", "Guard interlock", "--hazard", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added control row 1"));

    mrt_in(&tmp)
        .args(["control", "set", "1", "--actual", "2", "--type", "Light Curtain"])
        .assert()
        .success();

    let json = read_json(&tmp);
    let row = &json["control_system_data"][0];
    assert_eq!(row["col_4"], "Category 4");
    assert_eq!(row["col_5"], "Category 2");
    assert_eq!(row["col_6"], "Light Curtain");

    mrt_in(&tmp)
        .args(["control", "list", "-o", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("NO"));
}

#[test]
fn test_control_set_empty_type_fails() {
    let tmp = setup_with_hazard();
    mrt_in(&tmp).args(["control", "populate"]).assert().success();
    mrt_in(&tmp)
        .args(["control", "set", "1", "--type", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Control type cannot be empty"));
    assert_eq!(read_json(&tmp)["control_system_data"][0]["col_6"], "Interlock");
}

#[test]
fn test_control_rm_out_of_range() {
    let tmp = setup_with_hazard();
    mrt_in(&tmp)
        .args(["control", "rm", "1", "-y"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No control system row 1"));
}

#[test]
fn test_control_guidance() {
    let tmp = setup_with_hazard();
    mrt_in(&tmp)
        .args(["control", "guidance", "medium"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Category 2 to Category 3"));
}

// ============================================================================
// Alternative Method Table
// ============================================================================

#[test]
fn test_alt_populate_defaults() {
    let tmp = setup_with_hazard();
    mrt_in(&tmp).args(["alt", "populate"]).assert().success();

    let json = read_json(&tmp);
    let row = &json["alternative_method_data"][0];
    assert_eq!(row["col_0"], "Clear jam");
    assert_eq!(row["col_2"], "Yes");
    assert_eq!(
        row["col_3"],
        "LOTO not feasible for Clear jam due to Crushing. Alternative method provides equivalent protection."
    );
}

#[test]
fn test_repopulate_replaces_rows() {
    let tmp = setup_with_hazard();
    mrt_in(&tmp).args(["alt", "populate"]).assert().success();
    mrt_in(&tmp)
        .args(["alt", "add", "--task", "Adjust feed"])
        .assert()
        .success();
    assert_eq!(read_json(&tmp)["alternative_method_data"].as_array().unwrap().len(), 2);

    // stdin is not a terminal, so the replace prompt is skipped
    mrt_in(&tmp).args(["alt", "populate"]).assert().success();
    assert_eq!(read_json(&tmp)["alternative_method_data"].as_array().unwrap().len(), 1);
}

#[test]
fn test_validate_flags_stale_hazard() {
    let tmp = setup_with_hazard();
    mrt_in(&tmp).args(["alt", "populate"]).assert().success();
    mrt_in(&tmp)
        .args([
            "alt",
            "set",
            "1",
            "--procedure",
            "Stop cycle, open interlocked gate, clear with hook tool",
            "--controls",
            "Interlocked gate",
            "--training",
            "Annual",
            "--verification",
            "Daily check",
            "--approvals",
            "Plant manager",
        ])
        .assert()
        .success();
    mrt_in(&tmp)
        .args(["task", "rm", "Operator", "Clear jam", "-y"])
        .assert()
        .success();

    mrt_in(&tmp)
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Row 1: Associated Hazard no longer exists in hazard tree",
        ));

    mrt_in(&tmp).args(["validate", "--strict"]).assert().failure();
}

#[test]
fn test_validate_nothing_to_validate() {
    let tmp = setup_with_hazard();
    mrt_in(&tmp)
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("No alternative methods to validate"));

    let output = mrt_in(&tmp)
        .args(["validate", "-o", "json"])
        .output()
        .unwrap();
    let outcome: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(outcome["outcome"], "nothing_to_validate");
}
