//! Integration tests for the packlist CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to get a packlist command
fn packlist() -> Command {
    Command::cargo_bin("packlist").unwrap()
}

/// Helper to create an initialized workspace in a temp directory
fn setup_workspace() -> TempDir {
    let tmp = TempDir::new().unwrap();
    packlist()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success();
    tmp
}

/// Helper to fetch a category's items as JSON
fn items_of(tmp: &TempDir, category: &str) -> serde_json::Value {
    let output = packlist()
        .current_dir(tmp.path())
        .args(["item", "list", category, "--format", "json"])
        .output()
        .unwrap();
    serde_json::from_slice(&output.stdout).expect("item list --format json parses")
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    packlist()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("outdoor gear checklists"));
}

#[test]
fn test_version_displays() {
    packlist()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("packlist"));
}

#[test]
fn test_unknown_command_fails() {
    packlist()
        .arg("unknown-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_commands_fail_outside_workspace() {
    let tmp = TempDir::new().unwrap();
    packlist()
        .current_dir(tmp.path())
        .args(["cat", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a packlist workspace"));
}

// ============================================================================
// Init Command Tests
// ============================================================================

#[test]
fn test_init_creates_workspace_and_default_categories() {
    let tmp = TempDir::new().unwrap();

    packlist()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized"));

    assert!(tmp.path().join(".packlist").exists());
    assert!(tmp.path().join(".packlist/config.yaml").exists());
    assert!(tmp.path().join(".packlist/data/checklist.json").exists());

    // Fresh load seeds the 8 default categories, all empty
    packlist()
        .current_dir(tmp.path())
        .args(["cat", "list", "--count"])
        .assert()
        .success()
        .stdout(predicate::str::contains("8"));
    packlist()
        .current_dir(tmp.path())
        .args(["item", "list", "--count"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0"));
}

#[test]
fn test_init_twice_reports_existing() {
    let tmp = setup_workspace();

    packlist()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

// ============================================================================
// Category Command Tests
// ============================================================================

#[test]
fn test_cat_add_and_list() {
    let tmp = setup_workspace();

    packlist()
        .current_dir(tmp.path())
        .args(["cat", "add", "露营装备", "--icon", "🏕️"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added category"));

    packlist()
        .current_dir(tmp.path())
        .args(["cat", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("露营装备"));
}

#[test]
fn test_cat_add_empty_name_fails() {
    let tmp = setup_workspace();

    packlist()
        .current_dir(tmp.path())
        .args(["cat", "add", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("name must not be empty"));

    // No category was created
    packlist()
        .current_dir(tmp.path())
        .args(["cat", "list", "--count"])
        .assert()
        .success()
        .stdout(predicate::str::contains("8"));
}

#[test]
fn test_cat_rename_and_rm() {
    let tmp = setup_workspace();

    packlist()
        .current_dir(tmp.path())
        .args(["cat", "rename", "背负系统", "背负"])
        .assert()
        .success();

    packlist()
        .current_dir(tmp.path())
        .args(["cat", "rm", "背负", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted category"));

    packlist()
        .current_dir(tmp.path())
        .args(["cat", "list", "--count"])
        .assert()
        .success()
        .stdout(predicate::str::contains("7"));
}

// ============================================================================
// Item Command Tests
// ============================================================================

#[test]
fn test_item_add_and_stats() {
    let tmp = setup_workspace();

    packlist()
        .current_dir(tmp.path())
        .args(["cat", "add", "露营装备", "--icon", "🏕️"])
        .assert()
        .success();
    packlist()
        .current_dir(tmp.path())
        .args([
            "item", "add", "露营装备", "帐篷", "--quantity", "1", "--weight", "2000",
            "--weight-unit", "g", "--price", "500",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added item"));

    packlist()
        .current_dir(tmp.path())
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("2.00kg"))
        .stdout(predicate::str::contains("500.00人民币"));
}

#[test]
fn test_item_weight_unit_jin() {
    let tmp = setup_workspace();

    packlist()
        .current_dir(tmp.path())
        .args([
            "item", "add", "路餐食材", "大米", "--weight", "5", "--weight-unit", "斤",
        ])
        .assert()
        .success();

    // 5 斤 = 2500 g
    packlist()
        .current_dir(tmp.path())
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("2.50kg"));
}

#[test]
fn test_item_delete_middle_reindexes() {
    let tmp = setup_workspace();

    for name in ["睡袋", "防潮垫", "枕头"] {
        packlist()
            .current_dir(tmp.path())
            .args(["item", "add", "睡眠系统", name])
            .assert()
            .success();
    }
    packlist()
        .current_dir(tmp.path())
        .args(["item", "rm", "睡眠系统", "防潮垫", "--yes"])
        .assert()
        .success();

    let items = items_of(&tmp, "睡眠系统");
    let indexed: Vec<(i64, &str)> = items
        .as_array()
        .unwrap()
        .iter()
        .map(|i| (i["index"].as_i64().unwrap(), i["name"].as_str().unwrap()))
        .collect();
    assert_eq!(indexed, vec![(1, "睡袋"), (2, "枕头")]);
}

#[test]
fn test_item_toggle() {
    let tmp = setup_workspace();

    packlist()
        .current_dir(tmp.path())
        .args(["item", "add", "必备工具", "头灯"])
        .assert()
        .success();
    packlist()
        .current_dir(tmp.path())
        .args(["item", "toggle", "必备工具", "头灯"])
        .assert()
        .success()
        .stdout(predicate::str::contains("packed"));

    let items = items_of(&tmp, "必备工具");
    assert_eq!(items[0]["completed"], true);
}

// ============================================================================
// Undo Command Tests
// ============================================================================

#[test]
fn test_undo_reverses_category_add() {
    let tmp = setup_workspace();

    packlist()
        .current_dir(tmp.path())
        .args(["cat", "add", "临时分类"])
        .assert()
        .success();
    packlist()
        .current_dir(tmp.path())
        .arg("undo")
        .assert()
        .success()
        .stdout(predicate::str::contains("Undid"));

    packlist()
        .current_dir(tmp.path())
        .args(["cat", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("临时分类").not());
}

#[test]
fn test_undo_with_nothing_to_undo() {
    let tmp = setup_workspace();

    packlist()
        .current_dir(tmp.path())
        .arg("undo")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to undo"));
}

// ============================================================================
// Log Command Tests
// ============================================================================

#[test]
fn test_log_records_operations() {
    let tmp = setup_workspace();

    packlist()
        .current_dir(tmp.path())
        .args(["cat", "add", "露营装备"])
        .assert()
        .success();

    packlist()
        .current_dir(tmp.path())
        .args(["log", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("露营装备"));
}

#[test]
fn test_log_export_and_clear() {
    let tmp = setup_workspace();

    packlist()
        .current_dir(tmp.path())
        .args(["cat", "add", "露营装备"])
        .assert()
        .success();

    let export_path = tmp.path().join("logs.json");
    packlist()
        .current_dir(tmp.path())
        .args(["log", "export", "--output"])
        .arg(&export_path)
        .assert()
        .success();
    let exported: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&export_path).unwrap()).unwrap();
    assert!(!exported.as_array().unwrap().is_empty());

    packlist()
        .current_dir(tmp.path())
        .args(["log", "clear", "--yes"])
        .assert()
        .success();
    packlist()
        .current_dir(tmp.path())
        .args(["log", "list", "--count"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0"));
}

#[test]
fn test_log_export_empty_fails() {
    let tmp = setup_workspace();

    packlist()
        .current_dir(tmp.path())
        .args(["log", "clear", "--yes"])
        .assert()
        .success();
    packlist()
        .current_dir(tmp.path())
        .args(["log", "export"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no log entries to export"));
}

// ============================================================================
// Data Command Tests
// ============================================================================

#[test]
fn test_data_import_repairs_duplicate_ids() {
    let tmp = setup_workspace();

    let payload = r#"[{
        "name": "装备",
        "items": [
            {"id": "dup", "name": "第一"},
            {"id": "dup", "name": "第二"}
        ]
    }]"#;
    let file = tmp.path().join("import.json");
    fs::write(&file, payload).unwrap();

    packlist()
        .current_dir(tmp.path())
        .args(["data", "import", "--yes"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 1 categor(ies), 2 item(s)"))
        .stderr(predicate::str::contains("duplicate item id"));

    let items = items_of(&tmp, "装备");
    let ids: Vec<&str> = items
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_str().unwrap())
        .collect();
    assert_ne!(ids[0], ids[1]);
    // Indices were rebuilt contiguously
    assert_eq!(items[0]["index"], 1);
    assert_eq!(items[1]["index"], 2);
}

#[test]
fn test_data_import_rejects_non_array() {
    let tmp = setup_workspace();

    let file = tmp.path().join("bad.json");
    fs::write(&file, r#"{"name": "not an array"}"#).unwrap();

    packlist()
        .current_dir(tmp.path())
        .args(["data", "import", "--yes"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("schema validation"));
}

#[test]
fn test_data_export_roundtrip() {
    let tmp = setup_workspace();

    packlist()
        .current_dir(tmp.path())
        .args(["item", "add", "背负系统", "背包", "--weight", "1.5", "--weight-unit", "kg"])
        .assert()
        .success();

    let export_path = tmp.path().join("export.json");
    packlist()
        .current_dir(tmp.path())
        .args(["data", "export", "--output"])
        .arg(&export_path)
        .assert()
        .success();

    // Re-import what was exported; totals survive the round trip
    packlist()
        .current_dir(tmp.path())
        .args(["data", "import", "--yes"])
        .arg(&export_path)
        .assert()
        .success();
    packlist()
        .current_dir(tmp.path())
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("1.50kg"));
}

#[test]
fn test_data_clear() {
    let tmp = setup_workspace();

    packlist()
        .current_dir(tmp.path())
        .args(["data", "clear", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared 8 categor(ies)"));

    packlist()
        .current_dir(tmp.path())
        .args(["cat", "list", "--count"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0"));
}

// ============================================================================
// Doctor Command Tests
// ============================================================================

#[test]
fn test_doctor_on_healthy_workspace() {
    let tmp = setup_workspace();

    packlist()
        .current_dir(tmp.path())
        .arg("doctor")
        .assert()
        .success()
        .stdout(predicate::str::contains("No repairs needed"));
}

#[test]
fn test_corrupt_checklist_resets_with_warning() {
    let tmp = setup_workspace();
    fs::write(tmp.path().join(".packlist/data/checklist.json"), "{ nope").unwrap();

    packlist()
        .current_dir(tmp.path())
        .args(["cat", "list", "--count"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0"))
        .stderr(predicate::str::contains("corrupt"));
}
