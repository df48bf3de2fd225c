//! Integration tests for the `invdash` binary.
//!
//! Every test points `XDG_CONFIG_HOME` and `XDG_DATA_HOME` at its own temp
//! dir, so config files and preference records never leak between tests or
//! into the real home directory.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn invdash(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("invdash").expect("binary should build");
    cmd.env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_DATA_HOME", home.path().join("data"))
        .env_remove("INVDASH_LOG");
    cmd
}

fn record_path(home: &TempDir, user: &str) -> PathBuf {
    home.path()
        .join("data/inventory-dashboard")
        .join(format!("{user}.json"))
}

#[test]
fn show_renders_default_dashboard() {
    let home = TempDir::new().expect("failed to create temp dir");
    invdash(&home)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("(lg, 12 columns)"))
        .stdout(predicate::str::contains("Asset summary"))
        .stdout(predicate::str::contains("[recent-activity]"));
}

#[test]
fn show_at_narrow_width_uses_single_column() {
    let home = TempDir::new().expect("failed to create temp dir");
    invdash(&home)
        .args(["show", "--width", "500"])
        .assert()
        .success()
        .stdout(predicate::str::contains("500px (sm, 1 columns)"));
}

#[test]
fn toggle_hides_widget_across_runs() {
    let home = TempDir::new().expect("failed to create temp dir");
    invdash(&home)
        .args(["toggle", "recent-activity"])
        .assert()
        .success()
        .stdout(predicate::str::contains("recent-activity is now hidden"));

    let hidden = predicate::str::is_match(r"recent-activity\s+hidden").expect("valid regex");
    invdash(&home).arg("widgets").assert().success().stdout(hidden);
    invdash(&home)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("[recent-activity]").not());
    assert!(record_path(&home, "default").is_file());
}

#[test]
fn toggle_unknown_widget_fails_without_writing() {
    let home = TempDir::new().expect("failed to create temp dir");
    invdash(&home)
        .args(["toggle", "printer-queue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown widget 'printer-queue'"));
    assert!(!record_path(&home, "default").exists());
}

#[test]
fn resize_is_persisted_per_user() {
    let home = TempDir::new().expect("failed to create temp dir");
    invdash(&home)
        .args(["resize", "assets-by-status", "3", "4", "--user", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "assets-by-status is now at x=0 y=2 w=3 h=4",
        ));

    let raw = fs::read_to_string(record_path(&home, "alice")).expect("alice's record");
    let record: serde_json::Value = serde_json::from_str(&raw).expect("valid JSON");
    let status = record["layouts"]["lg"]
        .as_array()
        .expect("lg layout")
        .iter()
        .find(|item| item["i"] == "assets-by-status")
        .expect("item stored");
    assert_eq!(status["w"], 3);
    assert!(!record_path(&home, "default").exists());
}

#[test]
fn resize_below_minimum_is_clamped() {
    let home = TempDir::new().expect("failed to create temp dir");
    invdash(&home)
        .args(["resize", "assets-by-status", "1", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("w=3 h=3"));
}

#[test]
fn move_of_hidden_widget_fails() {
    let home = TempDir::new().expect("failed to create temp dir");
    invdash(&home).args(["toggle", "asset-summary"]).assert().success();
    invdash(&home)
        .args(["move", "asset-summary", "0", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot move 'asset-summary'"));
}

#[test]
fn corrupt_record_falls_back_to_defaults() {
    let home = TempDir::new().expect("failed to create temp dir");
    let path = record_path(&home, "default");
    fs::create_dir_all(path.parent().expect("record dir")).expect("mkdir");
    fs::write(&path, "{\"visibleWidgets\": [").expect("write corrupt record");

    invdash(&home)
        .arg("widgets")
        .assert()
        .success()
        .stdout(predicate::str::contains("hidden").not())
        .stdout(predicate::str::contains("asset-summary"));
}

#[test]
fn reset_restores_hidden_widgets() {
    let home = TempDir::new().expect("failed to create temp dir");
    invdash(&home).args(["toggle", "warranty-expiring"]).assert().success();
    invdash(&home)
        .arg("reset")
        .assert()
        .success()
        .stdout(predicate::str::contains("Restored default dashboard for default"));
    invdash(&home)
        .arg("widgets")
        .assert()
        .success()
        .stdout(predicate::str::contains("hidden").not());
}

#[test]
fn config_init_then_validate() {
    let home = TempDir::new().expect("failed to create temp dir");
    invdash(&home)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration at"));
    invdash(&home)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
    invdash(&home)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn config_path_points_into_xdg_config_home() {
    let home = TempDir::new().expect("failed to create temp dir");
    invdash(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("inventory-dashboard/config.toml"));
}

#[test]
fn configured_user_and_width_are_used() {
    let home = TempDir::new().expect("failed to create temp dir");
    let dir = home.path().join("config/inventory-dashboard");
    fs::create_dir_all(&dir).expect("mkdir");
    fs::write(
        dir.join("config.toml"),
        "[dashboard]\nuser = \"carol\"\nwidth = 700\n",
    )
    .expect("write config");

    invdash(&home)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("Dashboard for carol at 700px (md"));
}

#[test]
fn invalid_config_is_reported() {
    let home = TempDir::new().expect("failed to create temp dir");
    let dir = home.path().join("config/inventory-dashboard");
    fs::create_dir_all(&dir).expect("mkdir");
    fs::write(dir.join("config.toml"), "[dashboard]\nwidth = \"wide\"\n").expect("write config");

    invdash(&home)
        .arg("show")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config error"))
        .stderr(predicate::str::contains("config.toml:2:"));
}
