use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;

fn microlab(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("microlab").unwrap();
    cmd.env("MICROLAB_HOME", home).env_remove("MICROLAB_LOG");
    cmd
}

fn stored_reports(home: &Path) -> Vec<Value> {
    let raw = std::fs::read_to_string(home.join("microbiologyReports.json")).unwrap();
    serde_json::from_str(&raw).unwrap()
}

fn create_complete(home: &Path, title: &str, sample_id: &str) {
    microlab(home)
        .args([
            "create",
            "--title",
            title,
            "--sample-id",
            sample_id,
            "--client",
            "Harbor Foods",
            "--email",
            "qa@harborfoods.test",
            "--organism",
            "Total coliforms:3:CFU/100mL",
            "--conclusion",
            "Within limits",
            "--analyst",
            "M. Ortiz",
            "--status",
            "completed",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Report saved as completed"));
}

#[test]
fn test_create_persists_browser_shaped_record() {
    let home = tempfile::tempdir().unwrap();
    create_complete(home.path(), "Tap water", "TW-1");

    let reports = stored_reports(home.path());
    assert_eq!(reports.len(), 1);
    let report = &reports[0];
    assert_eq!(report["title"], "Tap water");
    assert_eq!(report["sampleId"], "TW-1");
    assert_eq!(report["sampleType"], "Water");
    assert_eq!(report["status"], "completed");
    assert_eq!(report["client"]["name"], "Harbor Foods");
    assert_eq!(report["microorganisms"][0]["unit"], "CFU/100mL");
}

#[test]
fn test_incomplete_report_cannot_be_completed() {
    let home = tempfile::tempdir().unwrap();

    microlab(home.path())
        .args(["create", "--title", "Half done", "--status", "completed"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing"))
        .stderr(predicate::str::contains("client email"));

    assert!(!home.path().join("microbiologyReports.json").exists());
}

#[test]
fn test_draft_saves_without_required_fields() {
    let home = tempfile::tempdir().unwrap();

    microlab(home.path())
        .args(["n", "--title", "Half done"])
        .assert()
        .success();

    let reports = stored_reports(home.path());
    assert_eq!(reports[0]["status"], "draft");
}

#[test]
fn test_list_filters_and_view_by_prefix() {
    let home = tempfile::tempdir().unwrap();
    create_complete(home.path(), "Tap water", "TW-1");
    create_complete(home.path(), "Well survey", "WS-9");

    microlab(home.path())
        .args(["list", "--search", "well"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Well survey"))
        .stdout(predicate::str::contains("Tap water").not());

    let id = stored_reports(home.path())[0]["id"]
        .as_str()
        .unwrap()
        .to_string();
    microlab(home.path())
        .args(["view", &id[..8]])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tap water"))
        .stdout(predicate::str::contains("Total coliforms: 3 CFU/100mL"));
}

#[test]
fn test_edit_keeps_identity() {
    let home = tempfile::tempdir().unwrap();
    create_complete(home.path(), "Tap water", "TW-1");
    let before = stored_reports(home.path())[0].clone();
    let id = before["id"].as_str().unwrap();

    microlab(home.path())
        .args(["edit", id, "--notes", "Resampled", "--status", "sent"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Report updated"));

    let after = &stored_reports(home.path())[0];
    assert_eq!(after["id"], before["id"]);
    assert_eq!(after["date"], before["date"]);
    assert_eq!(after["notes"], "Resampled");
    assert_eq!(after["status"], "sent");
}

#[test]
fn test_delete_removes_report() {
    let home = tempfile::tempdir().unwrap();
    create_complete(home.path(), "Tap water", "TW-1");
    create_complete(home.path(), "Well survey", "WS-9");
    let id = stored_reports(home.path())[0]["id"]
        .as_str()
        .unwrap()
        .to_string();

    microlab(home.path())
        .args(["rm", &id])
        .assert()
        .success();

    let remaining = stored_reports(home.path());
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["title"], "Well survey");
}

#[test]
fn test_export_single_report_as_markdown() {
    let home = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    create_complete(home.path(), "Tap water", "TW-1");

    microlab(home.path())
        .args(["export", "--output"])
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 report(s)"));

    let doc = std::fs::read_to_string(out.path().join("Microbiology-Report-TW-1.md")).unwrap();
    assert!(doc.contains("## Tap water"));
    assert!(doc.contains("Status: **Completed**"));
}

#[test]
fn test_unreadable_store_starts_empty_and_is_kept_aside() {
    let home = tempfile::tempdir().unwrap();
    std::fs::write(home.path().join("microbiologyReports.json"), "{ broken").unwrap();

    microlab(home.path())
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Reports 0"))
        .stdout(predicate::str::contains("could not be loaded"));

    let entries: Vec<_> = std::fs::read_dir(home.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert!(entries.iter().any(|name| name.contains("unreadable")));
}

#[test]
fn test_undecodable_store_survives_next_save() {
    let home = tempfile::tempdir().unwrap();
    let raw = b"[{\"id\":\"keep-me\",\"title\":\"caf\xE9\"}]".to_vec();
    std::fs::write(home.path().join("microbiologyReports.json"), &raw).unwrap();

    microlab(home.path())
        .args(["create", "--title", "Fresh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("could not be loaded"));

    let backup = std::fs::read(home.path().join("microbiologyReports.unreadable.json")).unwrap();
    assert_eq!(backup, raw);
    assert_eq!(stored_reports(home.path())[0]["title"], "Fresh");
}

#[test]
fn test_list_warns_about_unreadable_store() {
    let home = tempfile::tempdir().unwrap();
    std::fs::write(home.path().join("microbiologyReports.json"), "{ broken").unwrap();

    microlab(home.path())
        .arg("ls")
        .assert()
        .success()
        .stdout(predicate::str::contains("No reports found."))
        .stdout(predicate::str::contains("could not be loaded"));
}

#[test]
fn test_config_repairs_broken_file() {
    let home = tempfile::tempdir().unwrap();
    std::fs::write(home.path().join("config.json"), "not json").unwrap();

    microlab(home.path())
        .args(["config", "lab-name", "Coastal Lab"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lab-name set to Coastal Lab"));

    microlab(home.path())
        .args(["config", "lab-name"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lab-name = Coastal Lab"));
}

#[test]
fn test_config_round_trip() {
    let home = tempfile::tempdir().unwrap();

    microlab(home.path())
        .args(["config", "lab-name", "Coastal Lab"])
        .assert()
        .success();

    microlab(home.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("lab-name = Coastal Lab"));
}

#[test]
fn test_dashboard_with_no_reports() {
    let home = tempfile::tempdir().unwrap();

    microlab(home.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Reports 0"))
        .stdout(predicate::str::contains("No reports found."));
}
