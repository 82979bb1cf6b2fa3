use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn feedesk(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("feedesk").unwrap();
    cmd.env("FEEDESK_DATA_DIR", dir.path());
    cmd
}

fn initialized() -> TempDir {
    let dir = TempDir::new().unwrap();
    feedesk(&dir).arg("init").assert().success();
    dir
}

#[test]
fn no_command_prints_usage_hint() {
    let dir = TempDir::new().unwrap();
    feedesk(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("feedesk --help"));
}

#[test]
fn commands_require_init() {
    let dir = TempDir::new().unwrap();
    feedesk(&dir)
        .args(["student", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("feedesk init"));
}

#[test]
fn init_is_repeatable() {
    let dir = initialized();
    feedesk(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete!"));
    feedesk(&dir)
        .args(["student", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("5 student(s)"));
}

#[test]
fn student_search_keeps_only_matches() {
    let dir = initialized();
    feedesk(&dir)
        .args(["student", "list", "--search", "kazi"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Kazi Fahim"))
        .stdout(predicate::str::contains("Richi Rozario").not())
        .stdout(predicate::str::contains("2 student(s)"));
}

#[test]
fn student_filters_combine() {
    let dir = initialized();
    feedesk(&dir)
        .args(["student", "list", "--class", "1", "--arrears", "with"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2903"))
        .stdout(predicate::str::contains("1 student(s)"));

    feedesk(&dir)
        .args(["student", "list", "--class", "9"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "No students found matching the selected filters.",
        ));

    feedesk(&dir)
        .args(["student", "list", "--status", "overdue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid fees status"));
}

#[test]
fn statement_shows_partial_balance() {
    let dir = initialized();
    feedesk(&dir)
        .args([
            "student",
            "statement",
            "2902",
            "--term",
            "term1-2025",
            "--currency",
            "usd",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("$630.00"))
        .stdout(predicate::str::contains("$402.50"))
        .stdout(predicate::str::contains("$227.50"))
        .stdout(predicate::str::contains("Partial"));
}

#[test]
fn add_student_then_show() {
    let dir = initialized();
    feedesk(&dir)
        .args([
            "student",
            "add",
            "2906",
            "Tariro Moyo",
            "--gender",
            "female",
            "--class",
            "1",
            "--section",
            "B",
            "--dob",
            "2015-06-01",
            "--guardian",
            "Ruth Moyo",
            "--relationship",
            "mother",
            "--optional-fee",
            "boarding fee",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Enrolled student: Tariro Moyo"));

    feedesk(&dir)
        .args(["student", "show", "2906"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ruth Moyo (Mother)"))
        .stdout(predicate::str::contains("Boarding Fee"));

    feedesk(&dir)
        .args([
            "student", "add", "2906", "Someone Else", "--gender", "male", "--class", "1",
            "--dob", "2015-01-01", "--guardian", "X",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn record_and_verify_payment() {
    let dir = initialized();
    feedesk(&dir)
        .args([
            "payment",
            "record",
            "2903",
            "100",
            "--term",
            "term1-2025",
            "--date",
            "2025-05-06",
            "--by",
            "G. Sithole",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("RC-2025-0123"))
        .stdout(predicate::str::contains("Pending"));

    feedesk(&dir)
        .args(["payment", "verify", "RC-2025-0123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Verified payment RC-2025-0123: $100.00"));

    feedesk(&dir)
        .args(["payment", "verify", "RC-2025-0123"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already verified"));

    feedesk(&dir)
        .arg("audit")
        .assert()
        .success()
        .stdout(predicate::str::contains("CREATE Payment RC-2025-0123"))
        .stdout(predicate::str::contains("UPDATE Payment RC-2025-0123"));

    feedesk(&dir)
        .args(["audit", "--entity", "payment", "--id", "rc-2025-0123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Changes: status"));
}

#[test]
fn payment_history_newest_first() {
    let dir = initialized();
    let output = feedesk(&dir)
        .args(["payment", "history", "2902"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let text = String::from_utf8(output.stdout).unwrap();
    let newest = text.find("RC-2025-0122").unwrap();
    let oldest = text.find("RC-2025-0076").unwrap();
    assert!(newest < oldest);
}

#[test]
fn payment_report_totals_per_currency() {
    let dir = initialized();
    feedesk(&dir)
        .args(["report", "payments", "--currency", "zig"])
        .assert()
        .success()
        .stdout(predicate::str::contains("RC-2025-0116"))
        .stdout(predicate::str::contains("RC-2025-0114").not())
        .stdout(predicate::str::contains("Total ZIG (3 payments)"));
}

#[test]
fn payment_report_to_csv() {
    let dir = initialized();
    let out = dir.path().join("payments.csv");
    feedesk(&dir)
        .args(["report", "payments", "--status", "pending", "--output"])
        .arg(&out)
        .assert()
        .success();

    let csv = fs::read_to_string(&out).unwrap();
    assert_eq!(csv.lines().count(), 2);
    assert!(csv.contains("RC-2025-0116"));
}

#[test]
fn outstanding_report_lists_owing_students() {
    let dir = initialized();
    feedesk(&dir)
        .args(["report", "outstanding", "--term", "term1-2025", "--currency", "usd"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2902"))
        .stdout(predicate::str::contains("2903"))
        .stdout(predicate::str::contains("2901").not());
}

#[test]
fn overlapping_term_is_rejected() {
    let dir = initialized();
    feedesk(&dir)
        .args(["term", "add", "2", "2025", "--start", "2025-04-01", "--end", "2025-07-31"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("overlaps"));

    feedesk(&dir)
        .args(["term", "add", "3", "2025", "--start", "2025-09-09", "--end", "2025-12-05"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added term: Term 3, 2025"));
}

#[test]
fn users_and_roles() {
    let dir = initialized();
    feedesk(&dir)
        .args(["user", "roles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Manage fee structures"));

    feedesk(&dir)
        .args(["user", "deactivate", "gsithole"])
        .assert()
        .success();

    feedesk(&dir)
        .args(["user", "list", "--search", "sithole"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Inactive"));
}

#[test]
fn export_roster_and_database() {
    let dir = initialized();
    let students = dir.path().join("students.csv");
    let full = dir.path().join("full.json");

    feedesk(&dir)
        .args(["export", "students"])
        .arg(&students)
        .assert()
        .success();
    let csv = fs::read_to_string(&students).unwrap();
    assert!(csv.starts_with("ID,Name,Gender"));
    assert_eq!(csv.lines().count(), 6);

    feedesk(&dir)
        .args(["export", "json", "--pretty"])
        .arg(&full)
        .assert()
        .success();
    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&full).unwrap()).unwrap();
    assert_eq!(json["metadata"]["payment_count"], 8);
    assert_eq!(json["schema_version"], "1.0.0");
}

#[test]
fn config_updates_exchange_rate() {
    let dir = initialized();
    feedesk(&dir)
        .args(["config", "--rate", "3600", "--currency", "zig"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Settings saved."))
        .stdout(predicate::str::contains("1 USD = ZWL 3,600.00"))
        .stdout(predicate::str::contains("Currency:      ZIG"));
}

#[test]
fn payment_amounts_out_of_range_are_rejected() {
    let dir = initialized();
    for amount in ["99999999999999999", "10.999", "1,2,3"] {
        feedesk(&dir)
            .args(["payment", "record", "2903", amount, "--term", "term1-2025", "--by", "G. Sithole"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid amount"));
    }

    feedesk(&dir)
        .args(["payment", "history", "2903"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 payment(s)"));
}

#[test]
fn payment_receipt_shows_term_balance() {
    let dir = initialized();
    feedesk(&dir)
        .args(["payment", "receipt", "RC-2025-0122"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Official Fee Receipt"))
        .stdout(predicate::str::contains("Received From: Kazi Fahim (#2902)"))
        .stdout(predicate::str::contains("Amount:        $150.00"))
        .stdout(predicate::str::contains("Term Balance:  $227.50 (Partial)"));

    feedesk(&dir)
        .args(["payment", "show", "RC-2025-9999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("RC-2025-9999"));
}

#[test]
fn student_edit_and_delete() {
    let dir = initialized();
    feedesk(&dir)
        .args(["student", "edit", "2904", "--section", "C", "--arrears", "75"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated student: Kazi Fahim (#2904)"));

    feedesk(&dir)
        .args(["student", "list", "--class", "2", "--section", "C"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2904"))
        .stdout(predicate::str::contains("1 student(s)"));

    feedesk(&dir)
        .args(["student", "delete", "2902"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("payment(s) are recorded"));

    feedesk(&dir)
        .args([
            "student", "add", "2906", "Tatenda Moyo", "--gender", "male", "--class", "3",
            "--dob", "2011-06-01", "--guardian", "Rudo Moyo",
        ])
        .assert()
        .success();
    feedesk(&dir)
        .args(["student", "delete", "2906"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted student: Tatenda Moyo (#2906)"));

    feedesk(&dir)
        .args(["audit", "--entity", "student", "--id", "2906"])
        .assert()
        .success()
        .stdout(predicate::str::contains("DELETE Student 2906"));
}

#[test]
fn fee_term_and_user_edits() {
    let dir = initialized();
    feedesk(&dir)
        .args(["fee", "edit", "sports fee", "--usd", "30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("USD:       $30.00"));

    feedesk(&dir)
        .args(["fee", "delete", "Boarding Fee"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("opted in"));

    feedesk(&dir)
        .args(["term", "delete", "term3-2023"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted term: Term 3, 2023"));

    feedesk(&dir)
        .args(["term", "edit", "term1-2025", "--start", "2024-12-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("overlaps"));

    feedesk(&dir)
        .args(["user", "edit", "bmoyo", "--role", "head"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Role: School Head"));
}
