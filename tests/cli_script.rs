mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;

fn cli(base: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("tutor_core_cli").unwrap();
    cmd.env("TUTOR_CORE_CLI_SCRIPT", "1")
        .env("TUTOR_CORE_HOME", base)
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn script_mode_runs_basic_flow() {
    let base = common::temp_base();
    let input = "\
teacher-add \"Dana Lee\" 40
course-add Physics 45 3
student-add \"Eve Adams\" F 2012-03-04
payment-add 3 3 5 225 card 2024-05-01
session-add 3 3 10:00 11:30 2024-05-02
students
report 2024-05-01 2024-05-31
exit
";

    cli(&base)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Started with sample data."))
        .stdout(contains("Teacher 3 added."))
        .stdout(contains("Payment 2 recorded; balance is now 5.0h."))
        .stdout(contains("Session 2 logged; balance is now 3.5h."))
        .stdout(contains("Revenue        : $225.00"))
        .stdout(contains("Teacher salary : $60.00"));

    let json = std::fs::read_to_string(base.join("data").join("tutoring_center.json")).unwrap();
    assert!(json.contains("\"Eve Adams\""));
    assert!(json.contains("\"startTime\": \"10:00\""));
}

#[test]
fn rejected_session_and_unknown_command_are_reported() {
    let base = common::temp_base();
    cli(&base)
        .write_stdin("session-add 1 1 15:00 14:00\nstudnts\n")
        .assert()
        .success()
        .stdout(contains("End must be after start"))
        .stdout(contains("Suggestion: `students`?"))
        .stdout(contains("Session 2 logged").not());
}

#[test]
fn csv_report_is_written_to_requested_path() {
    let base = common::temp_base();
    let target = base.join("report.csv");
    let input = format!("report-csv 2000-01-01 2100-12-31 {}\n", target.display());
    cli(&base)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Report written to"));
    let csv = std::fs::read_to_string(target).unwrap();
    assert!(csv.starts_with("Financial Report Summary\nPeriod: 2000-01-01 to 2100-12-31\n"));
}

#[test]
fn saving_over_existing_document_leaves_timestamped_backup() {
    let base = common::temp_base();
    let output = cli(&base)
        .write_stdin("teacher-add \"Dana Lee\" 40\nbackups\n")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let pattern = regex::Regex::new(r"tutoring_center_\d{8}_\d{6}\.json").unwrap();
    assert!(pattern.is_match(&stdout), "no backup listed in:\n{stdout}");
}
