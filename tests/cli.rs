use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn hospital(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("hospital").unwrap();
    cmd.env_remove("RUST_LOG")
        .env("HOSPITAL_REPORTS_DIR", dir.path());
    cmd
}

fn seeded() -> TempDir {
    let dir = TempDir::new().unwrap();
    hospital(&dir)
        .args(["init", "--sample"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sample data written"));
    dir
}

#[test]
fn report_list_names_every_report() {
    let dir = TempDir::new().unwrap();
    hospital(&dir)
        .args(["report", "list"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("doctor-workload")
                .and(predicate::str::contains("patient-status"))
                .and(predicate::str::contains("department-financials"))
                .and(predicate::str::contains("high-value-patients")),
        );
}

#[test]
fn describe_shows_parameters() {
    let dir = TempDir::new().unwrap();
    hospital(&dir)
        .args(["report", "describe", "high_value_patients"])
        .assert()
        .success()
        .stdout(predicate::str::contains("TotalSpent").and(predicate::str::contains("status")));
}

#[test]
fn run_report_as_csv() {
    let dir = seeded();
    hospital(&dir)
        .args(["report", "run", "department-financials", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "DepartmentID,DepartmentName,DoctorCount,AppointmentCount,TotalRevenue,\
             AvgRevenuePerAppointment,CollectedRevenue,CollectionRate\n2,Neurology,",
        ));
}

#[test]
fn run_report_is_repeatable() {
    let dir = seeded();
    let run = || {
        hospital(&dir)
            .args(["report", "run", "patient-status", "-f", "json"])
            .output()
            .unwrap()
            .stdout
    };
    let first = run();
    assert!(!first.is_empty());
    assert_eq!(first, run());
}

#[test]
fn run_report_with_parameters() {
    let dir = seeded();
    hospital(&dir)
        .args([
            "report",
            "run",
            "doctor-workload",
            "--param",
            "department=1",
            "-p",
            "from=2024-02-01",
            "--format",
            "json",
        ])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Dr. Alice Moreno")
                .and(predicate::str::contains("Dr. Rahul Mehta").not()),
        );
}

#[test]
fn run_report_writes_output_file() {
    let dir = seeded();
    let target = dir.path().join("out").join("high-value.yaml");
    hospital(&dir)
        .args(["report", "run", "high-value-patients", "-f", "yaml", "-o"])
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 15 row(s)"));

    let text = std::fs::read_to_string(&target).unwrap();
    assert!(text.starts_with("# hospital-reports: high-value-patients"));
}

#[test]
fn unknown_report_fails() {
    let dir = seeded();
    hospital(&dir)
        .args(["report", "run", "bed-occupancy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn invalid_parameter_fails() {
    let dir = seeded();
    hospital(&dir)
        .args(["report", "run", "patient-status", "--param", "doctor=404"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid parameter"));

    hospital(&dir)
        .args(["report", "run", "patient-status", "--param", "from"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected name=value"));
}

#[test]
fn missing_dataset_is_source_unavailable() {
    let dir = TempDir::new().unwrap();
    hospital(&dir)
        .args(["report", "run", "doctor-workload"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("source unavailable"));
}

#[test]
fn check_and_schema() {
    let dir = seeded();
    hospital(&dir)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("no integrity issues"));

    hospital(&dir)
        .arg("schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("CREATE TABLE Billing"));
}

#[test]
fn data_dir_flag_overrides_environment() {
    let env_dir = TempDir::new().unwrap();
    let flag_dir = TempDir::new().unwrap();
    hospital(&env_dir)
        .args(["init", "--data-dir"])
        .arg(flag_dir.path())
        .assert()
        .success();

    assert!(flag_dir.path().join("data").join("doctors.json").exists());
    assert!(!env_dir.path().join("data").exists());
}

#[test]
fn init_force_replaces_corrupt_settings() {
    let dir = seeded();
    let settings = dir.path().join("config.json");
    std::fs::write(&settings, "{ not json").unwrap();

    hospital(&dir)
        .args(["report", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse settings file"));

    hospital(&dir)
        .args(["init", "--force"])
        .assert()
        .success()
        .stderr(predicate::str::contains("replacing unreadable settings"));

    let text = std::fs::read_to_string(&settings).unwrap();
    assert!(serde_json::from_str::<serde_json::Value>(&text).is_ok());
    hospital(&dir).args(["report", "list"]).assert().success();
}
