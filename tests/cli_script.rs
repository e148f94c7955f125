use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cli() -> Command {
    Command::cargo_bin("caja_core_cli").unwrap()
}

#[test]
fn new_prints_a_catalog_json() {
    cli()
        .args(["new", "consultorio", "income"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"Income\""))
        .stdout(predicate::str::contains("consultorio"));
}

#[test]
fn unknown_commands_fail_with_usage() {
    cli()
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn add_sync_and_balances_work_against_a_file() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("consultorio.json");

    let output = cli()
        .args(["new", "consultorio", "income"])
        .output()
        .unwrap();
    std::fs::write(&file, output.stdout).unwrap();

    let file_arg = file.to_str().unwrap();
    cli().args(["add", file_arg, "Honorarios"]).assert().success();
    cli()
        .args(["add", file_arg, "Dr. Perez", "1"])
        .assert()
        .success();
    cli()
        .args(["add", file_arg, "Dr. Gomez", "1"])
        .assert()
        .success();
    cli()
        .args(["add", file_arg, "Efectivo", "1.1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 mirrored"));

    cli()
        .args(["tree", file_arg])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dr. Gomez"))
        .stdout(predicate::str::contains("1.2.1"));

    cli()
        .args(["record", file_arg, "1.1.1", "100"])
        .assert()
        .success();
    cli()
        .args(["balances", file_arg])
        .assert()
        .success()
        .stdout(predicate::str::contains("Honorarios"))
        .stdout(predicate::str::contains("100.00"));

    // Nothing left for a full reconciliation to create.
    cli()
        .args(["sync-all", file_arg])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"created\": []"));
}
