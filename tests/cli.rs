use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SAMPLE: &str = "\
Flujo,Ingresos,Costos Directos,Costos Indirectos
Packaging,10000,4000,1000
Shipping,2000,1500,1000
";

fn lean(config_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("lean").unwrap();
    cmd.env("LEAN_CONFIG_DIR", config_dir).env("NO_COLOR", "1");
    cmd
}

fn write_sample(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path.to_string_lossy().to_string()
}

#[test]
fn show_prints_streams_and_totals() {
    let dir = TempDir::new().unwrap();
    let file = write_sample(&dir, "flujos.csv", SAMPLE);
    lean(dir.path())
        .args(["show", &file])
        .assert()
        .success()
        .stdout(predicate::str::contains("Packaging"))
        .stdout(predicate::str::contains("$5,000.00"))
        .stdout(predicate::str::contains("HIGH"))
        .stdout(predicate::str::contains("$12,000.00"));
}

#[test]
fn show_rejects_missing_columns() {
    let dir = TempDir::new().unwrap();
    let file = write_sample(&dir, "bad.csv", "Flujo,Ingresos\nA,100\n");
    lean(dir.path())
        .args(["show", &file])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "The file must contain the columns: Costos Directos, Costos Indirectos",
        ));
}

#[test]
fn simulate_exports_scenario_file() {
    let dir = TempDir::new().unwrap();
    let file = write_sample(&dir, "flujos.csv", SAMPLE);
    let out = dir.path().join("out");
    lean(dir.path())
        .args(["config", "--export-dir", &out.to_string_lossy()])
        .assert()
        .success();

    lean(dir.path())
        .args(["simulate", &file, "--scenario", "optimistic", "--export"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Optimistic (+20%)"));

    let written = fs::read_to_string(out.join("escenario_optimista.csv")).unwrap();
    let mut lines = written.lines();
    assert!(lines.next().unwrap().starts_with("Flujo,Ingresos,"));
    assert!(lines.next().unwrap().starts_with("Packaging,12000,4000,1000,7000,"));
}

#[test]
fn simulate_rejects_out_of_range_percent() {
    let dir = TempDir::new().unwrap();
    let file = write_sample(&dir, "flujos.csv", SAMPLE);
    lean(dir.path())
        .args(["simulate", &file, "--percent", "-60"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("between -50% and 50%"));
}

#[test]
fn simulate_empty_file_reports_empty_ledger() {
    let dir = TempDir::new().unwrap();
    let file = write_sample(
        &dir,
        "empty.csv",
        "Flujo,Ingresos,Costos Directos,Costos Indirectos\n",
    );
    lean(dir.path())
        .args(["simulate", &file, "--percent", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No value streams yet"));
}

#[test]
fn export_writes_ledger_csv_that_reimports() {
    let dir = TempDir::new().unwrap();
    let file = write_sample(&dir, "flujos.csv", SAMPLE);
    let out = dir.path().join("export.csv");
    lean(dir.path())
        .args(["export", &file, "--output", &out.to_string_lossy()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 2 value streams"));

    let content = fs::read_to_string(&out).unwrap();
    assert!(content.contains("Shipping,2000,1500,1000,-500,"));

    lean(dir.path())
        .args(["show", &out.to_string_lossy()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Shipping"));
}

#[test]
fn strict_mode_rejects_duplicate_names_in_import() {
    let dir = TempDir::new().unwrap();
    let file = write_sample(
        &dir,
        "dupes.csv",
        "Flujo,Ingresos,Costos Directos,Costos Indirectos\nA,100,0,0\nA,200,0,0\n",
    );
    lean(dir.path())
        .args(["show", &file])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'A' already exists"));

    lean(dir.path())
        .args(["config", "--strict", "false"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Strict validation: off"));

    lean(dir.path()).args(["show", &file]).assert().success();
}
