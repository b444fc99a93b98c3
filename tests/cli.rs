use assert_cmd::Command;
use kube_tadm::analyzer::location::file_location;
use kube_tadm::handlers::{FileModelStore, ModelStore};
use kube_tadm::model::{DeploymentModelContent, TechnologySpecificDeploymentModel};
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;
use uuid::Uuid;

fn fixture(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/shop")
        .join(name)
}

fn kube_tadm(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("kube-tadm").unwrap();
    cmd.current_dir(dir.path()).env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_trace_prints_coverage() {
    let dir = TempDir::new().unwrap();
    kube_tadm(&dir)
        .arg("trace")
        .arg(fixture("order.yaml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Coverage: 37/41 lines"))
        .stdout(predicate::str::contains("Deployment"))
        .stdout(predicate::str::contains("order"));
}

#[test]
fn test_trace_json() {
    let dir = TempDir::new().unwrap();
    let output = kube_tadm(&dir)
        .args(["trace", "--json"])
        .arg(fixture("payment.yaml"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["deployments"][0]["name"], "payment");
    assert_eq!(json["services"][0]["name"], "billing-api");
    assert_eq!(json["documents"].as_array().unwrap().len(), 2);
}

#[test]
fn test_analyze_updates_store() {
    let dir = TempDir::new().unwrap();
    let store = FileModelStore::new(dir.path().join("models"));
    let process = Uuid::new_v4();
    let location = file_location(&fixture("payment.yaml"));

    let mut tsdm = TechnologySpecificDeploymentModel::new(process, "kubernetes");
    tsdm.content.push(DeploymentModelContent {
        location: location.clone(),
        lines: Vec::new(),
    });
    store.update_technology_specific_model(&tsdm).unwrap();

    kube_tadm(&dir)
        .arg("analyze")
        .arg("--store")
        .arg(store.root())
        .args(["--process", &process.to_string(), &location])
        .assert()
        .success()
        .stdout(predicate::str::contains("Components added: 1"));

    let tadm = store.technology_agnostic_model(process).unwrap();
    assert_eq!(tadm.components[0].name, "payment");
}

#[test]
fn test_analyze_without_model_fails() {
    let dir = TempDir::new().unwrap();
    kube_tadm(&dir)
        .arg("analyze")
        .arg("--store")
        .arg(dir.path())
        .args([
            "--process",
            &Uuid::new_v4().to_string(),
            "file:/k8s/order.yaml",
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "No technology-specific deployment model found",
        ));
}

#[test]
fn test_invalid_config_file_fails() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("broken.toml");
    std::fs::write(&config, "[relations\n").unwrap();

    kube_tadm(&dir)
        .arg("--config")
        .arg(&config)
        .arg("trace")
        .arg(fixture("order.yaml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}
