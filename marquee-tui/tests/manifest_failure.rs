mod common;
use common::TestEnv;
use predicates::prelude::*;

#[test]
fn unreadable_manifest_yields_empty_catalog() {
    let t = TestEnv::new();
    let out = t
        .bin()
        .arg("--manifest")
        .arg(t.missing_path())
        .args(["list", "--json"])
        .assert()
        .success()
        .stderr(predicate::str::contains("manifest unavailable"))
        .get_output()
        .stdout
        .clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert!(v.as_array().unwrap().is_empty());
}

#[test]
fn malformed_manifest_yields_empty_catalog() {
    let t = TestEnv::new();
    std::fs::write(&t.manifest, r#"{"page": {"items": []}}"#).unwrap();
    t.bin()
        .arg("--manifest")
        .arg(&t.manifest)
        .arg("list")
        .assert()
        .success()
        .stdout("");
}
