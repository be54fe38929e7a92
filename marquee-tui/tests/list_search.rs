mod common;
use common::TestEnv;

fn list_json(t: &TestEnv, args: &[&str]) -> Vec<serde_json::Value> {
    let out = t
        .bin()
        .arg("--manifest")
        .arg(&t.manifest)
        .arg("list")
        .arg("--json")
        .args(args)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    v.as_array().unwrap().clone()
}

#[test]
fn list_without_search_returns_every_item_in_order() {
    let t = TestEnv::new();
    let items = list_json(&t, &[]);
    let idx: Vec<u64> = items.iter().map(|e| e["index"].as_u64().unwrap()).collect();
    assert_eq!(idx, vec![0, 1, 2, 3]);
    // listing never authorizes a poster
    assert!(items.iter().all(|e| e["loaded"] == serde_json::Value::Bool(false)));
}

#[test]
fn search_keeps_catalog_indices() {
    let t = TestEnv::new();
    let items = list_json(&t, &["--search", "big"]);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["index"], 1);
    assert_eq!(items[0]["name"], "Big Fat Greek Wedding");
    assert_eq!(items[0]["poster_path"], "poster2.jpg");
}

#[test]
fn search_is_case_insensitive() {
    let t = TestEnv::new();
    let upper = list_json(&t, &["--search", "ROM"]);
    let lower = list_json(&t, &["--search", "rom"]);
    assert_eq!(upper, lower);
    assert_eq!(upper.len(), 2);
}

#[test]
fn plain_output_is_tab_separated() {
    let t = TestEnv::new();
    t.bin()
        .arg("--manifest")
        .arg(&t.manifest)
        .args(["list", "--search", "hill"])
        .assert()
        .success()
        .stdout("0\tNotting Hill\tposter1.jpg\n");
}
