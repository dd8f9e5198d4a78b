//! CLI integration tests for the `mml` binary.
//!
//! Uses `assert_cmd` to spawn the binary and verify exit codes, stdout
//! content, and stderr content. Fixtures are exchange JSON documents
//! written into a fresh temporary directory per test.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn mml() -> Command {
    let mut cmd = cargo_bin_cmd!("mml");
    cmd.env_remove("RUST_LOG");
    cmd
}

fn write(dir: &TempDir, name: &str, value: &Value) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}

fn modifiers() -> Value {
    json!({
        "readonly": false, "volatile": false, "transient": false, "unsettable": false,
        "derived": false, "unique": true, "ordered": true
    })
}

fn reference(id: &str, name: &str, target: &str, opposite: Option<&str>) -> Value {
    let mut mods = modifiers();
    mods["resolve"] = json!(true);
    mods["containment"] = json!(false);
    let mut r = json!({
        "id": id, "name": name, "type": target,
        "multiplicity": {
            "hasUpperBound": false, "lower": 1, "lowerIsN": false, "lowerIsN0": false,
            "upper": 1, "upperIsN": false, "upperIsN0": false
        },
        "modifiers": mods,
        "hasOpposite": opposite.is_some()
    });
    if let Some(o) = opposite {
        r["opposite"] = json!(o);
    }
    r
}

fn class(id: &str, name: &str, references: Vec<Value>, extends: Vec<&str>) -> Value {
    json!({
        "id": id, "name": name, "isAbstract": false, "isInterface": false,
        "attributes": [], "references": references,
        "extendsIds": extends, "implementsIds": []
    })
}

/// `package A { class B { attribute int x; } class C { } }`
fn model_a() -> Value {
    let mut attr_mods = modifiers();
    attr_mods["id"] = json!(false);
    let mut b = class("m::Class::/packages@0/classes@0", "B", vec![], vec![]);
    b["attributes"] = json!([{
        "id": "m::Attribute::/packages@0/classes@0/attributes@0",
        "name": "x", "type": "int", "isEnumType": false, "hasDefaultValue": false,
        "modifiers": attr_mods
    }]);
    json!({
        "typegraph": { "packages": [{
            "id": "m::Package::/packages@0", "name": "A",
            "subPackages": [], "enums": [],
            "abstractClasses": [b, class("m::Class::/packages@0/classes@1", "C", vec![], vec![])]
        }]}
    })
}

/// `Other.D`, which extends `extends` and references `A.C` from [`model_a`].
fn model_b(extends: &str) -> Value {
    json!({
        "typegraph": { "packages": [{
            "id": "n::Package::/packages@0", "name": "Other",
            "subPackages": [], "enums": [],
            "abstractClasses": [class(
                "n::Class::/packages@0/classes@0", "D",
                vec![reference("n::Reference::/packages@0/classes@0/references@0", "c",
                    "m::Class::/packages@0/classes@1", None)],
                vec![extends]
            )]
        }]}
    })
}

fn patterns(invoked_node: &str) -> Value {
    json!({
        "patterns": [{
            "id": "g::Pattern::/patterns@0", "name": "p",
            "nodes": [
                { "id": "g::PatternObject::/patterns@0/objects@0", "name": "b", "className": "A.B" },
                { "id": "g::PatternObject::/patterns@0/objects@1", "name": "c", "className": "A.C" }
            ],
            "edges": [{
                "fromId": "g::PatternObject::/patterns@0/objects@0",
                "toId": "g::PatternObject::/patterns@0/objects@1",
                "referenceName": "x"
            }],
            "pac": [{
                "patternId": "g::Pattern::/patterns@0",
                "bindings": [{
                    "nodeId": "g::PatternObject::/patterns@0/objects@0",
                    "invokedNodeId": invoked_node
                }]
            }],
            "nac": []
        }]
    })
}

// ──────────────────────────────────────────────
// 1. Help and version
// ──────────────────────────────────────────────

#[test]
fn help_exits_0_with_description() {
    mml()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Model graph codec"));
}

#[test]
fn version_exits_0() {
    mml()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mml"));
}

#[test]
fn decode_without_files_fails() {
    mml().arg("decode").assert().failure();
}

// ──────────────────────────────────────────────
// 2. Decode subcommand
// ──────────────────────────────────────────────

#[test]
fn decode_renders_canonical_text() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "a.json", &model_a());
    mml()
        .arg("decode")
        .arg(&file)
        .assert()
        .success()
        .stdout(
            "package A {\n    class B {\n        attribute int x;\n    }\n    class C {\n    }\n}\n",
        );
}

#[test]
fn decode_honours_indent() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "a.json", &model_a());
    mml()
        .args(["--indent", "2", "decode"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("  class B {\n    attribute int x;"));
}

#[test]
fn decode_resolves_names_across_files() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.json", &model_a());
    let b = write(&dir, "b.json", &model_b("m::Class::/packages@0/classes@0"));
    mml()
        .arg("decode")
        .arg(&a)
        .arg(&b)
        .assert()
        .success()
        .stdout(predicate::str::contains("class D extends A.B {"))
        .stdout(predicate::str::contains("reference A.C[1] c;"));
}

#[test]
fn decode_json_lists_file_and_text() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "a.json", &model_a());
    let out = mml()
        .args(["--output", "json", "decode"])
        .arg(&file)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let parsed: Value = serde_json::from_slice(&out).unwrap();
    let entries = parsed.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert!(entries[0]["file"].as_str().unwrap().ends_with("a.json"));
    assert!(entries[0]["text"].as_str().unwrap().starts_with("package A {"));
}

#[test]
fn decode_unknown_id_renders_placeholder() {
    let dir = TempDir::new().unwrap();
    let b = write(&dir, "b.json", &model_b("m::Class::/packages@0/classes@0"));
    mml()
        .arg("decode")
        .arg(&b)
        .assert()
        .success()
        .stdout(predicate::str::contains("class D extends $$UNKNOWN$$ {"));
}

#[test]
fn decode_missing_file_exits_1() {
    mml()
        .args(["decode", "does/not/exist.json"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("cannot read"));
}

#[test]
fn decode_malformed_json_exits_1() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, "{ not json").unwrap();
    mml()
        .arg("decode")
        .arg(&path)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid JSON"));
}

#[test]
fn decode_without_typegraph_exits_1() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "p.json", &patterns("x"));
    mml()
        .arg("decode")
        .arg(&file)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("typegraph"));
}

#[test]
fn quiet_suppresses_error_message() {
    mml()
        .args(["--quiet", "decode", "does/not/exist.json"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::is_empty());
}

#[test]
fn json_errors_are_json() {
    let out = mml()
        .args(["--output", "json", "decode", "does/not/exist.json"])
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();
    let parsed: Value = serde_json::from_slice(&out).unwrap();
    assert!(parsed["error"].as_str().unwrap().contains("cannot read"));
}

// ──────────────────────────────────────────────
// 3. Names subcommand
// ──────────────────────────────────────────────

#[test]
fn names_prints_tab_separated_table() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "a.json", &model_a());
    mml()
        .arg("names")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("m::Package::/packages@0\tA\n"))
        .stdout(predicate::str::contains("m::Class::/packages@0/classes@1\tA.C\n"));
}

#[test]
fn names_json_is_an_object() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "b.json", &model_b("m::Class::/packages@0/classes@0"));
    let out = mml()
        .args(["--output", "json", "names"])
        .arg(&file)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let parsed: Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(parsed["n::Class::/packages@0/classes@0"], "Other.D");
    assert_eq!(
        parsed["n::Reference::/packages@0/classes@0/references@0"],
        "Other.D::c"
    );
}

#[test]
fn names_json_keeps_registration_order() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "a.json", &model_a());
    let out = mml()
        .args(["--output", "json", "names"])
        .arg(&file)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(out).unwrap();
    let package = stdout.find("\"m::Package::/packages@0\"").unwrap();
    let class_b = stdout.find("\"m::Class::/packages@0/classes@0\"").unwrap();
    let class_c = stdout.find("\"m::Class::/packages@0/classes@1\"").unwrap();
    assert!(package < class_b && class_b < class_c);
}

// ──────────────────────────────────────────────
// 4. Check subcommand
// ──────────────────────────────────────────────

#[test]
fn check_clean_documents_exits_0() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.json", &model_a());
    let b = write(&dir, "b.json", &model_b("m::Class::/packages@0/classes@0"));
    let p = write(&dir, "p.json", &patterns("g::PatternObject::/patterns@0/objects@0"));
    mml()
        .arg("check")
        .args([&a, &b, &p])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 file(s) checked, no findings"));
}

#[test]
fn check_reports_dangling_reference() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.json", &model_a());
    let b = write(&dir, "b.json", &model_b("$$ERROR$$"));
    mml()
        .arg("check")
        .args([&a, &b])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains(
            "Other.D: extended type is a dangling reference",
        ));
}

#[test]
fn check_reports_unknown_id() {
    let dir = TempDir::new().unwrap();
    let b = write(&dir, "b.json", &model_b("m::Class::/packages@0/classes@0"));
    mml()
        .arg("check")
        .arg(&b)
        .assert()
        .failure()
        .stdout(predicate::str::contains("has unknown id 'm::Class::/packages@0/classes@0'"));
}

#[test]
fn check_reports_unknown_binding() {
    let dir = TempDir::new().unwrap();
    let p = write(&dir, "p.json", &patterns("UNKNOWN"));
    let out = mml()
        .args(["--output", "json", "check"])
        .arg(&p)
        .assert()
        .failure()
        .get_output()
        .stdout
        .clone();
    let report: Value = serde_json::from_slice(&out).unwrap();
    let findings = report["findings"].as_array().unwrap();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0]["entity_id"], "g::Pattern::/patterns@0");
    assert!(findings[0]["message"]
        .as_str()
        .unwrap()
        .contains("has no invoked node"));
}

#[test]
fn check_rejects_unrecognized_document() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "x.json", &json!({ "something": [] }));
    mml()
        .arg("check")
        .arg(&file)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("neither a model document"));
}
