//! End-to-end checks of the `flamegen` binary against tiny documents.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;

const STABLE_DOC: &str = r#"{
  "V": ["Spherical"],
  "F": [
    { "A": { "a": 0.70, "b": -0.14, "c": -0.61, "d": -0.05, "tx": 0.17, "ty": 0.73 }, "B": [1], "C": 0.0 },
    { "A": { "a": -0.58, "b": 0.25, "c": -0.38, "d": -0.08, "tx": -0.29, "ty": 0.40 }, "B": [1], "C": 1.0 }
  ]
}"#;

const PAIR_DOC: &str = r#"{
  "children": [
    {
      "V": ["Linear"],
      "F": [ { "A": { "a": 1.0, "b": 0.0, "c": 0.0, "d": 1.0, "tx": 0.0, "ty": 0.0 }, "B": [1], "C": 0.0 } ]
    },
    {
      "V": ["Linear"],
      "F": [ { "A": { "a": 0.5, "b": 0.0, "c": 0.0, "d": 0.5, "tx": 0.2, "ty": 0.2 }, "B": [1], "C": 1.0 } ]
    }
  ]
}"#;

const ROTATING_DOC: &str = r#"{
  "V": ["Spherical"],
  "F": [
    { "A": [ { "angle": 0.5 }, { "tx": 0.3, "ty": 0.1 } ], "B": [1], "C": 0.0 },
    { "A": { "a": -0.58, "b": 0.25, "c": -0.38, "d": -0.08, "tx": -0.29, "ty": 0.40 }, "B": [1], "C": 1.0 }
  ]
}"#;

#[test]
fn image_renders_a_png() {
    let dir = tempfile::tempdir().unwrap();
    let doc = dir.path().join("sample.ffdoc");
    fs::write(&doc, STABLE_DOC).unwrap();
    let out = dir.path().join("out.png");
    Command::cargo_bin("flamegen")
        .unwrap()
        .arg("image")
        .arg(&doc)
        .args(&["--width", "64", "--iterations", "2000"])
        .arg("--output")
        .arg(&out)
        .assert()
        .success();
    let bytes = fs::read(&out).unwrap();
    // PNG magic
    assert_eq!(&bytes[..4], &[0x89, b'P', b'N', b'G']);
}

#[test]
fn export_prints_the_table_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let doc = dir.path().join("sample.ffdoc");
    fs::write(&doc, STABLE_DOC).unwrap();
    Command::cargo_bin("flamegen")
        .unwrap()
        .arg("export")
        .arg(&doc)
        .assert()
        .success()
        .stdout(predicate::str::contains("a, b, c, d, tx, ty"))
        .stdout(predicate::str::contains("xmin"));
}

#[test]
fn search_writes_a_document_of_finds() {
    let dir = tempfile::tempdir().unwrap();
    let doc = dir.path().join("sample.ffdoc");
    fs::write(&doc, STABLE_DOC).unwrap();
    let out = dir.path().join("found.ffdoc");
    Command::cargo_bin("flamegen")
        .unwrap()
        .arg("search")
        .arg(&doc)
        .args(&[
            "--base",
            "--count",
            "1",
            "--threshold",
            "0",
            "--iterations",
            "500",
            "--width",
            "32",
        ])
        .arg("--output")
        .arg(&out)
        .assert()
        .success();
    let text = fs::read_to_string(&out).unwrap();
    assert!(text.contains("\"children\""));
    assert!(text.contains("\"0000\""));
}

#[test]
fn interpolate_writes_in_between_elements() {
    let dir = tempfile::tempdir().unwrap();
    let doc = dir.path().join("pair.ffdoc");
    fs::write(&doc, PAIR_DOC).unwrap();
    let out = dir.path().join("inter.ffdoc");
    Command::cargo_bin("flamegen")
        .unwrap()
        .arg("interpolate")
        .arg(&doc)
        .args(&["--count", "4"])
        .arg("--output")
        .arg(&out)
        .assert()
        .success();
    let text = fs::read_to_string(&out).unwrap();
    assert!(text.contains("\"children\""));
    assert!(text.contains("Linear"));
}

#[test]
fn rotate_writes_the_requested_steps() {
    let dir = tempfile::tempdir().unwrap();
    let doc = dir.path().join("spin.ffdoc");
    fs::write(&doc, ROTATING_DOC).unwrap();
    let out = dir.path().join("rotated.ffdoc");
    Command::cargo_bin("flamegen")
        .unwrap()
        .arg("rotate")
        .arg(&doc)
        .args(&["--count", "3"])
        .arg("--output")
        .arg(&out)
        .assert()
        .success();
    let text = fs::read_to_string(&out).unwrap();
    assert!(text.contains("\"angle\""));
}

#[test]
fn missing_input_fails_cleanly() {
    Command::cargo_bin("flamegen")
        .unwrap()
        .arg("image")
        .arg("/no/such/file.ffdoc")
        .assert()
        .failure();
}
