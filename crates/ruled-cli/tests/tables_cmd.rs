use assert_cmd::Command;
use predicates::prelude::*;

const DUMP: &str = r#"{
    "document": "report.pdf",
    "pages": [{
        "width": 200.0, "height": 300.0,
        "rects": [
            {"bbox": [20.0, 100.0, 120.0, 101.0], "color": [0.0, 0.0, 0.0]},
            {"bbox": [20.0, 150.0, 120.0, 151.0], "color": [0.0, 0.0, 0.0]},
            {"bbox": [20.0, 100.0, 21.0, 150.0], "color": [0.0, 0.0, 0.0]},
            {"bbox": [120.0, 100.0, 121.0, 150.0], "color": [0.0, 0.0, 0.0]}
        ],
        "glyphs": [
            {"bbox": [40.0, 115.0, 70.0, 125.0], "text": "inside",
             "font": {"name": "Times", "size": 10.0}}
        ]
    }]
}"#;

#[test]
fn tables_lists_codes() {
    let dir = tempfile::tempdir().unwrap();
    let dump = dir.path().join("report.dump.json");
    std::fs::write(&dump, DUMP).unwrap();

    Command::cargo_bin("ruled")
        .unwrap()
        .args(["tables"])
        .arg(&dump)
        .assert()
        .success()
        .stdout(predicate::str::contains("report_S01_P001_T001BR"))
        .stdout(predicate::str::contains("1x1"));
}

#[test]
fn tables_reports_empty_documents() {
    let dir = tempfile::tempdir().unwrap();
    let dump = dir.path().join("empty.dump.json");
    std::fs::write(
        &dump,
        r#"{"document": "empty.pdf", "pages": [{"width": 200.0, "height": 300.0}]}"#,
    )
    .unwrap();

    Command::cargo_bin("ruled")
        .unwrap()
        .args(["tables"])
        .arg(&dump)
        .assert()
        .success()
        .stdout(predicate::str::contains("No tables found."));
}
