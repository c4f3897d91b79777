use serde_json::{Value, json};
use tempfile::TempDir;
use warden_config::ActionValue;
use warden_test_support::fixtures::{
    hardened_snapshot, insecure_snapshot, sample_entries, snapshot_json, write_json,
};

fn run(args: &[&str]) -> (i32, String) {
    let mut out = Vec::new();
    let code = warden_cli::run_from(
        std::iter::once("warden").chain(args.iter().copied()),
        &mut out,
    );
    (code, String::from_utf8(out).expect("utf8 output"))
}

fn path_str(path: &std::path::Path) -> &str {
    path.to_str().expect("utf8 path")
}

#[test]
fn validate_accepts_well_formed_document() {
    let dir = TempDir::new().expect("tempdir");
    let document = ActionValue::new(sample_entries())
        .to_document()
        .expect("document");
    let file = write_json(
        dir.path(),
        "actions.json",
        &serde_json::to_value(&document).expect("encode"),
    )
    .expect("write");

    let (code, out) = run(&["actions", "validate", path_str(&file), "--required"]);
    assert_eq!(code, 0);
    assert_eq!(out.trim(), "ok");
}

#[test]
fn validate_reports_duplicates_with_exit_two() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_json(
        dir.path(),
        "dupes.json",
        &json!([
            {"name": "Foo", "type": "directory", "attributeName": "cn", "attributeValue": "1"},
            {"name": "foo", "type": "directory", "attributeName": "sn", "attributeValue": "2"}
        ]),
    )
    .expect("write");

    let (code, out) = run(&["actions", "validate", path_str(&file), "--format", "json"]);
    assert_eq!(code, 2);
    let value: Value = serde_json::from_str(&out).expect("json output");
    assert_eq!(value["valid"], false);
    assert_eq!(value["message"], "each action name must be unique: foo");
}

#[test]
fn validate_required_empty_value() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_json(dir.path(), "empty.json", &Value::Null).expect("write");
    let (code, out) = run(&["actions", "validate", path_str(&file), "--required"]);
    assert_eq!(code, 2);
    assert_eq!(out.trim(), "required value missing");
}

#[test]
fn malformed_document_exits_one() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_json(dir.path(), "bad.json", &json!([{"type": "carrier-pigeon"}]))
        .expect("write");
    let (code, out) = run(&["actions", "validate", path_str(&file)]);
    assert_eq!(code, 1);
    assert!(out.is_empty());
}

#[test]
fn missing_file_exits_one() {
    let dir = TempDir::new().expect("tempdir");
    let missing = dir.path().join("absent.json");
    let (code, _) = run(&["actions", "describe", path_str(&missing)]);
    assert_eq!(code, 1);
}

#[test]
fn describe_renders_display_and_api_forms() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_json(
        dir.path(),
        "legacy.json",
        &json!({"syntax": "STRING_ARRAY", "values": [{"text": "cn=x"}, {"locale": "de", "text": "sn=y"}]}),
    )
    .expect("write");

    let (code, out) = run(&["actions", "describe", path_str(&file)]);
    assert_eq!(code, 0);
    assert_eq!(
        out.trim(),
        "Action-directory: [Directory: method=replace attribute=cn value=x]"
    );

    let (code, out) = run(&["actions", "describe", path_str(&file), "--api"]);
    assert_eq!(code, 0);
    let value: Value = serde_json::from_str(&out).expect("json output");
    assert_eq!(value[0]["name"], "cn");
    assert_eq!(value[0]["type"], "directory");
}

#[test]
fn audit_prints_findings_table() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_json(
        dir.path(),
        "snapshot.json",
        &snapshot_json(&insecure_snapshot()).expect("snapshot"),
    )
    .expect("write");

    let (code, out) = run(&["audit", path_str(&file), "--mode", "configuration"]);
    assert_eq!(code, 0);
    let lines = out.lines().collect::<Vec<_>>();
    assert!(lines[0].starts_with("SEVERITY"));
    assert_eq!(lines.len(), 14);
    assert!(lines[1].contains("configuration mode"));
}

#[test]
fn audit_json_for_clean_snapshot_is_empty() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_json(
        dir.path(),
        "snapshot.json",
        &snapshot_json(&hardened_snapshot()).expect("snapshot"),
    )
    .expect("write");

    let (code, out) = run(&["audit", path_str(&file), "--format", "json"]);
    assert_eq!(code, 0);
    let value: Value = serde_json::from_str(&out).expect("json output");
    assert_eq!(value, json!([]));
}
