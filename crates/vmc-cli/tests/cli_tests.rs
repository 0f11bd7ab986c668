//! End-to-end tests for the vmc binary.

use std::path::Path;
use std::process::{Command, Output};

fn write_file(dir: &Path, name: &str, contents: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent");
    }
    std::fs::write(path, contents).expect("failed to write test file");
}

fn vmc(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_vmc"))
        .args(args)
        .current_dir(dir)
        .env_remove("VMC_LOG")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run vmc")
}

const CLEAN: &str = "const Card = () => null;\nCard.propTypes = { title: PropTypes.string.isRequired };\nexport default Card;\n";
const BROKEN: &str = "const List = () => null;\nList.propTypes = { items: PropTypes.array };\nexport default List;\n";

#[test]
fn clean_project_exits_zero_and_writes_models() {
    let dir = tempfile::tempdir().expect("temp dir");
    write_file(dir.path(), "src/Card.jsx", CLEAN);

    let output = vmc(dir.path(), &["--out-dir", "generated"]);
    assert_eq!(output.status.code(), Some(0), "{output:?}");

    let model = std::fs::read_to_string(dir.path().join("generated/Card.json")).expect("model");
    let value: serde_json::Value = serde_json::from_str(&model).expect("json");
    assert_eq!(value["properties"]["title"]["required"], true);
}

#[test]
fn diagnostics_exit_one_and_skip_models() {
    let dir = tempfile::tempdir().expect("temp dir");
    write_file(dir.path(), "src/Card.jsx", CLEAN);
    write_file(dir.path(), "src/List.jsx", BROKEN);

    let output = vmc(dir.path(), &["--out-dir", "generated", "--no-color"]);
    assert_eq!(output.status.code(), Some(1), "{output:?}");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("List.jsx:2:20 - error VMC9102"), "{stderr}");
    assert!(stderr.contains("Found 1 error in 1 file."), "{stderr}");
    assert!(!dir.path().join("generated").exists());
}

#[test]
fn json_format_prints_diagnostics_to_stdout() {
    let dir = tempfile::tempdir().expect("temp dir");
    write_file(dir.path(), "List.jsx", BROKEN);

    let output = vmc(dir.path(), &["--format", "json", "List.jsx"]);
    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(value.as_array().map(Vec::len), Some(1));
    assert_eq!(value[0]["code"], 9102);
    assert_eq!(value[0]["line"], 2);
}

#[test]
fn non_jsx_files_are_not_checked_by_default() {
    let dir = tempfile::tempdir().expect("temp dir");
    write_file(dir.path(), "a.js", "C.propTypes = { a: propTypes.object };\n");

    let output = vmc(dir.path(), &[]);
    assert_eq!(output.status.code(), Some(0), "{output:?}");
}

#[test]
fn config_file_sets_globs_and_fields() {
    let dir = tempfile::tempdir().expect("temp dir");
    write_file(
        dir.path(),
        "vmc.json",
        r#"{ "include": ["**/*.js"], "propTypesField": "props" }"#,
    );
    write_file(
        dir.path(),
        "Card.js",
        "Card.props = { style: PropTypes.object };\nexport default Card;\n",
    );

    let output = vmc(dir.path(), &["--no-color"]);
    assert_eq!(output.status.code(), Some(1), "{output:?}");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("VMC9101"), "{stderr}");
}

#[test]
fn bad_config_exits_two() {
    let dir = tempfile::tempdir().expect("temp dir");
    write_file(dir.path(), "vmc.json", r#"{ "include": ["src/["] }"#);

    let output = vmc(dir.path(), &[]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid glob pattern"), "{stderr}");
}

#[test]
fn missing_path_exits_two() {
    let dir = tempfile::tempdir().expect("temp dir");
    let output = vmc(dir.path(), &["does-not-exist"]);
    assert_eq!(output.status.code(), Some(2));
}
