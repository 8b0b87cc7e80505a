//! Linting formula files on disk

use formulary::prelude::*;
use formulary::YamlError;
use std::fs;
use tempfile::TempDir;

fn write(dir: &TempDir, file: &str, formula: &str, example: &str) {
    let text = format!(
        "name: {}\nversion: 1.0.0\ndescription: test\nparameters:\n  - name: x\n    description: input\n{}formula: |\n  {}\n",
        file.trim_end_matches(".yaml").to_uppercase(),
        example,
        formula
    );
    fs::write(dir.path().join(file), text).unwrap();
}

#[test]
fn test_clean_directory() {
    let dir = TempDir::new().unwrap();
    write(&dir, "good.yaml", "SUM(x, 1) // add one", "    example: A1\n");

    let summary = Linter::new()
        .lint_dir(dir.path(), &YamlReadOptions::default())
        .unwrap();
    assert_eq!(summary.files_checked, 1);
    assert!(summary.errors.is_empty(), "{:?}", summary.errors);
    assert!(summary.warnings.is_empty());
}

#[test]
fn test_every_rule_reports() {
    let dir = TempDir::new().unwrap();
    write(&dir, "equals.yaml", "=SUM(x)", "    example: A1\n");
    write(&dir, "lambda.yaml", "LAMBDA(x, x + 1)", "    example: A1\n");
    write(&dir, "selfexec.yaml", "LAMBDA(x, IF(,,))(0)", "    example: A1\n");
    write(&dir, "noexample.yaml", "x", "");
    write(&dir, "syntax.yaml", "SUM(x,", "    example: A1\n");

    let summary = Linter::new()
        .lint_dir(dir.path(), &YamlReadOptions::default())
        .unwrap();
    assert_eq!(summary.files_checked, 5);
    assert!(summary.has_errors());

    let has_error = |prefix: &str, text: &str| {
        summary
            .errors
            .iter()
            .any(|e| e.starts_with(prefix) && e.contains(text))
    };
    assert!(has_error("equals.yaml: ", "starts with '='"));
    assert!(has_error("lambda.yaml: ", "uninvoked LAMBDA"));
    assert!(has_error("noexample.yaml: ", "'x' is missing 'example'"));
    assert!(has_error("syntax.yaml: ", "Formula syntax error"));
    assert!(!summary.errors.iter().any(|e| e.starts_with("selfexec.yaml")));

    assert_eq!(summary.warnings.len(), 1);
    assert!(summary.warnings[0].starts_with("selfexec.yaml: "));
}

#[test]
fn test_unloadable_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("broken.yaml"), "name: BROKEN\n").unwrap();
    fs::write(dir.path().join("empty.yaml"), "").unwrap();

    let summary = Linter::new()
        .lint_dir(dir.path(), &YamlReadOptions::default())
        .unwrap();
    assert_eq!(summary.files_checked, 2);
    assert_eq!(
        summary.errors,
        vec![
            "broken.yaml: Missing required field 'version'".to_string(),
            "empty.yaml: File is empty".to_string(),
        ]
    );
}

#[test]
fn test_missing_directory() {
    let dir = TempDir::new().unwrap();
    let result = Linter::new().lint_dir(dir.path().join("nope"), &YamlReadOptions::default());
    assert!(matches!(result, Err(YamlError::DirectoryNotFound(_))));
}
