use std::io::Write;

use stackcalc::{
    driver::{RunOptions, run_source},
    error::SourceError,
    source::Source,
};
use tempfile::NamedTempFile;

fn program(text: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(text).expect("write program");
    file
}

fn run_file(file: &NamedTempFile, options: &RunOptions) -> (bool, String, String) {
    let source = Source::open(file.path()).expect("open program");
    let mut out = Vec::new();
    let mut err = Vec::new();
    let ok = run_source(&source, options, &mut out, &mut err).expect("write to buffers");

    (ok, String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
}

#[test]
fn evaluates_a_file_in_order() {
    let file = program(b"1 + 2 * (3 - 1) ;\n4.0 / 2 ;\n");
    let (ok, out, err) = run_file(&file, &RunOptions::default());

    assert!(ok);
    assert_eq!(out, "5\n2.0\n");
    assert!(err.is_empty());
}

#[test]
fn failure_names_the_file_and_position() {
    let file = program(b"1;\n2;\n  3 +\n");
    let (ok, out, err) = run_file(&file, &RunOptions::default());

    assert!(!ok);
    assert_eq!(out, "1\n2\n");
    let name = file.path().display().to_string();
    assert_eq!(err,
               format!("error: statement 3 failed\n - bad expression: missing operand for `+`\n  --> {name}:4:1\n"));
}

#[test]
fn lexical_error_points_past_the_character() {
    let file = program(b"1 @ 2;");
    let (ok, _, err) = run_file(&file, &RunOptions::default());

    assert!(!ok);
    assert!(err.starts_with("error: statement 1 failed\n - unexpected character: '@' (0x40)\n"));
    assert!(err.ends_with(":1:4\n"));
}

#[test]
fn keep_going_evaluates_remaining_statements() {
    let file = program(b"1 / 0;\n2 * 3;\nfoo = 1;\n(4;\n5;\n");
    let options = RunOptions { keep_going: true,
                               ..RunOptions::default() };
    let (ok, out, err) = run_file(&file, &options);

    assert!(!ok);
    assert_eq!(out, "6\n5\n");
    assert_eq!(err.matches("error: ").count(), 3);
    assert!(err.contains("integer division by zero"));
    assert!(err.contains("assignment to `foo`: not implemented"));
    assert!(err.contains("'(' is never closed"));
}

#[test]
fn depth_limit_is_configurable() {
    let file = program(b"1 + 2 * 3;\n");

    let tight = RunOptions { max_depth: 1,
                             ..RunOptions::default() };
    let (ok, _, err) = run_file(&file, &tight);
    assert!(!ok);
    assert!(err.contains("expression too complex: more than 1 pending operands or operators"));

    let (ok, out, _) = run_file(&file, &RunOptions::default());
    assert!(ok);
    assert_eq!(out, "7\n");
}

#[test]
fn invalid_utf8_is_reported_where_it_occurs() {
    let file = program(b"1;\n2 \xff;\n3;\n");
    let (ok, out, err) = run_file(&file, &RunOptions::default());

    assert!(!ok);
    assert_eq!(out, "1\n");
    assert!(err.starts_with("error: statement 2 failed\n - unexpected character: '\\u{fffd}' (0xff)\n"),
            "{err}");
    assert!(err.ends_with(":2:4\n"), "{err}");
}

#[test]
fn keep_going_skips_past_invalid_utf8() {
    let file = program(b"\xfe\xff 1;\n2;\n");
    let options = RunOptions { keep_going: true,
                               ..RunOptions::default() };
    let (ok, out, err) = run_file(&file, &options);

    assert!(!ok);
    assert_eq!(out, "2\n");
    assert!(err.contains("(0xfe)"));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("missing.calc");

    let error = Source::open(&path).unwrap_err();
    assert!(matches!(error, SourceError::Io { .. }));
    assert!(error.to_string().contains("missing.calc"));
}
