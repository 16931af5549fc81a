use std::fs;

use stackcalc::{error::Diagnostics, evaluate, interpreter::value::core::Value};
use walkdir::WalkDir;

#[test]
fn book_examples_work() {
    let mut count = 0;

    for entry in
        WalkDir::new("book/src").into_iter()
                                .filter_map(Result::ok)
                                .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
    {
        let path = entry.path();
        let content =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));

        for (i, code) in extract_blocks(&content).into_iter().enumerate() {
            count += 1;
            if let Err(e) = evaluate(&code) {
                panic!("Example {} in {:?} failed:\n{}\nError: {}", i + 1, path, code, e);
            }
        }
    }

    assert!(count > 0, "No stackcalc examples found in book/src");
}

fn extract_blocks(content: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut inside = false;
    let mut buf = String::new();

    for line in content.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```stackcalc") {
            inside = true;
            buf.clear();
            continue;
        }
        if inside && trimmed.starts_with("```") {
            inside = false;
            blocks.push(buf.clone());
            continue;
        }
        if inside {
            buf.push_str(line);
            buf.push('\n');
        }
    }

    blocks
}

fn assert_values(src: &str, expected: &[Value]) {
    match evaluate(src) {
        Ok(values) => assert_eq!(values, expected, "values of {src:?}"),
        Err(e) => panic!("Script {src:?} failed: {e}"),
    }
}

fn assert_value(src: &str, expected: Value) {
    assert_values(src, &[expected]);
}

fn assert_failure(src: &str) -> Diagnostics {
    match evaluate(src) {
        Ok(values) => panic!("Script {src:?} succeeded with {values:?} but was expected to fail"),
        Err(diagnostics) => {
            assert!(!diagnostics.is_empty());
            diagnostics
        },
    }
}

#[test]
fn integer_literals_evaluate_to_themselves() {
    for n in [0, 1, -1, 42, -42, 1_000_000, i64::MAX, i64::MIN] {
        assert_value(&format!("{n};"), Value::Integer(n));
    }
}

#[test]
fn decimal_literals_evaluate_to_floats() {
    for text in ["0.5", "3.25", "-2.75", "10.0", "1.", "123456.789"] {
        let expected: f64 = text.parse().unwrap();
        assert_value(&format!("{text};"), Value::Float(expected));
    }
}

#[test]
fn mixed_operands_promote_to_float() {
    assert_value("1 + 2.5;", Value::Float(3.5));
    assert_value("2.5 + 1;", Value::Float(3.5));
    assert_value("3 * 0.5;", Value::Float(1.5));
    assert_value("1.0 / 4;", Value::Float(0.25));
}

#[test]
fn parentheses_override_precedence() {
    assert_value("(1 + 2) * 3;", Value::Integer(9));
    assert_value("1 + 2 * 3;", Value::Integer(7));
    assert_value("((2));", Value::Integer(2));
    assert_value("2 * (3 + (4 - 1));", Value::Integer(12));
}

#[test]
fn integer_division_truncates_toward_zero() {
    assert_value("7 / 2;", Value::Integer(3));
    assert_value("-7 / 2;", Value::Integer(-3));
}

#[test]
fn mismatched_parentheses_fail() {
    assert_failure("(1 + 2;");
    assert_failure("1 + 2);");
    assert_failure(")1;");
}

#[test]
fn missing_terminator_fails() {
    let diagnostics = assert_failure("1 + 2");
    assert_eq!(diagnostics.to_string(),
               "statement 1 failed\n - expected semicolon, found end of input");
}

#[test]
fn same_rank_chains_drain_from_the_right() {
    // The pending operators are applied last pair first.
    assert_value("1 - 2 - 3;", Value::Integer(2));
    assert_value("8 / 4 / 2;", Value::Integer(4));
    assert_value("(1 - 2) - 3;", Value::Integer(-4));
}

#[test]
fn end_to_end_program() {
    assert_values("1 + 2 * (3 - 1) ;\n4.0 / 2 ;\n",
                  &[Value::Integer(5), Value::Float(2.0)]);
}

#[test]
fn empty_program_has_no_values() {
    assert_values("", &[]);
    assert_values("  \n\t ", &[]);
}

#[test]
fn arithmetic_failures_are_recoverable_errors() {
    let diagnostics = assert_failure("1 / 0;");
    assert_eq!(diagnostics.to_string(),
               "statement 1 failed\n - integer division by zero");

    assert_failure("9223372036854775807 + 1;");
    assert_value("1.0 / 0;", Value::Float(f64::INFINITY));
}

#[test]
fn unsupported_constructs_fail() {
    assert_failure("x;");
    assert_failure("x = 1;");
    assert_failure("1 + x;");
    assert_failure("if 1;");
    assert_failure("1 % 2;");
    assert_failure("1 += 2;");
}

#[test]
fn strings_are_not_values() {
    assert_failure("\"hello\";");
    assert_failure("\"never closed;");
}

#[test]
fn unknown_characters_fail() {
    let diagnostics = assert_failure("1 $ 2;");
    assert!(diagnostics.to_string().contains("unexpected character: '$'"));
}

#[test]
fn evaluation_stops_at_first_failure() {
    let diagnostics = assert_failure("1;\n2 +;\n3;");
    assert!(diagnostics.to_string().starts_with("statement 2 failed"));
}

#[test]
fn operator_runs_are_not_split() {
    let diagnostics = assert_failure("2*-3;");
    assert!(diagnostics.to_string().ends_with("operator `*-`: not implemented"));
    assert_value("2 * (-3);", Value::Integer(-6));
}

#[test]
fn failing_first_token_names_its_statement() {
    let diagnostics = assert_failure("1; if 2;");
    assert_eq!(diagnostics.to_string(),
               "statement 2 failed\n - keyword `if`: not implemented");

    let diagnostics = assert_failure("@;");
    assert!(diagnostics.to_string().starts_with("statement 1 failed\n - unexpected character"));
}

#[test]
fn adjacent_minus_joins_the_literal() {
    // `7-2` lexes as `7` followed by `-2`.
    assert_failure("7-2;");
    assert_value("7 - 2;", Value::Integer(5));
    assert_value("7 / (-2);", Value::Integer(-3));
}
