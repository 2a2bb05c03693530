//! Integration tests for the `jsonmore` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the cat, count,
//! get and find subcommands through the actual binary, including stdin/stdout
//! piping, file I/O, read limits and error exits.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: path to the events.jsonl fixture.
fn events_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/events.jsonl")
}

fn jsonmore() -> Command {
    Command::cargo_bin("jsonmore").unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// cat
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn cat_stdin_to_stdout() {
    jsonmore()
        .arg("cat")
        .write_stdin("{\"b\": 1, \"a\": [1, 2.5]}  \"x\"\n7")
        .assert()
        .success()
        .stdout("{\"b\":1,\"a\":[1,2.5]}\n\"x\"\n7\n");
}

#[test]
fn cat_file_one_value_per_line() {
    let output = jsonmore()
        .args(["cat", "-i", events_path()])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(first["seq"], 1);
}

#[test]
fn cat_pretty_to_file() {
    let output_path = "/tmp/jsonmore-test-cat-output.json";
    let _ = std::fs::remove_file(output_path);

    jsonmore()
        .args(["cat", "--pretty", "-o", output_path])
        .write_stdin("{\"a\":{\"b\":1}}")
        .assert()
        .success()
        .stdout("");

    let content = std::fs::read_to_string(output_path).expect("output file must exist");
    assert_eq!(content, "{\n  \"a\": {\n    \"b\": 1\n  }\n}\n");

    let _ = std::fs::remove_file(output_path);
}

#[test]
fn cat_malformed_input_fails_after_earlier_values() {
    jsonmore()
        .arg("cat")
        .write_stdin("[1] {\"a\":2} [1,,2] [3]")
        .assert()
        .failure()
        .stdout("[1]\n{\"a\":2}\n")
        .stderr(predicate::str::contains("Failed to read JSON value"));
}

#[test]
fn cat_to_file_keeps_values_before_error() {
    let output_path = "/tmp/jsonmore-test-cat-partial.json";
    let _ = std::fs::remove_file(output_path);

    jsonmore()
        .args(["cat", "-o", output_path])
        .write_stdin("[1] [2] [3")
        .assert()
        .failure()
        .stderr(predicate::str::contains("end of stream"));

    let content = std::fs::read_to_string(output_path).expect("output file must exist");
    assert_eq!(content, "[1]\n[2]\n");

    let _ = std::fs::remove_file(output_path);
}

#[test]
fn cat_empty_stdin_is_silent() {
    jsonmore()
        .arg("cat")
        .env("RUST_LOG", "trace")
        .write_stdin("")
        .assert()
        .success()
        .stdout("")
        .stderr("");
}

#[test]
fn cat_truncated_input_fails() {
    jsonmore()
        .arg("cat")
        .write_stdin("{\"a\": [1, 2")
        .assert()
        .failure()
        .stderr(predicate::str::contains("end of stream"));
}

#[test]
fn cat_respects_max_bytes() {
    jsonmore()
        .args(["--max-bytes", "16", "cat", "-i", events_path()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("16-byte read limit"));
}

#[test]
fn cat_respects_max_depth() {
    jsonmore()
        .args(["cat", "--max-depth", "2"])
        .write_stdin("[[[1]]]")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nesting deeper than 2"));
}

#[test]
fn cat_deep_nesting_within_default_limit() {
    let depth = 400;
    let input = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
    jsonmore()
        .arg("cat")
        .write_stdin(input.clone())
        .assert()
        .success()
        .stdout(format!("{input}\n"));
}

#[test]
fn missing_input_file_fails() {
    jsonmore()
        .args(["cat", "-i", "/nonexistent/events.jsonl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

// ─────────────────────────────────────────────────────────────────────────────
// count
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn count_file() {
    jsonmore()
        .args(["count", "-i", events_path()])
        .assert()
        .success()
        .stdout("3\n");
}

#[test]
fn count_mixed_values_on_stdin() {
    jsonmore()
        .arg("count")
        .write_stdin("  1 \"two\" [3] {\"four\": 4}\n\n")
        .assert()
        .success()
        .stdout("4\n");
}

#[test]
fn count_empty_stdin() {
    jsonmore()
        .arg("count")
        .write_stdin("")
        .assert()
        .success()
        .stdout("0\n");
}

#[test]
fn count_empty_stdin_is_silent() {
    jsonmore()
        .arg("count")
        .env("RUST_LOG", "trace")
        .write_stdin("")
        .assert()
        .success()
        .stdout("0\n")
        .stderr("");
}

#[test]
fn count_deep_nesting_within_default_limit() {
    let depth = 400;
    let input = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
    jsonmore()
        .arg("count")
        .write_stdin(input)
        .assert()
        .success()
        .stdout("1\n");
}

#[test]
fn count_malformed_fails() {
    jsonmore()
        .arg("count")
        .write_stdin("{\"a\" 1}")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to skip JSON value"));
}

// ─────────────────────────────────────────────────────────────────────────────
// get
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn get_int() {
    jsonmore()
        .args(["get", "seq", "--as", "int", "-i", events_path()])
        .assert()
        .success()
        .stdout("1\n2\n3\n");
}

#[test]
fn get_double_on_integer_field_is_null() {
    jsonmore()
        .args(["get", "seq", "--as", "double", "-i", events_path()])
        .assert()
        .success()
        .stdout("null\nnull\nnull\n");
}

#[test]
fn get_doubles_with_fill() {
    jsonmore()
        .args([
            "get", "pose", "--as", "doubles", "--len", "3", "--fill", "0", "-i",
            events_path(),
        ])
        .assert()
        .success()
        .stdout("[0.5,1.5,2.5]\n[3.0,0.0,4.25]\n[6.0,7.0,8.0]\n");
}

#[test]
fn get_doubles_default_fill_is_null() {
    jsonmore()
        .args(["get", "pose", "--as", "doubles", "--len", "2", "-i", events_path()])
        .assert()
        .success()
        .stdout("[0.5,1.5]\n[3.0,null]\n[6.0,7.0]\n");
}

#[test]
fn get_ints_replaces_doubles_with_fill() {
    jsonmore()
        .args(["get", "ids", "--as", "ints", "--len", "3", "-i", events_path()])
        .assert()
        .success()
        .stdout("[10,20,30]\n[11,0,31]\n[12,22,32]\n");
}

#[test]
fn get_absent_field_is_null() {
    jsonmore()
        .args(["get", "missing", "--as", "doubles", "--len", "3", "-i", events_path()])
        .assert()
        .success()
        .stdout("null\nnull\nnull\n");
}

#[test]
fn get_short_array_fails() {
    jsonmore()
        .args(["get", "pose", "--as", "doubles", "--len", "4", "-i", events_path()])
        .assert()
        .failure()
        .stdout("null\nnull\nnull\n")
        .stderr(predicate::str::contains("could not be read from 3 value(s)"));
}

#[test]
fn get_int_type_mismatch_is_logged_and_fails() {
    jsonmore()
        .args(["get", "note", "--as", "int", "-i", events_path()])
        .assert()
        .failure()
        .stdout("null\nnull\nnull\n")
        .stderr(predicate::str::contains("I was looking for an int"))
        .stderr(predicate::str::contains("could not be read from 1 value(s)"));
}

#[test]
fn get_requires_kind() {
    jsonmore()
        .args(["get", "seq"])
        .write_stdin("{}")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--as"));
}

// ─────────────────────────────────────────────────────────────────────────────
// find
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn find_nested_owner() {
    jsonmore()
        .args(["find", "serial", "-i", events_path()])
        .assert()
        .success()
        .stdout("{\"serial\":\"A-1\"}\n{\"serial\":\"A-2\"}\nnull\n");
}

#[test]
fn find_top_level_owner() {
    jsonmore()
        .arg("find")
        .arg("name")
        .write_stdin("{\"a\":{\"b\":1},\"name\":\"x\"}")
        .assert()
        .success()
        .stdout("{\"a\":{\"b\":1},\"name\":\"x\"}\n");
}

// ─────────────────────────────────────────────────────────────────────────────
// Logging
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn rust_log_debug_reports_reads() {
    jsonmore()
        .arg("cat")
        .env("RUST_LOG", "debug")
        .write_stdin("[1]")
        .assert()
        .success()
        .stdout("[1]\n")
        .stderr(predicate::str::contains("Read JSON value"));
}

#[test]
fn no_subcommand_shows_usage() {
    jsonmore()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
