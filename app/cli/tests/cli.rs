use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn fastmatch() -> Command {
    Command::cargo_bin("fastmatch").expect("binary built")
}

#[test]
fn test_search_found() {
    fastmatch()
        .args(["--quiet", "search", "fox"])
        .write_stdin("the quick brown fox")
        .assert()
        .success();
}

#[test]
fn test_search_not_found_exits_nonzero() {
    fastmatch()
        .args(["--quiet", "search", "wolf"])
        .write_stdin("the quick brown fox")
        .assert()
        .code(1);
}

#[test]
fn test_match_requires_whole_input() {
    fastmatch()
        .args(["--quiet", "match", "quick"])
        .write_stdin("quick")
        .assert()
        .success();

    // Containment is not enough: the entire input must equal the pattern
    fastmatch()
        .args(["--quiet", "match", "quick"])
        .write_stdin("quick brown fox")
        .assert()
        .code(1);

    fastmatch()
        .args(["--quiet", "match", "brown"])
        .write_stdin("quick brown fox")
        .assert()
        .code(1);
}

#[test]
fn test_find_count() {
    fastmatch()
        .args(["--quiet", "find", "abc", "--count"])
        .write_stdin("abcabcabc")
        .assert()
        .success()
        .stdout("3\n");
}

#[test]
fn test_find_prints_offsets_and_text() {
    fastmatch()
        .args(["--quiet", "find", "ab"])
        .write_stdin("zabzab")
        .assert()
        .success()
        .stdout("1:ab\n4:ab\n");
}

#[test]
fn test_find_spans() {
    fastmatch()
        .args(["--quiet", "find", "ab", "--spans"])
        .write_stdin("zabzab")
        .assert()
        .success()
        .stdout("1..3\n4..6\n");
}

#[test]
fn test_replace_to_stdout() {
    fastmatch()
        .args(["--quiet", "replace", "aaa", "--with", "b"])
        .write_stdin("aaaxaaa")
        .assert()
        .success()
        .stdout("bxb");
}

#[test]
fn test_replace_file_roundtrip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("in.txt");
    let output = dir.path().join("out.txt");

    let mut f = std::fs::File::create(&input).expect("create input");
    f.write_all(b"error: one\nwarn: two\nerror: three\n")
        .expect("write input");
    drop(f);

    fastmatch()
        .args([
            "--quiet",
            "replace",
            "error",
            "--with",
            "fault",
            "--input",
            input.to_str().expect("utf8 path"),
            "--output",
            output.to_str().expect("utf8 path"),
        ])
        .assert()
        .success();

    let replaced = std::fs::read_to_string(&output).expect("read output");
    assert_eq!(replaced, "fault: one\nwarn: two\nfault: three\n");
}

#[test]
fn test_ignore_case_flag() {
    fastmatch()
        .args(["--quiet", "find", "FOX", "--ignore-case", "--count"])
        .write_stdin("fox Fox FOX")
        .assert()
        .success()
        .stdout("3\n");
}

#[test]
fn test_scalar_mode_accepted() {
    fastmatch()
        .args(["--quiet", "--simd", "scalar", "search", "fox"])
        .write_stdin("the quick brown fox")
        .assert()
        .success();
}

#[test]
fn test_invalid_pattern_reports_position() {
    fastmatch()
        .args(["--quiet", "search", "tail\\"])
        .write_stdin("anything")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("position"));
}

#[test]
fn test_info_json_shape() {
    let assert = fastmatch().args(["--quiet", "info", "--json"]).assert().success();

    let output = assert.get_output();
    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("info --json emits valid JSON");

    assert_eq!(parsed["version"], "1.0.0");
    assert!(parsed["capabilities"].is_object());
    assert!(parsed["stats"]["total_calls"].is_u64());
    assert_eq!(parsed["mode"], "auto");
}

#[test]
fn test_info_human_readable() {
    fastmatch()
        .args(["--quiet", "info"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CPU Capabilities"))
        .stdout(predicate::str::contains("Dispatch Statistics"));
}
