use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn stringparser(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("stringparser").unwrap();
    cmd.arg("--config").arg(dir.path().join("config.json"));
    cmd
}

#[test]
fn test_parse_positional_text() {
    let dir = TempDir::new().unwrap();
    stringparser(&dir)
        .args(["parse", "{:d} {:d}", "4 5", "6 7"])
        .assert()
        .success()
        .stdout("[[4,5],[6,7]]\n");
}

#[test]
fn test_parse_stdin_lines_as_text() {
    let dir = TempDir::new().unwrap();
    stringparser(&dir)
        .args(["parse", "{name} is {age:d}", "--format", "text"])
        .write_stdin("ann is 31\nbob is 42\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"{"name":"ann","age":31}"#))
        .stdout(predicate::str::contains(r#"{"name":"bob","age":42}"#));
}

#[test]
fn test_parse_input_file_as_csv() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input.txt");
    fs::write(&input, "x=1\ny=2\n").unwrap();

    stringparser(&dir)
        .args(["parse", "{key}={value:d}", "--format", "csv", "--input"])
        .arg(&input)
        .assert()
        .success()
        .stdout("key,value\nx,1\ny,2\n");
}

#[test]
fn test_unmatched_text_fails() {
    let dir = TempDir::new().unwrap();
    stringparser(&dir)
        .args(["parse", "before {:d} after", "before bla after"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not parse 'before bla after'"));
}

#[test]
fn test_skip_unmatched() {
    let dir = TempDir::new().unwrap();
    stringparser(&dir)
        .args(["parse", "{:d}", "1", "x", "3", "--skip-unmatched"])
        .assert()
        .success()
        .stdout("[1,3]\n");
}

#[test]
fn test_invalid_template() {
    let dir = TempDir::new().unwrap();
    stringparser(&dir)
        .args(["parse", "{0:#s}", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("alternate form"));
}

#[test]
fn test_flags() {
    let dir = TempDir::new().unwrap();
    stringparser(&dir)
        .args(["parse", "-i", "HELLO {}", "hello world", "--format", "text"])
        .assert()
        .success()
        .stdout("world\n");

    stringparser(&dir)
        .args(["parse", "-m", "--whole", "value: {:d}", "--format", "text"])
        .write_stdin("header\nvalue: 12\nfooter\n")
        .assert()
        .success()
        .stdout("12\n");
}

#[test]
fn test_named_template_from_config() {
    let dir = TempDir::new().unwrap();
    stringparser(&dir)
        .args(["config", "init"])
        .assert()
        .success();
    stringparser(&dir)
        .args(["config", "set", "templates.pair", "{:d},{:d}"])
        .assert()
        .success();
    stringparser(&dir)
        .args(["config", "get", "templates.pair"])
        .assert()
        .success()
        .stdout(predicate::str::contains("{:d},{:d}"));

    stringparser(&dir)
        .args(["parse", "--named", "pair", "1,2"])
        .assert()
        .success()
        .stdout("[[1,2]]\n");
}

#[test]
fn test_config_init_refuses_overwrite() {
    let dir = TempDir::new().unwrap();
    stringparser(&dir).args(["config", "init"]).assert().success();
    stringparser(&dir)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
}

#[test]
fn test_rust_log_directives() {
    let dir = TempDir::new().unwrap();
    stringparser(&dir)
        .env("RUST_LOG", "stringparser_core=debug")
        .args(["parse", "{:d}", "1"])
        .assert()
        .success()
        .stdout("[1]\n")
        .stderr(predicate::str::contains("Compiled template"));

    stringparser(&dir)
        .env_remove("RUST_LOG")
        .args(["parse", "{:d}", "1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Compiled template").not());
}
