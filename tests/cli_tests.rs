//! Tests for the walcheck binary
//!
//! Exit codes and the diagnostic line on stderr.

use std::fs::File;
use std::path::Path;
use std::process::{Command, Output};
use std::time::{Duration, SystemTime};

use tempfile::TempDir;

fn write_segment(dir: &Path, name: &str, offset_secs: u64) {
    let file = File::create(dir.join(name)).unwrap();
    let base = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
    file.set_modified(base + Duration::from_secs(offset_secs)).unwrap();
}

fn walcheck(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_walcheck"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_ok_exit_code() {
    let temp = TempDir::new().unwrap();
    write_segment(temp.path(), "000000010000000000000001", 0);
    write_segment(temp.path(), "000000010000000000000002", 60);

    let output = walcheck(&["--directory", temp.path().to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(0));
    assert!(stderr(&output).starts_with("OK: WAL sequence verified"));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_warning_exit_code_for_missing_directory() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("gone");

    let output = walcheck(&["-d", missing.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("does not exist"));
}

#[test]
fn test_critical_exit_code() {
    let temp = TempDir::new().unwrap();
    write_segment(temp.path(), "000000010000000000000001", 0);
    write_segment(temp.path(), "000000010000000000000003", 90);

    let output = walcheck(&[
        "--directory",
        temp.path().to_str().unwrap(),
        "--threshold-secs",
        "60",
    ]);

    assert_eq!(output.status.code(), Some(2));
    assert_eq!(
        stderr(&output),
        "CRITICAL: Missing WAL files at 000000010000000000000002 (next WAL more than 1 minute later)\n"
    );
}

#[test]
fn test_gap_writes_only_the_status_line() {
    let temp = TempDir::new().unwrap();
    write_segment(temp.path(), "000000010000000000000001", 0);
    write_segment(temp.path(), "000000010000000000000003", 90);

    let output = walcheck(&["--directory", temp.path().to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stderr(&output),
        "WARNING: Missing WAL files at 000000010000000000000002 (next WAL less than 1 day later)\n"
    );
}

#[test]
fn test_timeline_mismatch_writes_only_the_status_line() {
    let temp = TempDir::new().unwrap();
    write_segment(temp.path(), "000000010000000000000001", 0);
    write_segment(temp.path(), "000000020000000000000001", 90);

    let output = walcheck(&["--directory", temp.path().to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = stderr(&output);
    assert_eq!(stderr.lines().count(), 1);
    assert!(stderr.starts_with("WARNING: Multiple timelines found"));
    assert!(!stderr.contains('\x1b'));
}

#[test]
fn test_verbose_adds_log_lines() {
    let temp = TempDir::new().unwrap();
    write_segment(temp.path(), "000000010000000000000001", 0);
    write_segment(temp.path(), "000000010000000000000003", 90);

    let output = walcheck(&["--directory", temp.path().to_str().unwrap(), "--verbose"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = stderr(&output);
    assert!(stderr.lines().count() > 1);
    assert!(!stderr.contains('\x1b'));
    assert!(stderr.ends_with("(next WAL less than 1 day later)\n"));
}

#[test]
fn test_several_directories_exit_with_worst() {
    let healthy = TempDir::new().unwrap();
    write_segment(healthy.path(), "000000010000000000000001", 0);

    let empty = TempDir::new().unwrap();

    let output = walcheck(&[
        "-d",
        healthy.path().to_str().unwrap(),
        "-d",
        empty.path().to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stderr(&output).lines().count(), 2);
}

#[test]
fn test_missing_directory_flag_is_unknown() {
    let output = walcheck(&[]);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_invalid_suffix_is_unknown() {
    let temp = TempDir::new().unwrap();
    let output = walcheck(&["-d", temp.path().to_str().unwrap(), "--suffix", "a/b"]);

    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("path separator"));
}
