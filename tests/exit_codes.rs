//! Exit status of the command-line binary.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn run_binary(dir: &Path, primary: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_endpoint_qualifier"))
        .arg("--primary")
        .arg(primary)
        .arg("--output-txt")
        .arg(dir.join("ip-no.txt"))
        .arg("--output-csv")
        .arg(dir.join("ip-no.csv"))
        .args(["--log-level", "error"])
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run endpoint_qualifier")
}

#[test]
fn test_empty_input_exits_with_one() {
    let dir = TempDir::new().expect("tempdir");
    let primary = dir.path().join("ip.txt");
    std::fs::write(&primary, "# no addresses here\n\n").expect("write");

    let output = run_binary(dir.path(), &primary);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no input"), "stderr was: {}", stderr);
    assert!(!dir.path().join("ip-no.txt").exists());
    assert!(!dir.path().join("ip-no.csv").exists());
}

#[test]
fn test_missing_input_file_exits_with_one() {
    let dir = TempDir::new().expect("tempdir");

    let output = run_binary(dir.path(), &dir.path().join("absent.txt"));

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_unknown_flag_is_a_usage_error() {
    let output = Command::new(env!("CARGO_BIN_EXE_endpoint_qualifier"))
        .arg("--no-such-flag")
        .output()
        .expect("Failed to run endpoint_qualifier");

    assert_eq!(output.status.code(), Some(2));
}
