//! The desired-state document is the only fatal input: when it cannot be
//! loaded the binary must stop before touching the system.

use std::io::Write;
use std::process::{Command, Output, Stdio};

fn run_macdeploy(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_macdeploy"))
        .args(args)
        .arg("--no-clear")
        .stdin(Stdio::null())
        .output()
        .expect("run macdeploy")
}

#[test]
fn missing_config_exits_non_zero() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("config.yaml");
    let output = run_macdeploy(&["--config", missing.to_str().expect("utf8 path")]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Error reading config"),
        "unexpected stdout: {stdout}"
    );
    assert!(!stdout.contains("Enter root password"));
}

#[test]
fn malformed_config_exits_non_zero() {
    let mut file = tempfile::NamedTempFile::new().expect("temp config");
    file.write_all(b"casks: [unterminated\nformulae:\n  - git\n")
        .expect("write config");
    let output = run_macdeploy(&["--config", file.path().to_str().expect("utf8 path")]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("parse config YAML"), "unexpected stdout: {stdout}");
    assert!(!stdout.contains("Enter root password"));
}

#[test]
fn wrongly_shaped_config_exits_non_zero() {
    let mut file = tempfile::NamedTempFile::new().expect("temp config");
    file.write_all(b"formulae: git\n").expect("write config");
    let output = run_macdeploy(&["--config", file.path().to_str().expect("utf8 path")]);
    assert_eq!(output.status.code(), Some(1));
}
