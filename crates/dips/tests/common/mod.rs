//! Common test utilities shared across integration tests.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

/// Path to the compiled dips binary
pub fn dips_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_dips"))
}

/// Run the dips binary in the specified directory with colors disabled
pub fn run_dips_in_dir(dir: &Path, args: &[&str]) -> Output {
    Command::new(dips_binary())
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute dips binary")
}

/// Run the dips binary feeding `input` on stdin
pub fn run_dips_with_stdin(args: &[&str], input: &str) -> Output {
    let mut child = Command::new(dips_binary())
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn dips binary");

    child
        .stdin
        .take()
        .expect("stdin should be piped")
        .write_all(input.as_bytes())
        .expect("Failed to write stdin");

    child.wait_with_output().expect("Failed to wait for dips")
}

/// Write a manifest file into `dir`
pub fn write_manifest(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("Failed to write manifest");
    path
}
