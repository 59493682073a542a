//! Integration tests for the latstat CLI.
//!
//! Each test writes a latency log into a temp dir and runs the built binary
//! from inside that dir, so the default `lats.txt` report lands there too.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

/// Encode `words` the way the request loggers write them.
fn write_log(path: &Path, words: &[u64]) {
    let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_le_bytes()).collect();
    fs::write(path, bytes).expect("Failed to write latency log");
}

/// Run latstat in `dir` with the given arguments.
fn run_latstat(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_latstat"))
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to run latstat")
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

const EXAMPLE_LOG: [u64; 9] = [
    100_000, 200_000, 300_000, //
    100_000, 200_000, 400_000, //
    100_000, 200_000, 500_000,
];

#[test]
fn test_example_log_end_to_end() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write_log(&dir.path().join("lats.bin"), &EXAMPLE_LOG);

    let output = run_latstat(dir.path(), &["lats.bin"]);
    assert!(
        output.status.success(),
        "latstat failed: {}",
        lossy(&output.stderr)
    );

    let stdout = lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "50th percentile latency 0.400 ms | max latency 0.500 ms",
            "75th percentile latency 0.450 ms | max latency 0.500 ms",
            "90th percentile latency 0.480 ms | max latency 0.500 ms",
            "95th percentile latency 0.490 ms | max latency 0.500 ms",
            "99th percentile latency 0.498 ms | max latency 0.500 ms",
        ]
    );

    let report = fs::read_to_string(dir.path().join("lats.txt")).expect("report not written");
    let rows: Vec<&str> = report.lines().collect();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0], "  QueueTimes | ServiceTimes | SojournTimes");
    assert_eq!(rows[1], "       0.100 |        0.200 |        0.300");
    assert_eq!(rows[3], "       0.100 |        0.200 |        0.500");
}

#[test]
fn test_custom_output_path() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write_log(&dir.path().join("lats.bin"), &EXAMPLE_LOG);

    let output = run_latstat(dir.path(), &["-o", "custom.txt", "lats.bin"]);
    assert!(output.status.success(), "{}", lossy(&output.stderr));
    assert!(dir.path().join("custom.txt").exists());
    assert!(!dir.path().join("lats.txt").exists());
}

#[test]
fn test_missing_input() {
    let dir = TempDir::new().expect("Failed to create temp dir");

    let output = run_latstat(dir.path(), &["missing.bin"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = lossy(&output.stderr);
    assert!(
        stderr.contains("latency log not found: missing.bin"),
        "unexpected stderr: {stderr}"
    );
    assert!(output.stdout.is_empty());
    assert!(!dir.path().join("lats.txt").exists());
}

#[test]
fn test_too_short_input_is_empty() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write_log(&dir.path().join("short.bin"), &[1, 2]);

    let output = run_latstat(dir.path(), &["short.bin"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(lossy(&output.stderr).contains("no complete records"));
    assert!(!dir.path().join("lats.txt").exists());
}

#[test]
fn test_trailing_words_dropped_by_default() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut words = EXAMPLE_LOG.to_vec();
    words.extend([9_000_000, 9_000_000]);
    write_log(&dir.path().join("lats.bin"), &words);

    let output = run_latstat(dir.path(), &["lats.bin"]);
    assert!(output.status.success(), "{}", lossy(&output.stderr));
    assert!(lossy(&output.stderr).contains("Dropping 16 trailing bytes"));

    let report = fs::read_to_string(dir.path().join("lats.txt")).unwrap();
    assert_eq!(report.lines().count(), 4);
    assert!(lossy(&output.stdout).contains("max latency 0.500 ms"));
}

#[test]
fn test_strict_rejects_trailing_words() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut words = EXAMPLE_LOG.to_vec();
    words.push(1);
    write_log(&dir.path().join("lats.bin"), &words);

    let output = run_latstat(dir.path(), &["--strict", "lats.bin"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(lossy(&output.stderr).contains("malformed latency log"));
    assert!(!dir.path().join("lats.txt").exists());
}

#[test]
fn test_json_summary() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write_log(&dir.path().join("lats.bin"), &EXAMPLE_LOG);

    let output = run_latstat(dir.path(), &["-f", "json", "lats.bin"]);
    assert!(output.status.success(), "{}", lossy(&output.stderr));

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is not JSON");
    assert_eq!(json["samples"], 3);
    assert_eq!(json["max_ms"], 0.5);
    let percentiles: Vec<u64> = json["percentiles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["percentile"].as_u64().unwrap())
        .collect();
    assert_eq!(percentiles, vec![50, 75, 90, 95, 99]);
}

#[test]
fn test_requires_exactly_one_input() {
    let dir = TempDir::new().expect("Failed to create temp dir");

    let output = run_latstat(dir.path(), &[]);
    assert!(!output.status.success());

    let output = run_latstat(dir.path(), &["a.bin", "b.bin"]);
    assert!(!output.status.success());
}
