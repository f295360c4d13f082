//! Fatal and panic records with termination left on
//!
//! Kept in its own test binary because the switch is process-wide.

use std::process::Command;
use std::sync::Arc;
use zlog::prelude::*;

const FATAL_CHILD_ENV: &str = "ZLOG_FATAL_CHILD";

#[test]
#[should_panic(expected = "state corrupted")]
fn test_panic_level_panics_after_write() {
    let logger = Logger::new(IoWriter::new(Vec::new()));
    logger.panic().str("component", "cache").msg("state corrupted");
}

#[test]
fn test_panic_record_written_before_panicking() {
    let out = Arc::new(IoWriter::new(Vec::new()));
    let logger = Logger::new(Arc::clone(&out));

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        logger.panic().msg("boom");
    }));
    assert!(result.is_err());

    let text = out.with_inner(|buf| String::from_utf8(buf.clone()).unwrap());
    assert!(text.contains("\"level\":\"panic\""));
    assert!(text.ends_with(",\"message\":\"boom\"}\n"));
}

#[test]
fn test_fatal_level_exits_after_write() {
    if std::env::var_os(FATAL_CHILD_ENV).is_some() {
        let logger = Logger::new(IoWriter::stdout());
        logger.fatal().str("reason", "disk gone").msg("shutting down");
        unreachable!("fatal record returned");
    }

    let exe = std::env::current_exe().expect("test binary path");
    let output = Command::new(exe)
        .args(["test_fatal_level_exits_after_write", "--exact", "--nocapture"])
        .env(FATAL_CHILD_ENV, "1")
        .output()
        .expect("failed to run child test");

    assert_eq!(output.status.code(), Some(255));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let start = stdout.find("{\"time\"").expect("fatal record in child output");
    let record = &stdout[start..];
    let end = record.find("}\n").expect("terminated record") + 2;
    let record = &record[..end];

    let json: serde_json::Value = serde_json::from_str(record).expect("valid JSON");
    assert_eq!(json["level"], "fatal");
    assert_eq!(json["reason"], "disk gone");
    assert!(record.ends_with(",\"message\":\"shutting down\"}\n"));
}
