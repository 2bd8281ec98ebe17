//! On-disk behavior of the assembled logger and rotating writers.

use std::fs;

use openapi_runtime::observability::{
    Encoder, LevelRouting, Logger, RotatingWriter, RotatingWriterConfig, Severity,
};
use tempfile::TempDir;

mod common;

#[test]
fn warn_event_lands_only_in_warn_log() {
    let dir = TempDir::new().unwrap();
    let logger = Logger::assemble(&common::settings(dir.path(), Severity::Debug)).unwrap();

    logger.in_scope(|| tracing::warn!(order_id = 42, "disk almost full"));

    let warn = common::read_level(dir.path(), "warn").expect("warn.log written");
    assert!(warn.contains("disk almost full"));
    assert!(warn.contains("order_id=42"));
    assert!(common::read_level(dir.path(), "info").is_none());
    assert!(common::read_level(dir.path(), "error").is_none());
    assert_eq!(common::layout(dir.path()).len(), 1);
}

#[test]
fn levels_below_the_configured_minimum_are_dropped() {
    let dir = TempDir::new().unwrap();
    let logger = Logger::assemble(&common::settings(dir.path(), Severity::Warn)).unwrap();

    logger.in_scope(|| {
        tracing::debug!("noise");
        tracing::info!("chatter");
        tracing::trace!("very noisy");
    });

    assert!(common::layout(dir.path()).is_empty());
}

#[test]
fn escalated_severities_route_by_target() {
    let dir = TempDir::new().unwrap();
    let logger = Logger::assemble(&common::settings(dir.path(), Severity::Error)).unwrap();

    logger.in_scope(|| {
        tracing::error!("plain failure");
        tracing::error!(target: "fatal", "cannot continue");
        tracing::error!(target: "dpanic", "invariant broken");
    });

    let error = common::read_level(dir.path(), "error").unwrap();
    let fatal = common::read_level(dir.path(), "fatal").unwrap();
    let dpanic = common::read_level(dir.path(), "dpanic").unwrap();
    assert!(error.contains("plain failure") && !error.contains("cannot continue"));
    assert!(fatal.contains("cannot continue") && !fatal.contains("plain failure"));
    assert!(dpanic.contains("invariant broken"));
    assert!(common::read_level(dir.path(), "panic").is_none());
}

#[test]
fn threshold_routing_copies_event_to_lower_cores() {
    let dir = TempDir::new().unwrap();
    let mut settings = common::settings(dir.path(), Severity::Info);
    settings.routing = LevelRouting::Threshold;
    let logger = Logger::assemble(&settings).unwrap();

    logger.in_scope(|| tracing::warn!("threshold event"));

    assert!(common::read_level(dir.path(), "info").unwrap().contains("threshold event"));
    assert!(common::read_level(dir.path(), "warn").unwrap().contains("threshold event"));
    assert!(common::read_level(dir.path(), "error").is_none());
}

#[test]
fn json_encoder_writes_one_object_per_line() {
    let dir = TempDir::new().unwrap();
    let mut settings = common::settings(dir.path(), Severity::Info);
    settings.encoder = Encoder::Json;
    let logger = Logger::assemble(&settings).unwrap();

    logger.in_scope(|| {
        tracing::info!(user = "ada", "first");
        tracing::info!(user = "bob", "second");
    });

    let info = common::read_level(dir.path(), "info").unwrap();
    let lines: Vec<serde_json::Value> = info
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["fields"]["message"], "first");
    assert_eq!(lines[1]["fields"]["user"], "bob");
    assert_eq!(lines[0]["level"], "INFO");
}

#[test]
fn caller_location_is_attached_when_enabled() {
    let dir = TempDir::new().unwrap();
    let mut settings = common::settings(dir.path(), Severity::Info);
    settings.show_caller = true;
    let logger = Logger::assemble(&settings).unwrap();

    logger.in_scope(|| tracing::info!("where am I"));

    assert!(common::read_level(dir.path(), "info").unwrap().contains("log_layout.rs:"));
}

#[test]
fn identical_assemblies_produce_identical_layouts() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();

    for dir in [&first, &second] {
        let logger = Logger::assemble(&common::settings(dir.path(), Severity::Debug)).unwrap();
        logger.in_scope(|| {
            tracing::debug!("d");
            tracing::info!("i");
            tracing::error!("e");
        });
    }

    let layout = common::layout(first.path());
    assert_eq!(layout, common::layout(second.path()));
    assert_eq!(layout.len(), 3);
}

#[test]
fn retention_removes_expired_directory_on_next_write() {
    let dir = TempDir::new().unwrap();
    let expired = dir.path().join("2000-01-01");
    let recent = dir.path().join("recent");
    fs::create_dir_all(&expired).unwrap();
    fs::write(expired.join("info.log"), "old\n").unwrap();
    fs::create_dir_all(&recent).unwrap();
    common::backdate(&expired, 10);
    common::backdate(&recent, 1);

    let writer = RotatingWriter::new(RotatingWriterConfig::daily(dir.path(), Severity::Info, 3));
    writer.write(b"new\n").unwrap();

    assert!(!expired.exists());
    assert!(recent.exists());
    assert!(dir.path().exists());
    assert_eq!(common::read_level(dir.path(), "info").unwrap(), "new\n");
}

#[test]
fn zero_retention_never_deletes() {
    let dir = TempDir::new().unwrap();
    let ancient = dir.path().join("1990-01-01");
    fs::create_dir_all(&ancient).unwrap();
    common::backdate(&ancient, 10_000);

    let writer = RotatingWriter::new(RotatingWriterConfig::daily(dir.path(), Severity::Info, 0));
    writer.write(b"x\n").unwrap();

    assert!(ancient.exists());
}

#[test]
fn logger_keeps_working_when_log_file_is_blocked() {
    let dir = TempDir::new().unwrap();
    let logger = Logger::assemble(&common::settings(dir.path(), Severity::Info)).unwrap();
    // A directory where the level file should go makes the open step fail.
    fs::create_dir_all(dir.path().join(common::today()).join("info.log")).unwrap();

    logger.in_scope(|| {
        tracing::info!("goes to stderr instead");
        tracing::warn!("still written");
    });

    assert!(common::read_level(dir.path(), "warn").unwrap().contains("still written"));
}
