//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use filetime::{set_file_mtime, FileTime};
use openapi_runtime::observability::{Encoder, LevelRouting, LoggerSettings, Severity, DAILY_LAYOUT};

/// Today's date segment.
pub fn today() -> String {
    chrono::Local::now().format(DAILY_LAYOUT).to_string()
}

/// Contents of today's file for `level`, if it exists.
pub fn read_level(root: &Path, level: &str) -> Option<String> {
    fs::read_to_string(root.join(today()).join(format!("{level}.log"))).ok()
}

/// Every file under `root`, relative to it.
pub fn layout(root: &Path) -> BTreeSet<PathBuf> {
    let mut files = BTreeSet::new();
    collect(root, root, &mut files);
    files
}

fn collect(root: &Path, dir: &Path, files: &mut BTreeSet<PathBuf>) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect(root, &path, files);
        } else {
            files.insert(path.strip_prefix(root).unwrap().to_path_buf());
        }
    }
}

/// Set the modification time of `path` to `days` ago.
pub fn backdate(path: &Path, days: u64) {
    let then = SystemTime::now() - Duration::from_secs(days * 24 * 60 * 60);
    set_file_mtime(path, FileTime::from_system_time(then)).unwrap();
}

/// Plain-text logger settings for every severity from `lowest` up.
pub fn settings(dir: &Path, lowest: Severity) -> LoggerSettings {
    LoggerSettings {
        levels: lowest.and_above(),
        encoder: Encoder::Console,
        directory: dir.to_path_buf(),
        retention_days: 0,
        mirror_to_console: false,
        show_caller: false,
        routing: LevelRouting::Exact,
    }
}
