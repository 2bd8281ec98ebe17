//! Age-based cleanup of dated log directories.
//!
//! Walks the log root and removes every sub-directory whose modification
//! time is strictly older than the cutoff. The root itself is never removed.
//! Removed directories are not descended into. An entry that vanishes
//! mid-walk counts as already removed; only errors on the root propagate.

use std::fs::{self, DirEntry};
use std::io;
use std::path::Path;
use std::time::{Duration, SystemTime};

const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Remove sub-directories of `root` last modified more than `retention_days`
/// days before `now`. Returns how many directories were removed.
///
/// `retention_days == 0` disables cleanup.
pub fn purge_expired(root: &Path, retention_days: u32, now: SystemTime) -> io::Result<usize> {
    if retention_days == 0 {
        return Ok(0);
    }
    let age = Duration::from_secs(u64::from(retention_days) * SECS_PER_DAY);
    let cutoff = now.checked_sub(age).unwrap_or(SystemTime::UNIX_EPOCH);
    purge_below(root, cutoff)
}

fn purge_below(dir: &Path, cutoff: SystemTime) -> io::Result<usize> {
    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        match purge_entry(entry, cutoff) {
            Ok(n) => removed += n,
            // Another writer sharing the root got there first.
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
    }
    Ok(removed)
}

fn purge_entry(entry: io::Result<DirEntry>, cutoff: SystemTime) -> io::Result<usize> {
    let entry = entry?;
    if !entry.file_type()?.is_dir() {
        return Ok(0);
    }
    let path = entry.path();
    let modified = entry.metadata()?.modified()?;
    if modified < cutoff {
        fs::remove_dir_all(&path)?;
        tracing::debug!(path = %path.display(), "expired log directory removed");
        Ok(1)
    } else {
        purge_below(&path, cutoff)
    }
}
