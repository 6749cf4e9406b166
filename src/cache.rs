//! Throttled package-index refresh.
//!
//! The time of the last `apt-get update` is kept in a per-user stamp file as
//! a single integer of epoch seconds. A refresh is due once that stamp is
//! older than the refresh interval.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::backend::{PackageBackend, PackageCommand};
use crate::error::{InstallerError, Result};

/// Seconds between throttled index refreshes
pub const DEFAULT_REFRESH_INTERVAL: u64 = 7200;

/// Stamp file name, placed in the user's home directory
pub const STAMP_FILE_NAME: &str = ".install_packages_last_update";

/// Default stamp file location, `~/.install_packages_last_update`
pub fn default_stamp_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(STAMP_FILE_NAME))
}

/// Current time in epoch seconds
pub fn now_epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Persisted time of the last index refresh
#[derive(Debug, Clone)]
pub struct CacheStamp {
    path: PathBuf,
    interval: u64,
}

impl CacheStamp {
    pub fn new(path: impl Into<PathBuf>, interval: u64) -> Self {
        Self {
            path: path.into(),
            interval,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Epoch seconds of the last refresh; 0 if the stamp is missing or unreadable
    pub fn read_last_update(&self) -> u64 {
        match fs::read_to_string(&self.path) {
            Ok(content) => content.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(
                    "Ignoring invalid timestamp {:?} in {}",
                    content.trim(),
                    self.path.display()
                );
                0
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => 0,
            Err(e) => {
                tracing::warn!("Cannot read {}: {}", self.path.display(), e);
                0
            }
        }
    }

    /// True if more than `interval` seconds passed since the last refresh.
    ///
    /// A stamp from the future counts as fresh.
    pub fn is_stale(&self, now: u64) -> bool {
        now.saturating_sub(self.read_last_update()) > self.interval
    }

    /// Overwrite the stamp with `now`
    pub fn record(&self, now: u64) -> Result<()> {
        fs::write(&self.path, now.to_string()).map_err(|source| InstallerError::StateFile {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!("Recorded index refresh at {} in {}", now, self.path.display());
        Ok(())
    }

    /// Refresh the package index if the stamp is stale.
    ///
    /// Returns whether a refresh command ran. The stamp only advances when
    /// the refresh succeeded.
    pub fn refresh_if_stale(&self, backend: &dyn PackageBackend, now: u64) -> Result<bool> {
        if !self.is_stale(now) {
            tracing::debug!(
                "Package index refreshed less than {}s ago, skipping",
                self.interval
            );
            return Ok(false);
        }

        tracing::info!("Updating package cache ({})", PackageCommand::Refresh);
        let status = backend.refresh_index()?;
        if status.success {
            self.record(now)?;
        } else {
            tracing::warn!(
                "{} exited with {:?}; keeping previous stamp",
                PackageCommand::Refresh,
                status.code
            );
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CommandStatus;
    use std::cell::Cell;

    struct RefreshCounter {
        refreshes: Cell<u32>,
        status: CommandStatus,
    }

    impl RefreshCounter {
        fn new(status: CommandStatus) -> Self {
            Self {
                refreshes: Cell::new(0),
                status,
            }
        }
    }

    impl PackageBackend for RefreshCounter {
        fn query(&self, _package: &str) -> Result<Option<String>> {
            Ok(None)
        }
        fn refresh_index(&self) -> Result<CommandStatus> {
            self.refreshes.set(self.refreshes.get() + 1);
            Ok(self.status)
        }
        fn install(&self, _packages: &[String]) -> Result<CommandStatus> {
            Ok(CommandStatus::SUCCESS)
        }
        fn required_binaries(&self) -> Vec<String> {
            Vec::new()
        }
    }

    fn stamp_in(dir: &tempfile::TempDir) -> CacheStamp {
        CacheStamp::new(dir.path().join(STAMP_FILE_NAME), DEFAULT_REFRESH_INTERVAL)
    }

    #[test]
    fn test_missing_stamp_reads_zero() {
        let dir = tempfile::tempdir().unwrap();
        let stamp = stamp_in(&dir);
        assert_eq!(stamp.read_last_update(), 0);
        assert!(stamp.is_stale(now_epoch_secs()));
    }

    #[test]
    fn test_invalid_stamp_reads_zero() {
        let dir = tempfile::tempdir().unwrap();
        let stamp = stamp_in(&dir);
        fs::write(stamp.path(), "yesterday").unwrap();
        assert_eq!(stamp.read_last_update(), 0);
    }

    #[test]
    fn test_record_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let stamp = stamp_in(&dir);
        stamp.record(1_700_000_000).unwrap();
        assert_eq!(fs::read_to_string(stamp.path()).unwrap(), "1700000000");
        assert_eq!(stamp.read_last_update(), 1_700_000_000);
    }

    #[test]
    fn test_staleness_boundary() {
        let dir = tempfile::tempdir().unwrap();
        let stamp = stamp_in(&dir);
        stamp.record(10_000).unwrap();

        assert!(!stamp.is_stale(10_000 + DEFAULT_REFRESH_INTERVAL));
        assert!(stamp.is_stale(10_000 + DEFAULT_REFRESH_INTERVAL + 1));
        // clock went backwards
        assert!(!stamp.is_stale(5_000));
    }

    #[test]
    fn test_fresh_stamp_skips_refresh() {
        let dir = tempfile::tempdir().unwrap();
        let stamp = stamp_in(&dir);
        let now = 1_700_000_000;
        stamp.record(now - 60).unwrap();

        let backend = RefreshCounter::new(CommandStatus::SUCCESS);
        assert!(!stamp.refresh_if_stale(&backend, now).unwrap());
        assert_eq!(backend.refreshes.get(), 0);
        assert_eq!(stamp.read_last_update(), now - 60);
    }

    #[test]
    fn test_stale_stamp_refreshes_and_records() {
        let dir = tempfile::tempdir().unwrap();
        let stamp = stamp_in(&dir);
        let now = 1_700_000_000;

        let backend = RefreshCounter::new(CommandStatus::SUCCESS);
        assert!(stamp.refresh_if_stale(&backend, now).unwrap());
        assert_eq!(backend.refreshes.get(), 1);
        assert_eq!(stamp.read_last_update(), now);
    }

    #[test]
    fn test_failed_refresh_keeps_stamp() {
        let dir = tempfile::tempdir().unwrap();
        let stamp = stamp_in(&dir);

        let backend = RefreshCounter::new(CommandStatus::failed(100));
        assert!(stamp.refresh_if_stale(&backend, 1_700_000_000).unwrap());
        assert_eq!(backend.refreshes.get(), 1);
        assert!(!stamp.path().exists());
    }

    #[test]
    fn test_unwritable_stamp_is_state_file_error() {
        let dir = tempfile::tempdir().unwrap();
        let stamp = CacheStamp::new(dir.path().join("missing/dir/stamp"), 0);
        let err = stamp.record(1).unwrap_err();
        assert!(matches!(err, InstallerError::StateFile { .. }));
    }
}
