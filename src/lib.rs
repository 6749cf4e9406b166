//! aptbundle library
//!
//! Installs categorized sets of Debian packages described by a YAML manifest:
//! resolve the selection, skip what dpkg already has, refresh the apt index
//! on a throttle and install the rest in one `apt-get install` call.

pub mod backend;
pub mod cache;
pub mod cli;
pub mod error;
pub mod installer;
pub mod logging;
pub mod manifest;
pub mod report;
pub mod sanity;
pub mod selection;
pub mod status;

// Re-export main types for convenience
pub use backend::{AptBackend, CommandStatus, PackageBackend, PackageCommand};
pub use cache::{CacheStamp, DEFAULT_REFRESH_INTERVAL};
pub use error::{ConfigError, InstallerError, Result};
pub use installer::{InstallOutcome, Installer, RunOptions};
pub use manifest::{Category, Manifest};
pub use sanity::SanityCheckResult;
pub use selection::resolve;
pub use status::{InstallPlan, check_installed};
