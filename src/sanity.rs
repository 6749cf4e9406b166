//! Pre-flight sanity checks for runtime environment
//!
//! This module verifies the system environment before anything is queried
//! or installed:
//! - Required package-manager binaries are present
//! - Running with root privileges (EUID 0)

use std::path::Path;

use crate::backend::PackageBackend;
use crate::error::{InstallerError, Result};

/// Environment variable that disables the root check for development
pub const SKIP_ROOT_CHECK_ENV: &str = "APTBUNDLE_SKIP_ROOT_CHECK";

/// Result of environment verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanityCheckResult {
    pub missing_binaries: Vec<String>,
    pub is_root: bool,
}

impl SanityCheckResult {
    /// A result with every check passed
    pub fn passed() -> Self {
        Self {
            missing_binaries: Vec::new(),
            is_root: true,
        }
    }

    /// Returns true if all checks passed
    pub fn is_ok(&self) -> bool {
        self.missing_binaries.is_empty() && self.is_root
    }

    /// Convert to an error, root privileges checked first
    pub fn into_result(self) -> Result<()> {
        if !self.is_root {
            return Err(InstallerError::NotRoot);
        }
        if !self.missing_binaries.is_empty() {
            return Err(InstallerError::MissingBinaries(self.missing_binaries));
        }
        Ok(())
    }
}

/// Check if a binary is available, either as a path or on PATH
fn binary_exists(name: &str) -> bool {
    if name.contains('/') {
        return Path::new(name).is_file();
    }
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).any(|dir| dir.join(name).is_file()))
        .unwrap_or(false)
}

/// Check if running as root (EUID 0)
fn is_running_as_root() -> bool {
    nix::unistd::geteuid().is_root()
}

/// Skip root check (for development/testing)
/// Set APTBUNDLE_SKIP_ROOT_CHECK=1 to skip
pub fn should_skip_root_check() -> bool {
    std::env::var(SKIP_ROOT_CHECK_ENV)
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(false)
}

/// Perform all sanity checks for `backend` and return the result
pub fn verify_environment(backend: &dyn PackageBackend, require_root: bool) -> SanityCheckResult {
    let missing: Vec<String> = backend
        .required_binaries()
        .into_iter()
        .filter(|binary| !binary_exists(binary))
        .collect();

    let mut is_root = is_running_as_root();
    if !is_root && !require_root {
        is_root = true;
    } else if !is_root && should_skip_root_check() {
        tracing::warn!("Root check skipped ({}=1)", SKIP_ROOT_CHECK_ENV);
        is_root = true;
    }

    let result = SanityCheckResult {
        missing_binaries: missing,
        is_root,
    };
    tracing::debug!("Pre-flight checks: {:?}", result);
    result
}
