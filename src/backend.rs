//! Package-manager backend.
//!
//! The installer talks to the system through [`PackageBackend`] so the
//! workflow can be driven by a recording fake in tests. [`AptBackend`] is the
//! real implementation on top of `dpkg` and `apt-get`.

use std::process::{Command, ExitStatus, Stdio};
use strum::{AsRefStr, Display, EnumIter};

use crate::error::{InstallerError, Result};

/// The package-manager operations aptbundle performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter)]
pub enum PackageCommand {
    /// `dpkg -s <package>`
    #[strum(serialize = "dpkg -s")]
    Query,
    /// `apt-get update -y`
    #[strum(serialize = "apt-get update")]
    Refresh,
    /// `apt-get install -y <packages…>`
    #[strum(serialize = "apt-get install")]
    Install,
}

/// Exit status of a package-manager command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    pub success: bool,
    pub code: Option<i32>,
}

impl CommandStatus {
    pub const SUCCESS: CommandStatus = CommandStatus {
        success: true,
        code: Some(0),
    };

    pub fn failed(code: i32) -> Self {
        Self {
            success: false,
            code: Some(code),
        }
    }
}

impl From<ExitStatus> for CommandStatus {
    fn from(status: ExitStatus) -> Self {
        Self {
            success: status.success(),
            code: status.code(),
        }
    }
}

/// Access to the system package database and package manager
pub trait PackageBackend {
    /// Status record of an installed package.
    ///
    /// Returns `Ok(None)` when the package database has no installed record.
    fn query(&self, package: &str) -> Result<Option<String>>;

    /// Refresh the package index
    fn refresh_index(&self) -> Result<CommandStatus>;

    /// Install all `packages` in one batch
    fn install(&self, packages: &[String]) -> Result<CommandStatus>;

    /// Executables this backend needs on `PATH`
    fn required_binaries(&self) -> Vec<String>;
}

/// [`PackageBackend`] backed by `dpkg` and `apt-get`
#[derive(Debug, Clone)]
pub struct AptBackend {
    dpkg: String,
    apt_get: String,
}

impl Default for AptBackend {
    fn default() -> Self {
        Self {
            dpkg: "dpkg".to_string(),
            apt_get: "apt-get".to_string(),
        }
    }
}

impl AptBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use different executables, e.g. wrappers in a chroot
    pub fn with_programs(dpkg: impl Into<String>, apt_get: impl Into<String>) -> Self {
        Self {
            dpkg: dpkg.into(),
            apt_get: apt_get.into(),
        }
    }

    fn run_apt(&self, args: &[&str], packages: &[String]) -> Result<CommandStatus> {
        tracing::debug!("Running {} {} {}", self.apt_get, args.join(" "), packages.join(" "));
        let status = Command::new(&self.apt_get)
            .args(args)
            .args(packages)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| InstallerError::command(&self.apt_get, e))?;
        Ok(status.into())
    }
}

impl PackageBackend for AptBackend {
    fn query(&self, package: &str) -> Result<Option<String>> {
        let output = Command::new(&self.dpkg)
            .args(["-s", package])
            .stdin(Stdio::null())
            .output()
            .map_err(|e| InstallerError::command(&self.dpkg, e))?;

        if output.status.success() {
            Ok(Some(String::from_utf8_lossy(&output.stdout).into_owned()))
        } else {
            tracing::trace!(
                "{} -s {}: {}",
                self.dpkg,
                package,
                String::from_utf8_lossy(&output.stderr).trim_end()
            );
            Ok(None)
        }
    }

    fn refresh_index(&self) -> Result<CommandStatus> {
        self.run_apt(&["update", "-y"], &[])
    }

    fn install(&self, packages: &[String]) -> Result<CommandStatus> {
        self.run_apt(&["install", "-y"], packages)
    }

    fn required_binaries(&self) -> Vec<String> {
        vec![self.dpkg.clone(), self.apt_get.clone()]
    }
}
