//! Error handling for aptbundle
//!
//! Library code returns [`Result`]; the binary maps [`InstallerError`] to a
//! process exit code with [`InstallerError::exit_code`].

use std::path::PathBuf;
use thiserror::Error;

/// Manifest loading and lookup errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The manifest file could not be read
    #[error("failed to read manifest {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The manifest is not valid YAML or does not match the expected shape
    #[error("failed to parse manifest {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    /// The manifest parsed but its structure is unusable
    #[error("malformed manifest {}: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },

    /// The requested category is not a key of the manifest
    #[error("category \"{category}\" not found in the manifest (available: {})", .available.join(", "))]
    CategoryNotFound {
        category: String,
        available: Vec<String>,
    },
}

/// Main error type for aptbundle
#[derive(Error, Debug)]
pub enum InstallerError {
    /// Manifest errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Not running with an effective UID of 0
    #[error("this tool must be run as root")]
    NotRoot,

    /// Package-manager binaries missing from PATH
    #[error("required binaries not found in PATH: {}", .0.join(", "))]
    MissingBinaries(Vec<String>),

    /// An external command could not be spawned
    #[error("failed to run {program}: {source}")]
    Command {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The batch install command exited unsuccessfully
    #[error("package installation failed (exit code {})", .code.map_or_else(|| "none".to_string(), |c| c.to_string()))]
    InstallFailed { code: Option<i32> },

    /// The cache-update stamp file could not be written
    #[error("failed to update stamp file {}: {source}", .path.display())]
    StateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO errors not covered above
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for aptbundle operations
pub type Result<T> = std::result::Result<T, InstallerError>;

impl InstallerError {
    /// Create a command spawn error
    pub fn command(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::Command {
            program: program.into(),
            source,
        }
    }

    /// Process exit code for this error.
    ///
    /// Every failure exits with 1; the distinction between kinds is carried
    /// by the diagnostic, not the code.
    pub fn exit_code(&self) -> i32 {
        1
    }

    /// True if this error happened before any package-manager command ran
    pub fn is_preflight(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::NotRoot | Self::MissingBinaries(_)
        )
    }
}
