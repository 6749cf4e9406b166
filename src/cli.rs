use clap::{ArgAction, Parser};
use std::io;
use std::path::PathBuf;

use crate::cache::{self, DEFAULT_REFRESH_INTERVAL};
use crate::error::{InstallerError, Result};
use crate::installer::RunOptions;
use crate::manifest::DEFAULT_MANIFEST_PATH;

/// aptbundle - install categorized package sets from a YAML manifest
#[derive(Debug, Parser)]
#[command(name = "aptbundle")]
#[command(about = "Install categorized sets of Debian packages from a YAML manifest")]
#[command(version)]
pub struct Cli {
    /// Path to the YAML file containing the packages to install
    #[arg(short, long, default_value = DEFAULT_MANIFEST_PATH)]
    pub file: PathBuf,

    /// Name of the category to install
    #[arg(short, long)]
    pub category: String,

    /// Names of the subcategories to install
    #[arg(short, long, num_args = 0..)]
    pub subcategories: Vec<String>,

    /// Dry-run mode: show what would be installed without changing anything.
    ///
    /// Installed-state queries still run so the listing is accurate; the
    /// index refresh, the install and the stamp file update are skipped.
    #[arg(long)]
    pub dry_run: bool,

    /// File recording the last package index refresh
    /// [default: ~/.install_packages_last_update]
    #[arg(long, value_name = "PATH")]
    pub state_file: Option<PathBuf>,

    /// Minimum seconds between automatic package index refreshes
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_REFRESH_INTERVAL)]
    pub refresh_interval: u64,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Resolve defaults and build the installer options
    pub fn into_options(self) -> Result<RunOptions> {
        let stamp_path = match self.state_file {
            Some(path) => path,
            None => cache::default_stamp_path().ok_or_else(|| {
                InstallerError::Io(io::Error::new(
                    io::ErrorKind::NotFound,
                    "cannot determine the home directory for the stamp file",
                ))
            })?,
        };

        Ok(RunOptions {
            manifest_path: self.file,
            category: self.category,
            subcategories: self.subcategories,
            stamp_path,
            refresh_interval: self.refresh_interval,
            dry_run: self.dry_run,
            kernel_release: None,
            color: crate::report::color_enabled(),
        })
    }
}
