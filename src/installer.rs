//! Installer module
//!
//! Runs the whole workflow for one selection: pre-flight checks, manifest
//! lookup, package resolution, throttled index refresh, installed-state
//! check and the batch install of whatever is missing.

use std::io::Write;
use std::path::PathBuf;

use crate::backend::{PackageBackend, PackageCommand};
use crate::cache::{self, CacheStamp};
use crate::error::{InstallerError, Result};
use crate::manifest::Manifest;
use crate::report;
use crate::sanity::SanityCheckResult;
use crate::selection;
use crate::status::{self, InstallPlan};

/// Everything a run needs besides the backend
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub manifest_path: PathBuf,
    pub category: String,
    pub subcategories: Vec<String>,
    pub stamp_path: PathBuf,
    /// Seconds between throttled index refreshes
    pub refresh_interval: u64,
    /// Query only; never refresh, install or touch the stamp file
    pub dry_run: bool,
    /// Kernel release for `linux_headers`; read from the running kernel if unset
    pub kernel_release: Option<String>,
    pub color: bool,
}

/// What a successful run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// Every selected package was already installed
    NothingToInstall,
    /// The pending packages were handed to the package manager
    Installed { packages: Vec<String> },
    /// Dry run; these packages would have been installed
    DryRun { packages: Vec<String> },
}

/// Installer instance
pub struct Installer<'a> {
    options: RunOptions,
    backend: &'a dyn PackageBackend,
}

impl<'a> Installer<'a> {
    /// Create a new installer instance
    pub fn new(options: RunOptions, backend: &'a dyn PackageBackend) -> Self {
        Self { options, backend }
    }

    /// Run the workflow, writing the package report to `out`.
    ///
    /// Pre-flight, manifest and category errors return before any
    /// package-manager command is invoked.
    pub fn run<W: Write>(
        &self,
        preflight: SanityCheckResult,
        out: &mut W,
    ) -> Result<InstallOutcome> {
        preflight.into_result()?;

        let opts = &self.options;
        let manifest = Manifest::load_from_file(&opts.manifest_path)?;
        let category = manifest.category(&opts.category)?;

        let release = match &opts.kernel_release {
            Some(release) => release.clone(),
            None => selection::kernel_release()?,
        };
        let packages = selection::resolve(category, &opts.subcategories, &release);
        tracing::info!(
            "Selected {} package(s) from category '{}'",
            packages.len(),
            opts.category
        );

        let stamp = CacheStamp::new(&opts.stamp_path, opts.refresh_interval);
        let now = cache::now_epoch_secs();
        if opts.dry_run {
            tracing::info!("Dry run: not refreshing the package index");
        } else if stamp.is_stale(now) {
            writeln!(out, "Updating package cache...")?;
            out.flush()?;
            stamp.refresh_if_stale(self.backend, now)?;
        }

        let plan = status::check_installed(self.backend, &packages)?;
        report::write_plan(out, &plan, opts.color)?;

        let outcome = self.install_pending(plan, out)?;
        match outcome {
            InstallOutcome::DryRun { .. } => writeln!(out, "Dry run complete.")?,
            _ => writeln!(out, "Success!")?,
        }
        Ok(outcome)
    }

    fn install_pending<W: Write>(
        &self,
        plan: InstallPlan,
        out: &mut W,
    ) -> Result<InstallOutcome> {
        if !plan.has_pending() {
            return Ok(InstallOutcome::NothingToInstall);
        }
        let packages = plan.pending;

        if self.options.dry_run {
            writeln!(
                out,
                "Would run: {} && {} {}",
                PackageCommand::Refresh,
                PackageCommand::Install,
                packages.join(" ")
            )?;
            return Ok(InstallOutcome::DryRun { packages });
        }

        // Refresh right before installing regardless of the stamp
        let refresh = self.backend.refresh_index()?;
        if !refresh.success {
            tracing::warn!(
                "{} exited with {:?}, installing anyway",
                PackageCommand::Refresh,
                refresh.code
            );
        }

        tracing::info!("Installing {} package(s): {}", packages.len(), packages.join(" "));
        let status = self.backend.install(&packages)?;
        if !status.success {
            tracing::error!("{} exited with {:?}", PackageCommand::Install, status.code);
            return Err(InstallerError::InstallFailed { code: status.code });
        }

        Ok(InstallOutcome::Installed { packages })
    }
}
