//! Installed-state checking.

use std::collections::BTreeMap;

use crate::backend::PackageBackend;
use crate::error::Result;

/// Packages split by whether they are already installed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallPlan {
    /// Installed package → version (empty if the record carried none)
    pub installed: BTreeMap<String, String>,
    /// Packages to install, in query order
    pub pending: Vec<String>,
}

impl InstallPlan {
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

/// Version field of a `dpkg -s` status record.
///
/// Takes the value of the first line starting with `Version:`.
pub fn parse_version(status: &str) -> Option<String> {
    status
        .lines()
        .find(|line| line.starts_with("Version:"))
        .and_then(|line| line.split_whitespace().nth(1))
        .map(str::to_string)
}

/// Query every package and partition the set into installed and pending
pub fn check_installed<'a, I>(backend: &dyn PackageBackend, packages: I) -> Result<InstallPlan>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut plan = InstallPlan::default();

    for package in packages {
        match backend.query(package)? {
            Some(record) => {
                let version = parse_version(&record).unwrap_or_default();
                tracing::debug!("{} is installed ({})", package, version);
                plan.installed.insert(package.clone(), version);
            }
            None => {
                tracing::debug!("{} is not installed", package);
                plan.pending.push(package.clone());
            }
        }
    }

    tracing::info!(
        "{} package(s) installed, {} pending",
        plan.installed.len(),
        plan.pending.len()
    );
    Ok(plan)
}
