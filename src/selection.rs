//! Resolution of a category/subcategory selection into a package set.

use std::collections::BTreeSet;

use crate::error::{InstallerError, Result};
use crate::manifest::Category;

/// Placeholder rewritten to the header package of the running kernel
pub const LINUX_HEADERS_TOKEN: &str = "linux_headers";

/// Header package name for a kernel release, e.g. `linux-headers-6.1.0-18-amd64`
pub fn linux_headers_package(kernel_release: &str) -> String {
    format!("linux-headers-{}", kernel_release)
}

/// Release string of the running kernel, as `uname -r` prints it
pub fn kernel_release() -> Result<String> {
    let uts = nix::sys::utsname::uname()
        .map_err(|errno| InstallerError::Io(std::io::Error::from(errno)))?;
    Ok(uts.release().to_string_lossy().into_owned())
}

/// Collect the packages of the selected subcategories plus the category's
/// `other_packages`.
///
/// Unknown subcategories contribute nothing. Every `linux_headers` entry is
/// replaced by the header package for `kernel_release`, blank entries are
/// dropped and duplicates collapse.
pub fn resolve(
    category: &Category,
    subcategories: &[String],
    kernel_release: &str,
) -> BTreeSet<String> {
    let mut packages: Vec<&str> = Vec::new();

    for name in subcategories {
        match category.subcategory(name) {
            Some(list) => packages.extend(list.iter().map(String::as_str)),
            None => tracing::debug!("Subcategory '{}' not in category, skipping", name),
        }
    }
    packages.extend(category.other_packages.iter().map(String::as_str));

    packages
        .into_iter()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| {
            if name == LINUX_HEADERS_TOKEN {
                linux_headers_package(kernel_release)
            } else {
                name.to_string()
            }
        })
        .collect()
}
