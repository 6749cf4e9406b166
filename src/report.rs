//! Terminal output of the install workflow.
//!
//! Installed packages print green with their version, pending packages blue.
//! Colour is dropped when `NO_COLOR` is set.

use crossterm::style::Stylize;
use std::io::{self, Write};

use crate::status::InstallPlan;

/// Write the installed/pending listing for `plan`
pub fn write_plan<W: Write>(out: &mut W, plan: &InstallPlan, color: bool) -> io::Result<()> {
    if !plan.installed.is_empty() {
        writeln!(out, "Packages already installed:")?;
        for (package, version) in &plan.installed {
            let line = format!("{} ({})", package, version);
            if color {
                writeln!(out, "{}", line.green())?;
            } else {
                writeln!(out, "{}", line)?;
            }
        }
    }

    if plan.has_pending() {
        writeln!(out, "Packages to install:")?;
        for package in &plan.pending {
            if color {
                writeln!(out, "{}", package.as_str().blue())?;
            } else {
                writeln!(out, "{}", package)?;
            }
        }
    } else {
        writeln!(out, "No new packages to install.")?;
    }

    Ok(())
}

/// Whether stdout output should be coloured
pub fn color_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none_or(|value| value.is_empty())
}
