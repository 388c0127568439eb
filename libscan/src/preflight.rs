//! Pre-flight checks for libscan
//!
//! Validates the environment before a scan starts and turns the common
//! problems into clear, actionable messages.

#![allow(unsafe_code)] // geteuid() requires unsafe

use anyhow::{bail, Context, Result};
use log::warn;
use std::path::Path;

use crate::domain::Pid;

/// Run all pre-flight checks before scanning
///
/// # Errors
/// Returns an error if `/proc` cannot be listed.
pub fn run_preflight_checks(quiet: bool) -> Result<()> {
    check_proc_mounted()?;
    check_privileges(quiet);
    Ok(())
}

fn check_proc_mounted() -> Result<()> {
    std::fs::read_dir("/proc").context(
        "Cannot read /proc\n\n\
         libscan needs procfs to enumerate processes.\n\
         Check that /proc is mounted and visible in this namespace.",
    )?;
    Ok(())
}

/// An unprivileged scan still works, but only sees its own user's processes
fn check_privileges(quiet: bool) {
    if is_root() || quiet {
        return;
    }
    warn!(
        "Not running as root: processes of other users cannot be inspected \
         and their libraries will be reported as unknown. Run with: sudo libscan ..."
    );
}

fn is_root() -> bool {
    unsafe { libc::geteuid() == 0 }
}

/// Check that a process requested with `--pid` exists
///
/// # Errors
/// Returns an error if `/proc/<pid>` does not exist.
pub fn check_process_exists(pid: Pid) -> Result<()> {
    let proc_path = format!("/proc/{}", pid.0);
    if !Path::new(&proc_path).exists() {
        bail!(
            "Process {} not found.\n\n\
             Is the process still running? Check with: ps -p {}",
            pid.0,
            pid.0
        );
    }
    Ok(())
}
