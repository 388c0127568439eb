//! Process enumeration and identification from `/proc`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{Pid, ScanError};

const PROC_ROOT: &str = "/proc";

/// List every process currently visible under `/proc`.
///
/// Best effort: the listing is a snapshot, and processes that exit before
/// they are inspected are the caller's to skip.
///
/// # Errors
/// Returns an error if `/proc` itself cannot be listed.
pub fn list_pids() -> Result<Vec<Pid>, ScanError> {
    let proc_dir = fs::read_dir(PROC_ROOT).map_err(ScanError::ProcUnavailable)?;

    let mut pids: Vec<Pid> = proc_dir
        .flatten()
        .filter_map(|entry| entry.file_name().to_str().and_then(|name| name.parse().ok()))
        .map(Pid)
        .collect();
    pids.sort_unstable();
    Ok(pids)
}

/// Command name of a process, or an empty string if it cannot be read.
#[must_use]
pub fn read_comm(pid: Pid) -> String {
    comm_under(Path::new(PROC_ROOT), pid)
}

/// `comm` first, then the parenthesised field of `stat`
fn comm_under(root: &Path, pid: Pid) -> String {
    let dir = root.join(pid.0.to_string());
    match fs::read_to_string(dir.join("comm")) {
        Ok(comm) => comm.trim_end_matches('\n').to_string(),
        Err(_) => fs::read_to_string(dir.join("stat"))
            .ok()
            .as_deref()
            .and_then(stat_comm)
            .map(str::to_string)
            .unwrap_or_default(),
    }
}

/// Resolve binary path from PID via `/proc/<pid>/exe`.
///
/// Kernel threads and processes of other users have no readable link.
#[must_use]
pub fn read_exe(pid: Pid) -> Option<PathBuf> {
    fs::read_link(Path::new(PROC_ROOT).join(pid.0.to_string()).join("exe")).ok()
}

/// The `comm` field of a stat line, `pid (comm) state ...`
///
/// The name itself may contain `)`, so it runs to the last one.
fn stat_comm(stat: &str) -> Option<&str> {
    let (_, rest) = stat.split_once('(')?;
    let (comm, _) = rest.rsplit_once(')')?;
    Some(comm)
}

/// Whether a process answers to `pattern`
///
/// `pattern` may be a bare name or a path. The command name and the
/// executable's file name are each compared against it, exactly on the
/// pattern's file name or as a substring of the whole pattern. Names that
/// could not be read never match.
#[must_use]
pub fn is_match(command: &str, exe_path: Option<&Path>, pattern: &str) -> bool {
    let wanted = file_name(Path::new(pattern)).unwrap_or(pattern);
    let exe = exe_path.and_then(file_name);

    [Some(command), exe]
        .into_iter()
        .flatten()
        .filter(|name| !name.is_empty())
        .any(|name| name == wanted || name.contains(pattern))
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name()?.to_str()
}
