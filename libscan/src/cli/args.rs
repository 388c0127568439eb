//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;

use crate::compliance::DEFAULT_MANIFEST_URL;

#[derive(Parser, Debug)]
#[command(
    name = "libscan",
    version,
    about = "Find running processes that still map outdated shared libraries",
    after_help = "\
EXAMPLES:
    sudo libscan                              Audit every process
    sudo libscan nginx                        Audit processes named nginx
    sudo libscan --pid 1234 --pid 5678        Audit specific processes
    libscan --manifest-file userspace.json    Compare against a local manifest

EXIT STATUS:
    0  no outdated libraries (or --report-only)
    1  at least one outdated library
    2  usage error
    3  fatal error (manifest unavailable, /proc unreadable)

ENVIRONMENT:
    LOGLEVEL (or RUST_LOG)  log verbosity, e.g. LOGLEVEL=debug"
)]
pub struct Args {
    /// Only audit processes with this command or executable name
    #[arg(value_name = "PROCESS")]
    pub process: Option<String>,

    /// Only audit this process (repeatable)
    #[arg(short, long = "pid", value_name = "PID")]
    pub pids: Vec<i32>,

    /// URL of the expected build-id manifest
    #[arg(long, value_name = "URL", default_value = DEFAULT_MANIFEST_URL)]
    pub manifest_url: String,

    /// Read the manifest from a local JSON file instead of fetching it
    #[arg(long, value_name = "FILE", conflicts_with = "manifest_url")]
    pub manifest_file: Option<PathBuf>,

    /// Manifest fetch timeout in seconds
    #[arg(long, value_name = "SECS", default_value = "30")]
    pub timeout: u64,

    /// Only check mappings whose file name looks like a shared object
    #[arg(long)]
    pub shared_objects_only: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Exit 0 after a completed scan even if outdated libraries were found
    #[arg(long)]
    pub report_only: bool,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,
}
