//! Structured error types for libscan
//!
//! Using thiserror for automatic Display implementation and error chaining.

use super::types::Pid;
use thiserror::Error;

/// OS introspection failures that are not permission or process-exit races
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Failed to list processes under /proc: {0}")]
    ProcUnavailable(#[source] std::io::Error),

    #[error("Failed to read /proc/{pid}/maps: {source}")]
    MapsReadFailed {
        pid: i32,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open memory of process {0}: {1}")]
    MemoryOpenFailed(Pid, #[source] std::io::Error),
}

/// Reasons a mapped library yields no build-id
///
/// None of these are fatal: every variant collapses to an unknown
/// fingerprint and is only surfaced in debug logs.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("not an ELF image")]
    BadMagic,

    #[error("unsupported ELF class {0} (only 64-bit is handled)")]
    UnsupportedClass(u8),

    #[error("unsupported ELF data encoding {0} (only little-endian is handled)")]
    UnsupportedEndian(u8),

    #[error("no program header table")]
    NoProgramHeaders,

    #[error("no build-id note")]
    NoBuildId,

    #[error("truncated {0}")]
    Truncated(&'static str),

    #[error("malformed ELF: {0}")]
    Malformed(#[from] object::read::Error),

    #[error("permission denied")]
    PermissionDenied,

    #[error("process exited")]
    Vanished,

    #[error("mapping has no ranges")]
    NoRanges,

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Manifest retrieval failures; always fatal to the run
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Failed to fetch manifest from {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to read manifest file {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid manifest JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failures that end an audit run without a verdict
#[derive(Error, Debug)]
pub enum AuditError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Scan(#[from] ScanError),
}
