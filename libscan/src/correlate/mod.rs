//! Build-id cache and correlator
//!
//! Joins resolved libraries back to the processes that map them. A library
//! such as `libc.so.6` is mapped by nearly every process, so results are
//! memoized by inode and each distinct file is fingerprinted once per scan.

pub mod cache;
pub mod correlator;

pub use cache::BuildIdCache;
pub use correlator::{choose_source, ByteSource, Correlator, CorrelatorStats, Observation};
