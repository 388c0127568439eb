//! # libscan - Outdated Shared Library Auditor
//!
//! libscan finds running processes that still execute an old copy of a
//! shared library. When a package update replaces `libssl.so.3` on disk,
//! every process started before the update keeps the previous version
//! mapped until it restarts. libscan fingerprints the copy each process
//! actually has mapped and compares it against a manifest of the build-ids
//! that should be running today.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       /proc (kernel)                         │
//! │   /proc/<pid>/maps      /proc/<pid>/mem      /proc/<pid>/comm│
//! └──────────────┬───────────────────┬───────────────────────────┘
//!                │ mapping tables    │ mapped bytes
//!                ▼                   │
//! ┌──────────────────────────┐       │
//! │  procfs + libraries      │       │
//! │  pid → [LibraryRef]      │       │
//! └──────────────┬───────────┘       │
//!                │ (pid, inode, pathname)
//!                ▼                   │
//! ┌──────────────────────────┐   ┌───┴──────────────────────┐
//! │  correlate               │──▶│  fingerprint             │
//! │  inode cache, picks disk │   │  ELF notes → build-id    │
//! │  or live memory          │◀──│  disk file or            │
//! └──────────────┬───────────┘   │  LiveMemoryReader        │
//!                │               └──────────────────────────┘
//!                │ (pid, basename, build-id)
//!                ▼
//! ┌──────────────────────────┐   ┌──────────────────────────┐
//! │  compliance              │◀──│  manifest (HTTP / file)  │
//! │  Findings → report       │   │  basename → build-id     │
//! └──────────────────────────┘   └──────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - [`procfs`]: process listing, maps parsing, command names, with
//!   permission and exit races surfaced as [`procfs::Access`]
//! - [`libraries`]: which mappings are real files worth fingerprinting
//! - [`fingerprint`]: GNU build-id extraction from an ELF image, read from
//!   disk or reassembled from a process's memory
//! - [`correlate`]: per-inode cache and the disk-or-memory decision
//! - [`scan`]: drives the above over every selected process
//! - [`compliance`]: manifest retrieval, comparison, report rendering
//! - [`audit`]: the full run, manifest first
//! - [`domain`]: newtypes and error enums
//! - [`cli`], [`preflight`]: command line and environment checks
//!
//! ## Why Live Memory
//!
//! If the file at a mapped pathname has a different inode than the
//! mapping, the disk copy has been replaced (or deleted) since the process
//! loaded it. Reading the disk would fingerprint the new version, so the
//! build-id is read from `/proc/<pid>/mem` instead, translating ELF file
//! offsets into the virtual addresses where that inode is mapped.
//!
//! ## Typical Usage
//!
//! ```bash
//! # Audit every process against the upstream manifest
//! sudo libscan
//!
//! # Audit nginx against a local manifest, JSON output
//! sudo libscan nginx --manifest-file userspace.json --json
//! ```

pub mod audit;
pub mod cli;
pub mod compliance;
pub mod correlate;
pub mod domain;
pub mod fingerprint;
pub mod libraries;
pub mod preflight;
pub mod procfs;
pub mod scan;
