//! Manifest comparison and reporting
//!
//! The manifest says which build-id each tracked library should have today.
//! A running process whose mapped copy carries a different build-id is
//! still executing the old code, and becomes a [`Finding`].

pub mod checker;
pub mod manifest;
pub mod report;

pub use checker::{check, expected_update, Finding};
pub use manifest::{FileManifest, HttpManifest, Manifest, ManifestSource, DEFAULT_MANIFEST_URL};
pub use report::ComplianceReport;
