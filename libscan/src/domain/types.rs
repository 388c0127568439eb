//! Newtype wrappers for the identifiers that flow through a scan

use serde::{Deserialize, Serialize};
use std::fmt;

/// Process ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Pid(pub i32);

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PID:{}", self.0)
    }
}

/// Inode number of a mapped file
///
/// This is the content identity of a library: two mappings with the same
/// inode are fingerprinted once per scan, whatever their pathnames say.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Inode(pub u64);

impl Inode {
    /// Anonymous mappings report inode 0
    #[must_use]
    pub fn is_anonymous(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Inode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// GNU build-id rendered as lowercase hex
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct BuildId(String);

impl BuildId {
    /// Render raw note descriptor bytes
    #[must_use]
    pub fn from_bytes(desc: &[u8]) -> Self {
        Self(hex::encode(desc))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for BuildId {
    fn from(hex: String) -> Self {
        Self(hex.to_ascii_lowercase())
    }
}

impl From<&str> for BuildId {
    fn from(hex: &str) -> Self {
        Self(hex.to_ascii_lowercase())
    }
}

impl From<BuildId> for String {
    fn from(id: BuildId) -> Self {
        id.0
    }
}

impl fmt::Display for BuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of fingerprinting one mapped library
///
/// `Unknown` carries no information. Like a floating point NaN it is not
/// equal to anything, including another `Unknown`, so it can never count as
/// a match or a mismatch.
#[derive(Debug, Clone)]
pub enum Fingerprint {
    Known(BuildId),
    Unknown,
}

impl Fingerprint {
    #[must_use]
    pub fn build_id(&self) -> Option<&BuildId> {
        match self {
            Self::Known(id) => Some(id),
            Self::Unknown => None,
        }
    }

    #[must_use]
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }
}

impl PartialEq for Fingerprint {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Known(a), Self::Known(b)) => a == b,
            _ => false,
        }
    }
}

impl From<Option<BuildId>> for Fingerprint {
    fn from(id: Option<BuildId>) -> Self {
        id.map_or(Self::Unknown, Self::Known)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(id) => write!(f, "{id}"),
            Self::Unknown => f.write_str("<unknown>"),
        }
    }
}
