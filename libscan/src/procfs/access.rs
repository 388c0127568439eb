//! Typed outcome for OS introspection reads
//!
//! Reading another process's `/proc` entries races with that process and
//! with the permission model. Both are expected, so call sites get an
//! explicit [`Access`] instead of an error, and only genuinely unexpected
//! I/O failures propagate as `Err`.

use log::debug;
use std::io;

/// Result of an introspection read that may be refused or outraced
#[derive(Debug)]
pub enum Access<T> {
    Granted(T),
    /// EPERM / EACCES
    Denied,
    /// The process exited (ENOENT / ESRCH)
    Vanished,
}

impl<T> Access<T> {
    /// Sort an I/O result into granted, denied, vanished or a real error
    ///
    /// # Errors
    /// Returns the original error for every kind that is neither a
    /// permission failure nor a vanished process.
    pub fn classify(result: io::Result<T>, what: &str) -> io::Result<Self> {
        match result {
            Ok(value) => Ok(Self::Granted(value)),
            Err(err) if is_permission_error(&err) => {
                debug!("Permission error: {what}: {err}");
                Ok(Self::Denied)
            }
            Err(err) if is_vanished_error(&err) => {
                debug!("Gone before it could be read: {what}: {err}");
                Ok(Self::Vanished)
            }
            Err(err) => Err(err),
        }
    }

    pub fn granted(self) -> Option<T> {
        match self {
            Self::Granted(value) => Some(value),
            Self::Denied | Self::Vanished => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Access<U> {
        match self {
            Self::Granted(value) => Access::Granted(f(value)),
            Self::Denied => Access::Denied,
            Self::Vanished => Access::Vanished,
        }
    }
}

#[must_use]
pub fn is_permission_error(err: &io::Error) -> bool {
    matches!(err.raw_os_error(), Some(libc::EPERM | libc::EACCES))
        || err.kind() == io::ErrorKind::PermissionDenied
}

#[must_use]
pub fn is_vanished_error(err: &io::Error) -> bool {
    matches!(err.raw_os_error(), Some(libc::ENOENT | libc::ESRCH))
        || err.kind() == io::ErrorKind::NotFound
}
