// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Error type for named-semaphore operations.

use std::io;

use thiserror::Error;

/// Failure of a named-semaphore operation.
///
/// "Would block" and "timed out" are never reported through this type; the
/// waiting primitives return `Ok(false)` for those.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SemaphoreError {
    /// The name was rejected before reaching the OS.
    #[error("invalid semaphore name {name:?}: {reason}")]
    InvalidName { name: String, reason: &'static str },

    /// A syscall failed. `source` carries the errno captured right after the call.
    #[error("{op} failed: {source}")]
    Os {
        op: &'static str,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, SemaphoreError>;

impl SemaphoreError {
    pub(crate) fn os(op: &'static str, source: io::Error) -> Self {
        Self::Os { op, source }
    }

    pub(crate) fn invalid_name(name: &str, reason: &'static str) -> Self {
        Self::InvalidName {
            name: name.to_string(),
            reason,
        }
    }

    /// Raw OS error code, if this error came from a syscall.
    pub fn code(&self) -> Option<i32> {
        match self {
            Self::Os { source, .. } => source.raw_os_error(),
            Self::InvalidName { .. } => None,
        }
    }

    /// The operation that failed (`"sem_open"`, `"sem_post"`, ...).
    pub fn op(&self) -> Option<&'static str> {
        match self {
            Self::Os { op, .. } => Some(op),
            Self::InvalidName { .. } => None,
        }
    }

    pub fn kind(&self) -> io::ErrorKind {
        match self {
            Self::Os { source, .. } => source.kind(),
            Self::InvalidName { .. } => io::ErrorKind::InvalidInput,
        }
    }

    /// True when the named object does not exist.
    pub fn is_not_found(&self) -> bool {
        self.kind() == io::ErrorKind::NotFound
    }
}

impl From<SemaphoreError> for io::Error {
    fn from(e: SemaphoreError) -> Self {
        match e {
            SemaphoreError::Os { op, source } => {
                io::Error::new(source.kind(), format!("{op} failed: {source}"))
            }
            SemaphoreError::InvalidName { name, reason } => io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid semaphore name {name:?}: {reason}"),
            ),
        }
    }
}
