// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::{LimitEdits, VaResource};
use thiserror::Error;

/// Makes limits survive a reboot.
///
/// The kernel reads persisted limits during boot so they only take effect on the next start.
pub trait LimitStore {
    /// Persists the limits in `edits`. Resources without a value are left as-is.
    fn persist(&self, edits: &LimitEdits) -> Result<(), PersistError>;
}

/// Represents an error when [`LimitStore::persist()`] fails.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("couldn't open {0}")]
    OpenKey(&'static str, #[source] std::io::Error),

    #[error("couldn't write limit for {0}")]
    WriteValue(VaResource, #[source] std::io::Error),

    #[error("persistent limits are not supported on this platform")]
    UnsupportedPlatform,
}

impl PersistError {
    pub fn is_access_denied(&self) -> bool {
        let e = match self {
            Self::OpenKey(_, e) | Self::WriteValue(_, e) => e,
            Self::UnsupportedPlatform => return false,
        };

        e.kind() == std::io::ErrorKind::PermissionDenied
    }
}
