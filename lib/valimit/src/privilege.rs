// SPDX-License-Identifier: MIT OR Apache-2.0
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Process privilege this crate knows how to enable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Privilege {
    /// Required to change system VA limits.
    IncreaseQuota,
}

impl Privilege {
    pub fn name(self) -> &'static str {
        match self {
            Self::IncreaseQuota => "SeIncreaseQuotaPrivilege",
        }
    }
}

impl Display for Privilege {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Proof that a [`Privilege`] has been enabled for the current process.
///
/// This is not [`Clone`]. Outside this crate the only way to get one is from
/// [`PrivilegeGate::acquire()`].
#[derive(Debug)]
pub struct PrivilegeToken {
    privilege: Privilege,
}

impl PrivilegeToken {
    pub(crate) fn new(privilege: Privilege) -> Self {
        Self { privilege }
    }

    /// Creates a token for a [`PrivilegeGate`] implemented outside this crate.
    ///
    /// # Safety
    /// `privilege` must already be enabled on the current process. Passing a token for a
    /// privilege that was not enabled makes [`crate::VaLimitChannel::apply()`] issue a kernel call
    /// that is going to be rejected.
    pub unsafe fn new_unchecked(privilege: Privilege) -> Self {
        Self::new(privilege)
    }

    pub fn privilege(&self) -> Privilege {
        self.privilege
    }
}

/// Enables privileges on the current process.
///
/// Enabling a privilege stays in effect until the process exit. Acquiring the same privilege
/// again has no additional effect.
pub trait PrivilegeGate {
    fn acquire(&self, privilege: Privilege) -> Result<PrivilegeToken, PrivilegeError>;
}

/// Represents an error when [`PrivilegeGate::acquire()`] fails.
#[derive(Debug, Error)]
pub enum PrivilegeError {
    #[error("{0} is not held by the current account")]
    NotHeld(Privilege),

    #[error("couldn't open the access token of the current process")]
    OpenTokenFailed(#[source] std::io::Error),

    #[error("couldn't lookup {0}")]
    LookupFailed(Privilege, #[source] std::io::Error),

    #[error("couldn't enable {0}")]
    AdjustFailed(Privilege, #[source] std::io::Error),

    #[error("privileges are not supported on this platform")]
    UnsupportedPlatform,
}
