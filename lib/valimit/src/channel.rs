// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::{Privilege, PrivilegeToken, VaLimitRecord, VaResource};
use thiserror::Error;

/// Privilege that [`VaLimitChannel::apply()`] requires.
pub const APPLY_PRIVILEGE: Privilege = Privilege::IncreaseQuota;

const STATUS_NOT_IMPLEMENTED: i32 = 0xC0000002u32 as i32;
const STATUS_INVALID_INFO_CLASS: i32 = 0xC0000003u32 as i32;
const STATUS_INFO_LENGTH_MISMATCH: i32 = 0xC0000004u32 as i32;
const STATUS_ACCESS_DENIED: i32 = 0xC0000022u32 as i32;
const STATUS_PRIVILEGE_NOT_HELD: i32 = 0xC0000061u32 as i32;

/// Transport of [`VaLimitRecord`] to and from the kernel.
///
/// Both methods are a single blocking call. There is no per-field update so [`Self::apply()`]
/// always submits the whole record.
pub trait VaLimitChannel {
    /// Reads the current record. This never changes kernel state and needs no privilege.
    fn query(&self) -> Result<VaLimitRecord, ChannelError>;

    /// Submits `record`. The kernel only takes [`crate::VaResourceEntry::limit`] from it.
    ///
    /// Implementors must fail with [`ChannelError::PermissionDenied`] if `token` is not for
    /// [`APPLY_PRIVILEGE`].
    fn apply(&self, token: &PrivilegeToken, record: &VaLimitRecord) -> Result<(), ChannelError>;
}

/// Represents an error when [`VaLimitChannel`] fails.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("the kernel doesn't support system VA limits")]
    UnsupportedPlatform,

    #[error("the caller doesn't hold SeIncreaseQuotaPrivilege")]
    PermissionDenied,

    #[error("limit of {1} bytes for {0} is too large for the kernel")]
    LimitOutOfRange(VaResource, u64),

    #[error("{0} of {1} doesn't fit in the kernel record")]
    FieldOutOfRange(&'static str, u64),

    #[error("{1} of {2} for {0} doesn't fit in the kernel record")]
    EntryOutOfRange(VaResource, &'static str, u64),

    #[error("the kernel returned {0} bytes instead of {1}")]
    UnexpectedLength(usize, usize),

    #[error("the kernel returned status {0:#010x}")]
    Status(i32),
}

impl ChannelError {
    /// Maps a failed NTSTATUS to an error.
    pub fn from_status(status: i32) -> Self {
        match status {
            STATUS_NOT_IMPLEMENTED | STATUS_INVALID_INFO_CLASS | STATUS_INFO_LENGTH_MISMATCH => {
                Self::UnsupportedPlatform
            }
            STATUS_ACCESS_DENIED | STATUS_PRIVILEGE_NOT_HELD => Self::PermissionDenied,
            v => Self::Status(v),
        }
    }
}

/// Returns [`ChannelError::PermissionDenied`] if `token` cannot be used for
/// [`VaLimitChannel::apply()`].
pub fn check_apply_token(token: &PrivilegeToken) -> Result<(), ChannelError> {
    if token.privilege() == APPLY_PRIVILEGE {
        Ok(())
    } else {
        Err(ChannelError::PermissionDenied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS_INVALID_PARAMETER: i32 = 0xC000000Du32 as i32;

    #[test]
    fn status_classification() {
        assert!(matches!(
            ChannelError::from_status(0xC0000003u32 as i32),
            ChannelError::UnsupportedPlatform
        ));
        assert!(matches!(
            ChannelError::from_status(0xC0000004u32 as i32),
            ChannelError::UnsupportedPlatform
        ));
        assert!(matches!(
            ChannelError::from_status(0xC0000061u32 as i32),
            ChannelError::PermissionDenied
        ));
        assert!(matches!(
            ChannelError::from_status(0xC0000022u32 as i32),
            ChannelError::PermissionDenied
        ));
        assert!(matches!(
            ChannelError::from_status(STATUS_INVALID_PARAMETER),
            ChannelError::Status(STATUS_INVALID_PARAMETER)
        ));
    }

    #[test]
    fn status_message() {
        let e = ChannelError::from_status(STATUS_INVALID_PARAMETER);

        assert_eq!(e.to_string(), "the kernel returned status 0xc000000d");
    }

    #[test]
    fn apply_token() {
        let token = PrivilegeToken::new(Privilege::IncreaseQuota);

        assert!(check_apply_token(&token).is_ok());
    }
}
