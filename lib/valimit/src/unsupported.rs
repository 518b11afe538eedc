// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::{
    ChannelError, LimitEdits, LimitStore, PersistError, Privilege, PrivilegeError, PrivilegeGate,
    PrivilegeToken, VaLimitChannel, VaLimitRecord,
};

/// Implementation of [`VaLimitChannel`] for a platform without system VA limits.
#[derive(Debug, Default)]
pub struct SystemChannel;

impl SystemChannel {
    pub fn new() -> Self {
        Self
    }
}

impl VaLimitChannel for SystemChannel {
    fn query(&self) -> Result<VaLimitRecord, ChannelError> {
        Err(ChannelError::UnsupportedPlatform)
    }

    fn apply(&self, _: &PrivilegeToken, _: &VaLimitRecord) -> Result<(), ChannelError> {
        Err(ChannelError::UnsupportedPlatform)
    }
}

/// Implementation of [`PrivilegeGate`] for a platform without privileges.
#[derive(Debug, Default)]
pub struct SystemGate;

impl PrivilegeGate for SystemGate {
    fn acquire(&self, _: Privilege) -> Result<PrivilegeToken, PrivilegeError> {
        Err(PrivilegeError::UnsupportedPlatform)
    }
}

/// Implementation of [`LimitStore`] for a platform without persistent limits.
#[derive(Debug, Default)]
pub struct SystemStore;

impl LimitStore for SystemStore {
    fn persist(&self, _: &LimitEdits) -> Result<(), PersistError> {
        Err(PersistError::UnsupportedPlatform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FailureKind, Request, execute};

    #[test]
    fn everything_is_unsupported() {
        let e = execute(
            &Request::Query,
            &SystemGate,
            &SystemChannel::new(),
            &SystemStore,
        )
        .unwrap_err();

        assert_eq!(e.kind(), FailureKind::UnsupportedPlatform);

        let mut edits = LimitEdits::new();

        edits.set(crate::VaResource::PagedPool, 1);

        let req = Request::Set {
            edits,
            persist: true,
        };
        let e = execute(&req, &SystemGate, &SystemChannel::new(), &SystemStore).unwrap_err();

        assert_eq!(e.kind(), FailureKind::UnsupportedPlatform);
    }
}
