// SPDX-License-Identifier: MIT OR Apache-2.0
pub use self::privilege::SystemGate;
pub use self::registry::SystemStore;

use self::ffi::{NtQuerySystemInformation, NtSetSystemInformation};
use crate::wire::RawVaList;
use crate::{ChannelError, PrivilegeToken, VaLimitChannel, VaLimitRecord, check_apply_token};

mod ffi;
mod privilege;
mod registry;

/// Undocumented information class of the system VA list. Only available since Vista SP1 and
/// Server 2008.
const SYSTEM_VA_LIST_INFORMATION: i32 = 106;

const RAW_LEN: u32 = size_of::<RawVaList>() as u32;

/// Implementation of [`VaLimitChannel`] using `NtQuerySystemInformation` and
/// `NtSetSystemInformation`.
#[derive(Debug, Default)]
pub struct SystemChannel;

impl SystemChannel {
    pub fn new() -> Self {
        Self
    }
}

impl VaLimitChannel for SystemChannel {
    fn query(&self) -> Result<VaLimitRecord, ChannelError> {
        let mut list = RawVaList::default();
        let mut len = 0;
        let status = unsafe {
            NtQuerySystemInformation(
                SYSTEM_VA_LIST_INFORMATION,
                (&raw mut list).cast(),
                RAW_LEN,
                &mut len,
            )
        };

        if status < 0 {
            return Err(ChannelError::from_status(status));
        }

        // Some kernels leave the length untouched.
        if len != 0 && len != RAW_LEN {
            return Err(ChannelError::UnexpectedLength(
                len as usize,
                RAW_LEN as usize,
            ));
        }

        Ok(VaLimitRecord::from(&list))
    }

    fn apply(&self, token: &PrivilegeToken, record: &VaLimitRecord) -> Result<(), ChannelError> {
        check_apply_token(token)?;

        let list = RawVaList::try_from(record)?;
        let status = unsafe {
            NtSetSystemInformation(SYSTEM_VA_LIST_INFORMATION, (&raw const list).cast(), RAW_LEN)
        };

        if status < 0 {
            Err(ChannelError::from_status(status))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_twice() {
        let ch = SystemChannel::new();
        let first = match ch.query() {
            Ok(v) => v,
            Err(ChannelError::UnsupportedPlatform) => return,
            Err(e) => panic!("couldn't query system VA limits: {e}"),
        };
        let second = ch.query().unwrap();

        assert_eq!(first.limits(), second.limits());
        assert_eq!(first.reserved, second.reserved);
    }
}
