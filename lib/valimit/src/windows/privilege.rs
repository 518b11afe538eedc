// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::{Privilege, PrivilegeError, PrivilegeGate, PrivilegeToken};
use std::io::Error;
use std::ptr::{null, null_mut};
use windows_sys::Win32::Foundation::{CloseHandle, ERROR_NOT_ALL_ASSIGNED, HANDLE, LUID};
use windows_sys::Win32::Security::{
    AdjustTokenPrivileges, LUID_AND_ATTRIBUTES, LookupPrivilegeValueW, SE_PRIVILEGE_ENABLED,
    TOKEN_ADJUST_PRIVILEGES, TOKEN_PRIVILEGES, TOKEN_QUERY,
};
use windows_sys::Win32::System::Threading::{GetCurrentProcess, OpenProcessToken};

/// Implementation of [`PrivilegeGate`] that enables privileges on the access token of the current
/// process.
#[derive(Debug, Default)]
pub struct SystemGate;

impl PrivilegeGate for SystemGate {
    fn acquire(&self, privilege: Privilege) -> Result<PrivilegeToken, PrivilegeError> {
        // Open our token.
        let mut token = null_mut();
        let access = TOKEN_ADJUST_PRIVILEGES | TOKEN_QUERY;

        if unsafe { OpenProcessToken(GetCurrentProcess(), access, &mut token) } == 0 {
            return Err(PrivilegeError::OpenTokenFailed(Error::last_os_error()));
        }

        let token = Token(token);

        // Get LUID of the privilege.
        let name = privilege
            .name()
            .encode_utf16()
            .chain(std::iter::once(0))
            .collect::<Vec<u16>>();
        let mut luid = LUID {
            LowPart: 0,
            HighPart: 0,
        };

        if unsafe { LookupPrivilegeValueW(null(), name.as_ptr(), &mut luid) } == 0 {
            return Err(PrivilegeError::LookupFailed(
                privilege,
                Error::last_os_error(),
            ));
        }

        // Enable it.
        let state = TOKEN_PRIVILEGES {
            PrivilegeCount: 1,
            Privileges: [LUID_AND_ATTRIBUTES {
                Luid: luid,
                Attributes: SE_PRIVILEGE_ENABLED,
            }],
        };

        if unsafe { AdjustTokenPrivileges(token.0, 0, &state, 0, null_mut(), null_mut()) } == 0 {
            return Err(PrivilegeError::AdjustFailed(
                privilege,
                Error::last_os_error(),
            ));
        }

        // AdjustTokenPrivileges also succeeds when the account does not have the privilege.
        if Error::last_os_error().raw_os_error() == Some(ERROR_NOT_ALL_ASSIGNED as i32) {
            return Err(PrivilegeError::NotHeld(privilege));
        }

        Ok(PrivilegeToken::new(privilege))
    }
}

/// RAII struct to close the token when dropped.
struct Token(HANDLE);

impl Drop for Token {
    fn drop(&mut self) {
        assert_ne!(unsafe { CloseHandle(self.0) }, 0);
    }
}
