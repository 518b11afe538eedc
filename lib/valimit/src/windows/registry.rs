// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::{LimitEdits, LimitStore, PersistError, VaResource};
use std::io::Error;
use std::ptr::{null, null_mut};
use windows_sys::Win32::Foundation::ERROR_SUCCESS;
use windows_sys::Win32::System::Registry::{
    HKEY, HKEY_LOCAL_MACHINE, KEY_SET_VALUE, REG_DWORD, REG_OPTION_NON_VOLATILE, RegCloseKey,
    RegCreateKeyExW, RegSetValueExW,
};
use windows_sys::core::PCWSTR;
use windows_sys::w;

const KEY: &str =
    "HKEY_LOCAL_MACHINE\\SYSTEM\\CurrentControlSet\\Control\\Session Manager\\Memory Management";

/// Implementation of [`LimitStore`] that writes the limits to the memory management key. The
/// values are in MB.
#[derive(Debug, Default)]
pub struct SystemStore;

impl LimitStore for SystemStore {
    fn persist(&self, edits: &LimitEdits) -> Result<(), PersistError> {
        // Open the key.
        let mut key = null_mut();
        let e = unsafe {
            RegCreateKeyExW(
                HKEY_LOCAL_MACHINE,
                w!("SYSTEM\\CurrentControlSet\\Control\\Session Manager\\Memory Management"),
                0,
                null(),
                REG_OPTION_NON_VOLATILE,
                KEY_SET_VALUE,
                null(),
                &mut key,
                null_mut(),
            )
        };

        if e != ERROR_SUCCESS {
            return Err(PersistError::OpenKey(KEY, Error::from_raw_os_error(e as i32)));
        }

        let key = Key(key);

        // Write the values.
        for (r, mb) in edits.iter() {
            let e = unsafe {
                RegSetValueExW(
                    key.0,
                    value_name(r),
                    0,
                    REG_DWORD,
                    (&raw const mb).cast(),
                    size_of::<u32>() as u32,
                )
            };

            if e != ERROR_SUCCESS {
                return Err(PersistError::WriteValue(
                    r,
                    Error::from_raw_os_error(e as i32),
                ));
            }
        }

        Ok(())
    }
}

fn value_name(r: VaResource) -> PCWSTR {
    match r {
        VaResource::NonPagedPool => w!("NonPagedPoolLimit"),
        VaResource::PagedPool => w!("PagedPoolLimit"),
        VaResource::SystemCache => w!("SystemCacheLimit"),
        VaResource::SystemPtes => w!("SystemPtesLimit"),
        VaResource::SessionSpace => w!("SessionSpaceLimit"),
    }
}

/// RAII struct to close `HKEY` when dropped.
struct Key(HKEY);

impl Drop for Key {
    fn drop(&mut self) {
        assert_eq!(unsafe { RegCloseKey(self.0) }, ERROR_SUCCESS);
    }
}
