// SPDX-License-Identifier: MIT OR Apache-2.0
use std::ffi::c_void;
use windows_sys::Win32::Foundation::NTSTATUS;

#[link(name = "ntdll")]
unsafe extern "system" {
    pub fn NtQuerySystemInformation(
        class: i32,
        info: *mut c_void,
        len: u32,
        ret: *mut u32,
    ) -> NTSTATUS;

    pub fn NtSetSystemInformation(class: i32, info: *const c_void, len: u32) -> NTSTATUS;
}
