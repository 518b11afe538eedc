// SPDX-License-Identifier: MIT OR Apache-2.0
//! Query and constrain how much system virtual address space the kernel hands to its memory
//! subsystems.
//!
//! Everything goes through [`execute()`], which performs exactly one read-modify-write cycle
//! against a [`VaLimitChannel`].
pub use self::channel::*;
pub use self::editor::*;
pub use self::os::{SystemChannel, SystemGate, SystemStore};
pub use self::persist::*;
pub use self::privilege::*;
pub use self::record::*;
pub use self::report::*;
pub use self::session::*;

mod channel;
mod editor;
#[cfg_attr(target_os = "windows", path = "windows/mod.rs")]
#[cfg_attr(not(target_os = "windows"), path = "unsupported.rs")]
mod os;
mod persist;
mod privilege;
mod record;
mod report;
mod session;
mod wire;
