// SPDX-License-Identifier: MIT OR Apache-2.0
#![cfg_attr(not(target_os = "windows"), allow(dead_code))]

use crate::{ChannelError, VA_RESOURCE_COUNT, VaLimitRecord, VaResource, VaResourceEntry};

/// Layout of the system VA list the kernel reads and writes.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RawVaList {
    pub available_va: u32,
    pub available_va_low: u32,
    pub reserved: u32,
    pub total_failures: u32,
    pub entries: [RawVaEntry; VA_RESOURCE_COUNT],
}

/// Layout of a single entry in [`RawVaList`].
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RawVaEntry {
    pub number: u32,
    pub peak: u32,
    pub limit: u32,
    pub failures: u32,
}

const _: () = assert!(size_of::<RawVaList>() == 96);

impl From<&RawVaList> for VaLimitRecord {
    fn from(value: &RawVaList) -> Self {
        Self {
            available_va: value.available_va.into(),
            available_va_low: value.available_va_low.into(),
            reserved: value.reserved.into(),
            total_failures: value.total_failures.into(),
            entries: value.entries.map(|e| VaResourceEntry {
                current: e.number.into(),
                peak: e.peak.into(),
                limit: e.limit.into(),
                failures: e.failures.into(),
            }),
        }
    }
}

impl TryFrom<&VaLimitRecord> for RawVaList {
    type Error = ChannelError;

    fn try_from(value: &VaLimitRecord) -> Result<Self, Self::Error> {
        let mut raw = Self {
            available_va: narrow("available VA", value.available_va)?,
            available_va_low: narrow("available low VA", value.available_va_low)?,
            reserved: narrow("reserved", value.reserved)?,
            total_failures: narrow("total failures", value.total_failures)?,
            entries: Default::default(),
        };

        for (r, e) in value.iter() {
            let limit = e
                .limit
                .try_into()
                .map_err(|_| ChannelError::LimitOutOfRange(r, e.limit))?;

            raw.entries[r.index()] = RawVaEntry {
                number: narrow_entry(r, "usage", e.current)?,
                peak: narrow_entry(r, "peak", e.peak)?,
                limit,
                failures: narrow_entry(r, "failures", e.failures)?,
            };
        }

        Ok(raw)
    }
}

fn narrow(field: &'static str, v: u64) -> Result<u32, ChannelError> {
    v.try_into()
        .map_err(|_| ChannelError::FieldOutOfRange(field, v))
}

fn narrow_entry(r: VaResource, field: &'static str, v: u64) -> Result<u32, ChannelError> {
    v.try_into()
        .map_err(|_| ChannelError::EntryOutOfRange(r, field, v))
}
