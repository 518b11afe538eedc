// SPDX-License-Identifier: MIT OR Apache-2.0
use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::fmt::{Display, Formatter};
use std::ops::{Index, IndexMut};

/// Number of entries in [`VaLimitRecord`]. The kernel rejects any other shape.
pub const VA_RESOURCE_COUNT: usize = 5;

/// Kernel subsystem that consumes system VA space.
///
/// The discriminant is the position of the resource in [`VaLimitRecord::entries`] and is fixed by
/// the kernel.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
pub enum VaResource {
    NonPagedPool = 0,
    PagedPool = 1,
    SystemCache = 2,
    SystemPtes = 3,
    SessionSpace = 4,
}

impl VaResource {
    pub const ALL: [Self; VA_RESOURCE_COUNT] = [
        Self::NonPagedPool,
        Self::PagedPool,
        Self::SystemCache,
        Self::SystemPtes,
        Self::SessionSpace,
    ];

    pub fn index(self) -> usize {
        u8::from(self).into()
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::NonPagedPool => "Non Paged Pool",
            Self::PagedPool => "Paged Pool",
            Self::SystemCache => "System Cache",
            Self::SystemPtes => "System PTEs",
            Self::SessionSpace => "Session Space",
        }
    }
}

impl Display for VaResource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Usage and limit of a single [`VaResource`]. All quantities are in bytes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct VaResourceEntry {
    pub current: u64,
    /// Highest value of [`Self::current`] the kernel has seen.
    pub peak: u64,
    /// Zero means no limit is enforced.
    pub limit: u64,
    /// Number of allocations denied because of [`Self::limit`].
    pub failures: u64,
}

impl VaResourceEntry {
    pub fn is_limited(&self) -> bool {
        self.limit != 0
    }
}

/// Snapshot of system VA consumption as reported by the kernel.
///
/// The kernel only accepts this record as a whole. Changing a limit means querying a complete
/// record, mutating the targeted [`VaResourceEntry::limit`] and submitting the record back.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct VaLimitRecord {
    pub available_va: u64,
    pub available_va_low: u64,
    /// Unknown meaning. Must be sent back as-is.
    pub reserved: u64,
    pub total_failures: u64,
    pub entries: [VaResourceEntry; VA_RESOURCE_COUNT],
}

impl VaLimitRecord {
    pub fn iter(&self) -> impl Iterator<Item = (VaResource, &VaResourceEntry)> {
        VaResource::ALL.into_iter().zip(&self.entries)
    }

    pub fn limits(&self) -> [u64; VA_RESOURCE_COUNT] {
        self.entries.map(|e| e.limit)
    }
}

impl Index<VaResource> for VaLimitRecord {
    type Output = VaResourceEntry;

    fn index(&self, index: VaResource) -> &Self::Output {
        &self.entries[index.index()]
    }
}

impl IndexMut<VaResource> for VaLimitRecord {
    fn index_mut(&mut self, index: VaResource) -> &mut Self::Output {
        &mut self.entries[index.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_index() {
        for (i, r) in VaResource::ALL.into_iter().enumerate() {
            assert_eq!(r.index(), i);
            assert_eq!(VaResource::try_from(i as u8).unwrap(), r);
        }

        assert!(VaResource::try_from(5u8).is_err());
    }

    #[test]
    fn record_iter() {
        let mut rec = VaLimitRecord::default();

        rec[VaResource::SystemPtes].limit = 0x400000;
        rec[VaResource::SessionSpace].current = 0x1000;

        let items: Vec<_> = rec.iter().map(|(r, e)| (r, *e)).collect();

        assert_eq!(items.len(), VA_RESOURCE_COUNT);
        assert_eq!(items[3].0, VaResource::SystemPtes);
        assert_eq!(items[3].1.limit, 0x400000);
        assert_eq!(items[4].1.current, 0x1000);
        assert_eq!(rec.limits(), [0, 0, 0, 0x400000, 0]);
    }

    #[test]
    fn zero_limit_is_unlimited() {
        let e = VaResourceEntry {
            current: 0x10000000,
            peak: 0x20000000,
            limit: 0,
            failures: 3,
        };

        assert!(!e.is_limited());
    }
}
