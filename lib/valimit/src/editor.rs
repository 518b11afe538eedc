// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::{VA_RESOURCE_COUNT, VaLimitRecord, VaResource};

/// Number of bytes in one megabyte as understood by the kernel.
pub const BYTES_PER_MB: u64 = 1024 * 1024;

/// Converts a size in whole megabytes to bytes.
///
/// No rounding is done here. The kernel rounds the limit up to its allocation boundary (2 MB
/// with PAE, 4 MB without) when the record is applied.
pub fn mb_to_bytes(mb: u32) -> u64 {
    u64::from(mb) * BYTES_PER_MB
}

/// Set of requested limits in megabytes, keyed by [`VaResource`].
///
/// A resource without a value is left untouched when the edits are applied. A value of zero
/// removes the limit.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LimitEdits([Option<u32>; VA_RESOURCE_COUNT]);

impl LimitEdits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, resource: VaResource, mb: u32) -> &mut Self {
        self.0[resource.index()] = Some(mb);
        self
    }

    pub fn get(&self, resource: VaResource) -> Option<u32> {
        self.0[resource.index()]
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }

    pub fn iter(&self) -> impl Iterator<Item = (VaResource, u32)> + '_ {
        VaResource::ALL
            .into_iter()
            .filter_map(|r| self.get(r).map(|mb| (r, mb)))
    }

    /// Returns the limit in bytes that will be written for `resource`.
    pub fn requested_bytes(&self, resource: VaResource) -> Option<u64> {
        self.get(resource).map(mb_to_bytes)
    }

    /// Writes the requested limits into `record`. Other fields are not touched.
    pub fn apply(&self, record: &mut VaLimitRecord) {
        for (r, mb) in self.iter() {
            record[r].limit = mb_to_bytes(mb);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VaResourceEntry;

    fn sample() -> VaLimitRecord {
        let mut rec = VaLimitRecord {
            available_va: 0x30000000,
            available_va_low: 0x8000000,
            reserved: 0xdead,
            total_failures: 7,
            ..Default::default()
        };

        for (i, e) in rec.entries.iter_mut().enumerate() {
            let i = i as u64 + 1;

            *e = VaResourceEntry {
                current: i * 0x100000,
                peak: i * 0x200000,
                limit: i * 0x400000,
                failures: i,
            };
        }

        rec
    }

    #[test]
    fn apply_targets_only_edited() {
        let before = sample();
        let mut rec = before.clone();
        let mut edits = LimitEdits::new();

        edits
            .set(VaResource::PagedPool, 512)
            .set(VaResource::SystemPtes, 64);
        edits.apply(&mut rec);

        assert_eq!(rec[VaResource::PagedPool].limit, 512 * 1024 * 1024);
        assert_eq!(rec[VaResource::SystemPtes].limit, 64 * 1024 * 1024);

        for r in [
            VaResource::NonPagedPool,
            VaResource::SystemCache,
            VaResource::SessionSpace,
        ] {
            assert_eq!(rec[r], before[r]);
        }

        assert_eq!(rec.available_va, before.available_va);
        assert_eq!(rec.reserved, before.reserved);
        assert_eq!(rec.total_failures, before.total_failures);
        assert_eq!(rec[VaResource::PagedPool].current, before[VaResource::PagedPool].current);
    }

    #[test]
    fn zero_removes_limit() {
        let mut rec = sample();
        let mut edits = LimitEdits::new();

        edits.set(VaResource::SystemCache, 0);

        assert!(!edits.is_empty());
        assert_eq!(edits.get(VaResource::SystemCache), Some(0));
        assert_eq!(edits.get(VaResource::PagedPool), None);

        edits.apply(&mut rec);

        assert_eq!(rec[VaResource::SystemCache].limit, 0);
        assert!(!rec[VaResource::SystemCache].is_limited());
        assert!(rec[VaResource::PagedPool].is_limited());
    }

    #[test]
    fn empty_edits() {
        let before = sample();
        let mut rec = before.clone();
        let edits = LimitEdits::new();

        assert!(edits.is_empty());
        assert_eq!(edits.iter().count(), 0);

        edits.apply(&mut rec);

        assert_eq!(rec, before);
    }

    #[test]
    fn large_size_does_not_wrap() {
        assert_eq!(mb_to_bytes(u32::MAX), u64::from(u32::MAX) << 20);
        assert_eq!(mb_to_bytes(4096), 0x100000000);
    }
}
