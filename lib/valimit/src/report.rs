// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::VaLimitRecord;
use std::fmt::{Display, Formatter};

/// Human-readable table of a [`VaLimitRecord`].
///
/// All sizes are printed in KB, truncating. The layout is not meant to be parsed.
pub struct Report<'a>(&'a VaLimitRecord);

impl<'a> Report<'a> {
    pub fn new(record: &'a VaLimitRecord) -> Self {
        Self(record)
    }
}

impl Display for Report<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let r = self.0;

        writeln!(f, "System VA Consumption:")?;
        writeln!(f)?;
        writeln!(
            f,
            "{:<16}{:>16}{:>16}{:>16}{:>10}",
            "Type", "Current", "Peak", "Limit", "Failures"
        )?;

        for (res, e) in r.iter() {
            writeln!(
                f,
                "{:<16}{:>13} KB{:>13} KB{:>13} KB{:>10}",
                res.name(),
                kb(e.current),
                kb(e.peak),
                kb(e.limit),
                e.failures
            )?;
        }

        writeln!(f)?;
        writeln!(
            f,
            "Available VA: {} KB (low: {} KB)",
            kb(r.available_va),
            kb(r.available_va_low)
        )?;
        writeln!(f, "Total failures: {}", r.total_failures)
    }
}

fn kb(bytes: u64) -> u64 {
    bytes / 1024
}
