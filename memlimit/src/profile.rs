// SPDX-License-Identifier: MIT OR Apache-2.0
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use valimit::{LimitEdits, VaResource};

/// Limits loaded from a YAML file. Sizes are in MB.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct LimitProfile {
    #[serde(default)]
    pub persist: bool,
    pub non_paged_pool: Option<u32>,
    pub paged_pool: Option<u32>,
    pub system_cache: Option<u32>,
    pub system_ptes: Option<u32>,
    pub session_space: Option<u32>,
}

impl LimitProfile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProfileError> {
        let file = File::open(path).map_err(ProfileError::OpenFile)?;

        Self::from_file(file).map_err(ProfileError::ReadFile)
    }

    pub fn from_file(file: impl Read) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_reader(file)
    }

    pub fn edits(&self) -> LimitEdits {
        let mut edits = LimitEdits::new();
        let values = [
            (VaResource::NonPagedPool, self.non_paged_pool),
            (VaResource::PagedPool, self.paged_pool),
            (VaResource::SystemCache, self.system_cache),
            (VaResource::SystemPtes, self.system_ptes),
            (VaResource::SessionSpace, self.session_space),
        ];

        for (r, v) in values {
            if let Some(mb) = v {
                edits.set(r, mb);
            }
        }

        edits
    }
}

/// Represents an error when [`LimitProfile::load()`] fails.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("couldn't open the file")]
    OpenFile(#[source] std::io::Error),

    #[error("couldn't read the file")]
    ReadFile(#[source] serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_profile() {
        let yaml = b"persist: true\nnon-paged-pool: 256\nsystem-ptes: 0\n";
        let p = LimitProfile::from_file(&yaml[..]).unwrap();
        let edits = p.edits();

        assert!(p.persist);
        assert_eq!(edits.get(VaResource::NonPagedPool), Some(256));
        assert_eq!(edits.get(VaResource::SystemPtes), Some(0));
        assert_eq!(edits.get(VaResource::PagedPool), None);
        assert_eq!(edits.iter().count(), 2);
    }

    #[test]
    fn empty_profile() {
        let p = LimitProfile::from_file(&b"{}"[..]).unwrap();

        assert!(!p.persist);
        assert!(p.edits().is_empty());
    }

    #[test]
    fn unknown_key() {
        assert!(LimitProfile::from_file(&b"page-pool: 12\n"[..]).is_err());
    }

    #[test]
    fn negative_size() {
        assert!(LimitProfile::from_file(&b"paged-pool: -1\n"[..]).is_err());
    }
}
