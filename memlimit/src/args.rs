// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::profile::{LimitProfile, ProfileError};
use clap::Parser;
use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;
use valimit::{Request, VaResource};

const SIZE_NOTE: &str = "\
A size of 0 means no limit is enforced.
Sizes are in MB automatically rounded up to the next system VA allocation boundary,
which is 2 MB on 32-bit systems that have Physical Address Extension (PAE) enabled
and 4 MB on 32-bit systems that do not have PAE enabled.";

/// Query and set hard limits on system VA space consumption.
///
/// Sizes are kept as text until we know `-q` is not present since `-q` ignores every other flag.
#[derive(Debug, Parser)]
#[command(version, after_help = SIZE_NOTE)]
pub struct CliArgs {
    #[arg(
        short = 'q',
        help = "Query the current consumption, peak and limits on system VA without setting any limit"
    )]
    query: bool,

    #[arg(
        short = 'r',
        help = "Write the limits being set to the registry, making them persistent"
    )]
    persist: bool,

    #[arg(
        short = 'n',
        value_name = "MB",
        help = "Maximum amount of system VA space that can be used by the nonpaged pool (may be exceeded by a small amount)"
    )]
    non_paged_pool: Option<String>,

    #[arg(
        short = 'p',
        value_name = "MB",
        help = "Maximum amount of system VA space that can be used by the paged pool"
    )]
    paged_pool: Option<String>,

    #[arg(
        short = 'c',
        value_name = "MB",
        help = "Maximum amount of system VA space that can be used by the system cache (may be exceeded by a small amount)"
    )]
    system_cache: Option<String>,

    #[arg(
        short = 't',
        value_name = "MB",
        help = "Maximum amount of system VA space that can be used by I/O mappings and other resources that consume system PTEs"
    )]
    system_ptes: Option<String>,

    #[arg(
        short = 's',
        value_name = "MB",
        help = "Maximum amount of system VA space that can be used by session space allocations"
    )]
    session_space: Option<String>,

    #[arg(
        short = 'f',
        long,
        value_name = "FILE",
        help = "Load limits from a YAML file. Limits on the command line take precedence"
    )]
    profile: Option<PathBuf>,
}

impl CliArgs {
    /// Turns the arguments into a [`Request`]. `-q` always wins.
    pub fn into_request(self) -> Result<Request, ArgsError> {
        if self.query {
            return Ok(Request::Query);
        }

        // Load profile.
        let profile = match self.profile {
            Some(path) => {
                LimitProfile::load(&path).map_err(|e| ArgsError::LoadProfile(path, e))?
            }
            None => LimitProfile::default(),
        };

        // Command line overrides the profile.
        let mut edits = profile.edits();
        let values = [
            ('n', VaResource::NonPagedPool, self.non_paged_pool),
            ('p', VaResource::PagedPool, self.paged_pool),
            ('c', VaResource::SystemCache, self.system_cache),
            ('t', VaResource::SystemPtes, self.system_ptes),
            ('s', VaResource::SessionSpace, self.session_space),
        ];

        for (flag, r, v) in values {
            if let Some(v) = v {
                let mb = v
                    .parse()
                    .map_err(|e| ArgsError::InvalidSize(flag, v, e))?;

                edits.set(r, mb);
            }
        }

        if edits.is_empty() {
            return Err(ArgsError::NoAction);
        }

        Ok(Request::Set {
            edits,
            persist: self.persist || profile.persist,
        })
    }
}

/// Represents an error when [`CliArgs::into_request()`] fails.
#[derive(Debug, Error)]
pub enum ArgsError {
    #[error("nothing to query or set")]
    NoAction,

    #[error("invalid size '{1}' for -{0}")]
    InvalidSize(char, String, #[source] ParseIntError),

    #[error("couldn't load {}", .0.display())]
    LoadProfile(PathBuf, #[source] ProfileError),
}
