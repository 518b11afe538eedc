// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::{
    APPLY_PRIVILEGE, ChannelError, LimitEdits, LimitStore, PersistError, Privilege,
    PrivilegeError, PrivilegeGate, VaLimitChannel, VaLimitRecord, VaResource, mb_to_bytes,
};
use thiserror::Error;

/// What a single invocation should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Read the current record without changing anything.
    Query,
    /// Change the limits in `edits` then read the record again.
    Set { edits: LimitEdits, persist: bool },
}

/// Result of [`execute()`].
#[derive(Debug)]
pub struct Outcome {
    /// Latest record from the kernel. For [`Request::Set`] this is the record after the limits
    /// were applied.
    pub record: VaLimitRecord,
    pub applied: bool,
    pub persisted: bool,
    /// Edited resources where the kernel ended up with a different limit than requested.
    pub adjustments: Vec<LimitAdjustment>,
}

/// Limit that the kernel changed while applying it (e.g. rounded up to the allocation boundary).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitAdjustment {
    pub resource: VaResource,
    pub requested: u64,
    pub actual: u64,
}

/// Runs `req` to completion.
///
/// For [`Request::Set`] this acquires [`APPLY_PRIVILEGE`] first, then queries the record, applies
/// `edits` to it, submits it, persists `edits` if requested and queries the record again. The
/// first failure stops everything. Nothing is retried or rolled back.
pub fn execute<G, C, S>(
    req: &Request,
    gate: &G,
    channel: &C,
    store: &S,
) -> Result<Outcome, SessionError>
where
    G: PrivilegeGate + ?Sized,
    C: VaLimitChannel + ?Sized,
    S: LimitStore + ?Sized,
{
    let (edits, persist) = match req {
        Request::Query => {
            let record = channel.query().map_err(SessionError::Query)?;

            return Ok(Outcome {
                record,
                applied: false,
                persisted: false,
                adjustments: Vec::new(),
            });
        }
        Request::Set { edits, persist } => (edits, *persist),
    };

    // Get privilege before touching the kernel.
    let token = gate
        .acquire(APPLY_PRIVILEGE)
        .map_err(|e| SessionError::AcquirePrivilege(APPLY_PRIVILEGE, e))?;

    // Apply the edits on a complete record.
    let mut record = channel.query().map_err(SessionError::Query)?;

    edits.apply(&mut record);

    channel.apply(&token, &record).map_err(SessionError::Apply)?;

    if persist {
        store.persist(edits).map_err(SessionError::Persist)?;
    }

    // The kernel may round the limits so use the new record as the source of truth.
    let record = channel.query().map_err(SessionError::Requery)?;
    let adjustments = edits
        .iter()
        .filter_map(|(r, mb)| {
            let requested = mb_to_bytes(mb);
            let actual = record[r].limit;

            (requested != actual).then_some(LimitAdjustment {
                resource: r,
                requested,
                actual,
            })
        })
        .collect();

    Ok(Outcome {
        record,
        applied: true,
        persisted: persist,
        adjustments,
    })
}

/// Broad class of a [`SessionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The running OS has no system VA limit facility.
    UnsupportedPlatform,
    /// The process is not elevated or the account lacks a required privilege.
    PermissionDenied,
    Other,
}

/// Represents an error when [`execute()`] fails.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("couldn't acquire {0}")]
    AcquirePrivilege(Privilege, #[source] PrivilegeError),

    #[error("couldn't query system VA limits")]
    Query(#[source] ChannelError),

    #[error("couldn't set system VA limits")]
    Apply(#[source] ChannelError),

    #[error("limits were set but couldn't be made persistent")]
    Persist(#[source] PersistError),

    #[error("limits were set but couldn't query them back")]
    Requery(#[source] ChannelError),
}

impl SessionError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::AcquirePrivilege(_, PrivilegeError::UnsupportedPlatform) => {
                FailureKind::UnsupportedPlatform
            }
            Self::AcquirePrivilege(_, _) => FailureKind::PermissionDenied,
            Self::Query(e) | Self::Apply(e) | Self::Requery(e) => match e {
                ChannelError::UnsupportedPlatform => FailureKind::UnsupportedPlatform,
                ChannelError::PermissionDenied => FailureKind::PermissionDenied,
                _ => FailureKind::Other,
            },
            Self::Persist(PersistError::UnsupportedPlatform) => FailureKind::UnsupportedPlatform,
            Self::Persist(e) if e.is_access_denied() => FailureKind::PermissionDenied,
            Self::Persist(_) => FailureKind::Other,
        }
    }
}
