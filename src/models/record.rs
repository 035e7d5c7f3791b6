//! Shared record vocabulary: kinds, partitions and the [`Addressed`] view.

use super::{NetworkAddress, VrfId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned identity of a Prefix or IP address record.
pub type RecordId = u64;

/// Which table a record lives in. Uniqueness never crosses kinds.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordKind {
    Prefix,
    IpAddress,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Prefix => write!(f, "prefix"),
            RecordKind::IpAddress => write!(f, "IP address"),
        }
    }
}

/// Uniqueness domain of a record: global, or one VRF.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Partition {
    Global,
    Vrf(VrfId),
}

impl Partition {
    pub fn of(vrf: Option<VrfId>) -> Partition {
        match vrf {
            Some(id) => Partition::Vrf(id),
            None => Partition::Global,
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Partition::Global => write!(f, "global table"),
            Partition::Vrf(id) => write!(f, "VRF #{id}"),
        }
    }
}

/// Anything admitted under the uniqueness policy.
pub trait Addressed {
    const KIND: RecordKind;

    fn network(&self) -> &NetworkAddress;
    fn vrf(&self) -> Option<VrfId>;
    /// Persisted identity, `None` for a record not yet created.
    fn record_id(&self) -> Option<RecordId>;

    fn partition(&self) -> Partition {
        Partition::of(self.vrf())
    }
}
