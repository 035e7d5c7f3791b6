//! Prefix (address block) data model.

use super::{Addressed, NetworkAddress, RecordId, RecordKind, VrfId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Operational status of a prefix.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PrefixStatus {
    Container,
    #[default]
    Active,
    Reserved,
    Deprecated,
}

/// A persisted address block.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Prefix {
    pub id: RecordId,
    /// Network with host bits cleared.
    pub prefix: NetworkAddress,
    pub vrf: Option<VrfId>,
    pub status: PrefixStatus,
    /// All addresses in the block are usable (no network/broadcast reservation).
    pub is_pool: bool,
    pub description: String,
    pub created: DateTime<Utc>,
}

/// Candidate prefix, not yet admitted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NewPrefix {
    pub prefix: NetworkAddress,
    #[serde(default)]
    pub vrf: Option<VrfId>,
    #[serde(default)]
    pub status: PrefixStatus,
    #[serde(default)]
    pub is_pool: bool,
    #[serde(default)]
    pub description: String,
}

impl NewPrefix {
    /// A prefix with default attributes.
    pub fn new(prefix: NetworkAddress, vrf: Option<VrfId>) -> NewPrefix {
        NewPrefix {
            prefix,
            vrf,
            status: PrefixStatus::default(),
            is_pool: false,
            description: String::new(),
        }
    }

    pub(crate) fn persist(self, id: RecordId) -> Prefix {
        Prefix {
            id,
            prefix: self.prefix,
            vrf: self.vrf,
            status: self.status,
            is_pool: self.is_pool,
            description: self.description,
            created: Utc::now(),
        }
    }
}

impl Addressed for NewPrefix {
    const KIND: RecordKind = RecordKind::Prefix;

    fn network(&self) -> &NetworkAddress {
        &self.prefix
    }
    fn vrf(&self) -> Option<VrfId> {
        self.vrf
    }
    fn record_id(&self) -> Option<RecordId> {
        None
    }
}

impl Addressed for Prefix {
    const KIND: RecordKind = RecordKind::Prefix;

    fn network(&self) -> &NetworkAddress {
        &self.prefix
    }
    fn vrf(&self) -> Option<VrfId> {
        self.vrf
    }
    fn record_id(&self) -> Option<RecordId> {
        Some(self.id)
    }
}
