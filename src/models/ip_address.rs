//! IP address data model.

use super::{Addressed, NetworkAddress, RecordId, RecordKind, VrfId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Operational status of an IP address.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum IpAddressStatus {
    #[default]
    Active,
    Reserved,
    Deprecated,
    Dhcp,
}

/// A persisted host address.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct IpAddress {
    pub id: RecordId,
    /// Host address plus the mask of its subnet, e.g. `192.0.2.1/24`.
    pub address: NetworkAddress,
    pub vrf: Option<VrfId>,
    pub status: IpAddressStatus,
    pub description: String,
    pub created: DateTime<Utc>,
}

/// Candidate address, not yet admitted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NewIpAddress {
    pub address: NetworkAddress,
    #[serde(default)]
    pub vrf: Option<VrfId>,
    #[serde(default)]
    pub status: IpAddressStatus,
    #[serde(default)]
    pub description: String,
}

impl NewIpAddress {
    pub fn new(address: NetworkAddress, vrf: Option<VrfId>) -> NewIpAddress {
        NewIpAddress {
            address,
            vrf,
            status: IpAddressStatus::default(),
            description: String::new(),
        }
    }

    pub(crate) fn persist(self, id: RecordId) -> IpAddress {
        IpAddress {
            id,
            address: self.address,
            vrf: self.vrf,
            status: self.status,
            description: self.description,
            created: Utc::now(),
        }
    }
}

impl Addressed for NewIpAddress {
    const KIND: RecordKind = RecordKind::IpAddress;

    fn network(&self) -> &NetworkAddress {
        &self.address
    }
    fn vrf(&self) -> Option<VrfId> {
        self.vrf
    }
    fn record_id(&self) -> Option<RecordId> {
        None
    }
}

impl Addressed for IpAddress {
    const KIND: RecordKind = RecordKind::IpAddress;

    fn network(&self) -> &NetworkAddress {
        &self.address
    }
    fn vrf(&self) -> Option<VrfId> {
        self.vrf
    }
    fn record_id(&self) -> Option<RecordId> {
        Some(self.id)
    }
}
