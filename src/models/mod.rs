//! Domain models for the IPAM core.
//!
//! This module contains the core data structures used throughout the crate:
//! - [`NetworkAddress`] - IPv4/IPv6 address with prefix length
//! - [`Vrf`] - routing scope with its uniqueness flag
//! - [`Prefix`] and [`IpAddress`] - the records admitted under the uniqueness policy
//! - [`Partition`] and [`RecordKind`] - the keys uniqueness is scoped by

mod ip_address;
mod network;
mod prefix;
mod record;
mod vrf;

// Re-export public types
pub use ip_address::{IpAddress, IpAddressStatus, NewIpAddress};
pub use network::{
    cut_addr, get_cidr_mask, max_length, network_of, NetworkAddress, MAX_LENGTH_V4,
    MAX_LENGTH_V6,
};
pub use prefix::{NewPrefix, Prefix, PrefixStatus};
pub use record::{Addressed, Partition, RecordId, RecordKind};
pub use vrf::{validate_rd, NewVrf, Vrf, VrfId};
