//! Admission and containment logic.
//!
//! This module contains the rules applied before and after records are written:
//! - [`scope`] - effective uniqueness policy for a candidate
//! - [`uniqueness`] - exact-duplicate rejection
//! - [`containment`] - auto-creation of an address's containing prefix
//! - [`admission`] - the public create/update entry points
//! - [`queries`] - duplicate and child lookups

mod admission;
mod containment;
mod queries;
mod scope;
mod uniqueness;

// Re-export public functions
pub use admission::{
    admit_ip_address, admit_prefix, register_vrf, update_ip_address, update_prefix,
    IpAddressAdmission,
};
pub use containment::{repair_containment, RepairOutcome};
pub use queries::{child_ip_addresses, ip_address_duplicates, prefix_duplicates};
pub use scope::{resolve_scope, EffectivePolicy};
pub use uniqueness::validate_unique;
