//! IPAM core: admission of prefixes and IP addresses under per-VRF or global
//! uniqueness, with optional auto-creation of an address's containing prefix.
//!
//! This crate is organized into the following modules:
//! - [`models`] - Domain types (NetworkAddress, Vrf, Prefix, IpAddress)
//! - [`store`] - Object store trait, in-memory store and JSON snapshots
//! - [`processing`] - Scope resolution, uniqueness, containment repair, admission API
//! - [`import`] - Batch import from JSON files
//! - [`output`] - Terminal summary
//! - [`config`] - Process-wide settings

pub mod config;
pub mod error;
pub mod import;
pub mod models;
pub mod output;
pub mod processing;
pub mod store;

pub use config::IpamConfig;
pub use error::{DuplicateError, IpamError, StoreError};
pub use processing::{admit_ip_address, admit_prefix, IpAddressAdmission, RepairOutcome};
