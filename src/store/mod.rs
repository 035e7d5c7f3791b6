//! Object store interface and implementations.
//!
//! The admission logic only talks to [`ObjectStore`]; persistence technology is
//! up to the implementor:
//! - [`memory`] - in-process tables behind a lock
//! - [`snapshot`] - JSON snapshot files for the memory store

mod memory;
mod snapshot;

pub use memory::{MemoryStore, StoreSnapshot};
pub use snapshot::{default_snapshot_file, read_store_snapshot, write_store_snapshot};

use crate::error::StoreError;
use crate::models::{
    IpAddress, NetworkAddress, NewIpAddress, NewPrefix, NewVrf, Partition, Prefix, RecordId,
    RecordKind, Vrf, VrfId,
};

/// Persistence contract consumed by the admission API.
///
/// `insert_*`/`update_*` with `unique == true` must reject an equal
/// `(kind, network, partition)` with [`StoreError::UniqueViolation`] atomically
/// with the write. That check is the final authority; the validator in front of
/// it is a fast path.
pub trait ObjectStore: Send + Sync {
    fn vrf(&self, id: VrfId) -> Result<Option<Vrf>, StoreError>;
    fn vrfs(&self) -> Result<Vec<Vrf>, StoreError>;
    fn create_vrf(&self, new: NewVrf) -> Result<Vrf, StoreError>;
    fn set_enforce_unique(&self, id: VrfId, enforce_unique: bool) -> Result<Vrf, StoreError>;
    /// Fails with [`StoreError::VrfInUse`] while records reference the VRF.
    fn delete_vrf(&self, id: VrfId) -> Result<(), StoreError>;

    /// Ids of records of `kind` with exactly `network` in `partition`, minus `exclude`.
    fn find_duplicates(
        &self,
        kind: RecordKind,
        network: &NetworkAddress,
        partition: Partition,
        exclude: Option<RecordId>,
    ) -> Result<Vec<RecordId>, StoreError>;

    fn prefix(&self, id: RecordId) -> Result<Option<Prefix>, StoreError>;
    fn prefixes(&self) -> Result<Vec<Prefix>, StoreError>;
    fn insert_prefix(&self, new: NewPrefix, unique: bool) -> Result<Prefix, StoreError>;
    fn update_prefix(&self, prefix: Prefix, unique: bool) -> Result<Prefix, StoreError>;

    fn ip_address(&self, id: RecordId) -> Result<Option<IpAddress>, StoreError>;
    fn ip_addresses(&self) -> Result<Vec<IpAddress>, StoreError>;
    fn insert_ip_address(&self, new: NewIpAddress, unique: bool)
        -> Result<IpAddress, StoreError>;
    fn update_ip_address(&self, address: IpAddress, unique: bool)
        -> Result<IpAddress, StoreError>;
}
