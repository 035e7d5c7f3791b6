//! In-memory [`ObjectStore`].
//!
//! All tables sit behind one `RwLock`; every write that carries a uniqueness
//! constraint re-checks and inserts while holding the write guard.

use super::ObjectStore;
use crate::error::{DuplicateError, StoreError};
use crate::models::{
    Addressed, IpAddress, NetworkAddress, NewIpAddress, NewPrefix, NewVrf, Partition, Prefix,
    RecordId, RecordKind, Vrf, VrfId,
};
use chrono::Utc;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Serializable contents of a [`MemoryStore`].
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct StoreSnapshot {
    /// Last id handed out; ids are shared by all tables.
    pub last_id: u64,
    pub vrfs: BTreeMap<VrfId, Vrf>,
    pub prefixes: BTreeMap<RecordId, Prefix>,
    pub ip_addresses: BTreeMap<RecordId, IpAddress>,
}

impl StoreSnapshot {
    fn next_id(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }

    fn duplicates(
        &self,
        kind: RecordKind,
        network: &NetworkAddress,
        partition: Partition,
        exclude: Option<RecordId>,
    ) -> Vec<RecordId> {
        match kind {
            RecordKind::Prefix => matching(self.prefixes.values(), network, partition, exclude),
            RecordKind::IpAddress => {
                matching(self.ip_addresses.values(), network, partition, exclude)
            }
        }
    }

    fn check_unique<T: Addressed>(&self, record: &T) -> Result<(), StoreError> {
        let hits = self.duplicates(
            T::KIND,
            record.network(),
            record.partition(),
            record.record_id(),
        );
        if hits.is_empty() {
            Ok(())
        } else {
            Err(StoreError::UniqueViolation(DuplicateError {
                kind: T::KIND,
                network: *record.network(),
                partition: record.partition(),
            }))
        }
    }

    fn check_consistency(&mut self) -> Result<(), StoreError> {
        let invalid = |msg: String| Err(StoreError::InvalidSnapshot(msg));
        for (key, vrf) in &self.vrfs {
            if vrf.id != *key {
                return invalid(format!("VRF key {key} holds id {}", vrf.id));
            }
        }
        for (key, prefix) in &self.prefixes {
            if prefix.id != *key {
                return invalid(format!("prefix key {key} holds id {}", prefix.id));
            }
            if self.check_vrf_exists(prefix.vrf).is_err() {
                return invalid(format!(
                    "prefix #{key} {} references missing VRF {:?}",
                    prefix.prefix, prefix.vrf
                ));
            }
        }
        for (key, address) in &self.ip_addresses {
            if address.id != *key {
                return invalid(format!("IP address key {key} holds id {}", address.id));
            }
            if self.check_vrf_exists(address.vrf).is_err() {
                return invalid(format!(
                    "IP address #{key} {} references missing VRF {:?}",
                    address.address, address.vrf
                ));
            }
        }

        let max_id = [
            self.vrfs.keys().next_back(),
            self.prefixes.keys().next_back(),
            self.ip_addresses.keys().next_back(),
        ]
        .into_iter()
        .flatten()
        .copied()
        .max()
        .unwrap_or(0);
        if max_id > self.last_id {
            log::warn!("Snapshot last_id {} behind highest id {max_id}, raising it", self.last_id);
            self.last_id = max_id;
        }
        Ok(())
    }

    fn check_vrf_exists(&self, vrf: Option<VrfId>) -> Result<(), StoreError> {
        match vrf {
            Some(vrf_id) if !self.vrfs.contains_key(&vrf_id) => {
                Err(StoreError::VrfNotFound { vrf_id })
            }
            _ => Ok(()),
        }
    }
}

fn matching<'a, T, I>(
    records: I,
    network: &NetworkAddress,
    partition: Partition,
    exclude: Option<RecordId>,
) -> Vec<RecordId>
where
    T: Addressed + 'a,
    I: Iterator<Item = &'a T>,
{
    records
        .filter(|r| r.network() == network && r.partition() == partition)
        .filter_map(|r| r.record_id())
        .filter(|id| Some(*id) != exclude)
        .collect()
}

/// Thread-safe store kept in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<StoreSnapshot>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    /// Build a store from loaded tables.
    ///
    /// Rejects records whose `id` differs from their map key or that reference
    /// a missing VRF, and raises `last_id` to the highest id in use.
    pub fn from_snapshot(mut snapshot: StoreSnapshot) -> Result<MemoryStore, StoreError> {
        snapshot.check_consistency()?;
        Ok(MemoryStore {
            tables: RwLock::new(snapshot),
        })
    }

    /// Copy of the current tables.
    pub fn snapshot(&self) -> StoreSnapshot {
        self.tables.read().clone()
    }
}

impl ObjectStore for MemoryStore {
    fn vrf(&self, id: VrfId) -> Result<Option<Vrf>, StoreError> {
        Ok(self.tables.read().vrfs.get(&id).cloned())
    }

    fn vrfs(&self) -> Result<Vec<Vrf>, StoreError> {
        Ok(self.tables.read().vrfs.values().cloned().collect())
    }

    fn create_vrf(&self, new: NewVrf) -> Result<Vrf, StoreError> {
        let mut tables = self.tables.write();
        if let Some(rd) = &new.rd {
            if let Some(existing) = tables.vrfs.values().find(|v| v.rd.as_ref() == Some(rd)) {
                return Err(StoreError::DuplicateRd {
                    rd: rd.clone(),
                    vrf_id: existing.id,
                });
            }
        }
        let id = tables.next_id();
        let vrf = Vrf {
            id,
            name: new.name,
            rd: new.rd,
            enforce_unique: new.enforce_unique,
            description: new.description,
            created: Utc::now(),
        };
        tables.vrfs.insert(id, vrf.clone());
        log::debug!("store: created VRF #{id} {vrf}");
        Ok(vrf)
    }

    fn set_enforce_unique(&self, id: VrfId, enforce_unique: bool) -> Result<Vrf, StoreError> {
        let mut tables = self.tables.write();
        let vrf = tables
            .vrfs
            .get_mut(&id)
            .ok_or(StoreError::VrfNotFound { vrf_id: id })?;
        vrf.enforce_unique = enforce_unique;
        Ok(vrf.clone())
    }

    fn delete_vrf(&self, id: VrfId) -> Result<(), StoreError> {
        let mut tables = self.tables.write();
        if !tables.vrfs.contains_key(&id) {
            return Err(StoreError::VrfNotFound { vrf_id: id });
        }
        let count = tables
            .prefixes
            .values()
            .filter(|p| p.vrf == Some(id))
            .count()
            + tables
                .ip_addresses
                .values()
                .filter(|a| a.vrf == Some(id))
                .count();
        if count > 0 {
            return Err(StoreError::VrfInUse { vrf_id: id, count });
        }
        tables.vrfs.remove(&id);
        Ok(())
    }

    fn find_duplicates(
        &self,
        kind: RecordKind,
        network: &NetworkAddress,
        partition: Partition,
        exclude: Option<RecordId>,
    ) -> Result<Vec<RecordId>, StoreError> {
        Ok(self
            .tables
            .read()
            .duplicates(kind, network, partition, exclude))
    }

    fn prefix(&self, id: RecordId) -> Result<Option<Prefix>, StoreError> {
        Ok(self.tables.read().prefixes.get(&id).cloned())
    }

    fn prefixes(&self) -> Result<Vec<Prefix>, StoreError> {
        Ok(self.tables.read().prefixes.values().cloned().collect())
    }

    fn insert_prefix(&self, new: NewPrefix, unique: bool) -> Result<Prefix, StoreError> {
        let mut tables = self.tables.write();
        tables.check_vrf_exists(new.vrf)?;
        if unique {
            tables.check_unique(&new)?;
        }
        let id = tables.next_id();
        let prefix = new.persist(id);
        tables.prefixes.insert(id, prefix.clone());
        Ok(prefix)
    }

    fn update_prefix(&self, prefix: Prefix, unique: bool) -> Result<Prefix, StoreError> {
        let mut tables = self.tables.write();
        if !tables.prefixes.contains_key(&prefix.id) {
            return Err(StoreError::RecordNotFound {
                kind: RecordKind::Prefix,
                id: prefix.id,
            });
        }
        tables.check_vrf_exists(prefix.vrf)?;
        if unique {
            tables.check_unique(&prefix)?;
        }
        tables.prefixes.insert(prefix.id, prefix.clone());
        Ok(prefix)
    }

    fn ip_address(&self, id: RecordId) -> Result<Option<IpAddress>, StoreError> {
        Ok(self.tables.read().ip_addresses.get(&id).cloned())
    }

    fn ip_addresses(&self) -> Result<Vec<IpAddress>, StoreError> {
        Ok(self.tables.read().ip_addresses.values().cloned().collect())
    }

    fn insert_ip_address(
        &self,
        new: NewIpAddress,
        unique: bool,
    ) -> Result<IpAddress, StoreError> {
        let mut tables = self.tables.write();
        tables.check_vrf_exists(new.vrf)?;
        if unique {
            tables.check_unique(&new)?;
        }
        let id = tables.next_id();
        let address = new.persist(id);
        tables.ip_addresses.insert(id, address.clone());
        Ok(address)
    }

    fn update_ip_address(
        &self,
        address: IpAddress,
        unique: bool,
    ) -> Result<IpAddress, StoreError> {
        let mut tables = self.tables.write();
        if !tables.ip_addresses.contains_key(&address.id) {
            return Err(StoreError::RecordNotFound {
                kind: RecordKind::IpAddress,
                id: address.id,
            });
        }
        tables.check_vrf_exists(address.vrf)?;
        if unique {
            tables.check_unique(&address)?;
        }
        tables.ip_addresses.insert(address.id, address.clone());
        Ok(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn net(s: &str) -> NetworkAddress {
        NetworkAddress::new(s).unwrap()
    }

    #[test]
    fn test_unique_insert_rejects_same_partition() {
        let store = MemoryStore::new();
        store
            .insert_prefix(NewPrefix::new(net("192.0.2.0/24"), None), true)
            .unwrap();
        let err = store
            .insert_prefix(NewPrefix::new(net("192.0.2.0/24"), None), true)
            .unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation(ref d) if d.partition == Partition::Global));
    }

    #[test]
    fn test_non_unique_insert_allows_duplicates() {
        let store = MemoryStore::new();
        for _ in 0..3 {
            store
                .insert_ip_address(NewIpAddress::new(net("192.0.2.1/24"), None), false)
                .unwrap();
        }
        let hits = store
            .find_duplicates(RecordKind::IpAddress, &net("192.0.2.1/24"), Partition::Global, None)
            .unwrap();
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn test_find_duplicates_excludes_self_and_other_partitions() {
        let store = MemoryStore::new();
        let vrf = store.create_vrf(NewVrf::new("Test", Some("1:1"), true)).unwrap();
        let global = store
            .insert_prefix(NewPrefix::new(net("192.0.2.0/24"), None), false)
            .unwrap();
        store
            .insert_prefix(NewPrefix::new(net("192.0.2.0/24"), Some(vrf.id)), false)
            .unwrap();
        let hits = store
            .find_duplicates(
                RecordKind::Prefix,
                &net("192.0.2.0/24"),
                Partition::Global,
                Some(global.id),
            )
            .unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_update_keeps_own_network() {
        let store = MemoryStore::new();
        let mut prefix = store
            .insert_prefix(NewPrefix::new(net("192.0.2.0/24"), None), true)
            .unwrap();
        prefix.description = "lab".to_string();
        let updated = store.update_prefix(prefix, true).unwrap();
        assert_eq!(updated.description, "lab");
    }

    #[test]
    fn test_insert_with_unknown_vrf() {
        let store = MemoryStore::new();
        let err = store
            .insert_ip_address(NewIpAddress::new(net("192.0.2.1/24"), Some(42)), true)
            .unwrap_err();
        assert!(matches!(err, StoreError::VrfNotFound { vrf_id: 42 }));
    }

    #[test]
    fn test_vrf_rd_unique() {
        let store = MemoryStore::new();
        store.create_vrf(NewVrf::new("A", Some("1:1"), true)).unwrap();
        let err = store
            .create_vrf(NewVrf::new("B", Some("1:1"), true))
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateRd { .. }));
        store.create_vrf(NewVrf::new("C", None, true)).unwrap();
        store.create_vrf(NewVrf::new("D", None, true)).unwrap();
        assert_eq!(store.vrfs().unwrap().len(), 3);
    }

    #[test]
    fn test_delete_vrf_in_use() {
        let store = MemoryStore::new();
        let vrf = store.create_vrf(NewVrf::new("Test", None, false)).unwrap();
        store
            .insert_ip_address(NewIpAddress::new(net("10.0.0.1/8"), Some(vrf.id)), false)
            .unwrap();
        let err = store.delete_vrf(vrf.id).unwrap_err();
        assert!(matches!(err, StoreError::VrfInUse { count: 1, .. }));

        let empty = store.create_vrf(NewVrf::new("Empty", None, false)).unwrap();
        store.delete_vrf(empty.id).unwrap();
        assert!(store.vrf(empty.id).unwrap().is_none());
    }

    #[test]
    fn test_set_enforce_unique() {
        let store = MemoryStore::new();
        let vrf = store.create_vrf(NewVrf::new("Test", None, false)).unwrap();
        let vrf = store.set_enforce_unique(vrf.id, true).unwrap();
        assert!(vrf.enforce_unique);
        assert!(store.vrf(vrf.id).unwrap().unwrap().enforce_unique);
    }
}
