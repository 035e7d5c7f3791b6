//! Read-only lookups over admitted records.

use crate::error::StoreError;
use crate::models::{Addressed, IpAddress, NetworkAddress, Prefix, RecordKind};
use crate::store::ObjectStore;

/// Other prefixes with the same network in the same partition.
///
/// Only non-empty when the partition does not enforce uniqueness.
pub fn prefix_duplicates<S>(store: &S, prefix: &Prefix) -> Result<Vec<Prefix>, StoreError>
where
    S: ObjectStore + ?Sized,
{
    let ids = store.find_duplicates(
        RecordKind::Prefix,
        &prefix.prefix,
        prefix.partition(),
        Some(prefix.id),
    )?;
    let mut found = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(p) = store.prefix(id)? {
            found.push(p);
        }
    }
    Ok(found)
}

/// Other IP addresses with the same network in the same partition.
pub fn ip_address_duplicates<S>(
    store: &S,
    address: &IpAddress,
) -> Result<Vec<IpAddress>, StoreError>
where
    S: ObjectStore + ?Sized,
{
    let ids = store.find_duplicates(
        RecordKind::IpAddress,
        &address.address,
        address.partition(),
        Some(address.id),
    )?;
    let mut found = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(a) = store.ip_address(id)? {
            found.push(a);
        }
    }
    Ok(found)
}

/// IP addresses in `prefix`'s partition whose host address falls inside it.
pub fn child_ip_addresses<S>(store: &S, prefix: &Prefix) -> Result<Vec<IpAddress>, StoreError>
where
    S: ObjectStore + ?Sized,
{
    let mut children: Vec<IpAddress> = store
        .ip_addresses()?
        .into_iter()
        .filter(|a| a.partition() == prefix.partition())
        .filter(|a| {
            let host = NetworkAddress {
                addr: a.address.addr,
                mask: a.address.bits(),
            };
            prefix.prefix.contains(&host)
        })
        .collect();
    children.sort_by_key(|a| a.address);
    Ok(children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewIpAddress, NewPrefix, NewVrf};
    use crate::store::MemoryStore;

    fn net(s: &str) -> NetworkAddress {
        NetworkAddress::new(s).unwrap()
    }

    #[test]
    fn test_prefix_duplicates() {
        let store = MemoryStore::new();
        let a = store
            .insert_prefix(NewPrefix::new(net("192.0.2.0/24"), None), false)
            .unwrap();
        let b = store
            .insert_prefix(NewPrefix::new(net("192.0.2.0/24"), None), false)
            .unwrap();
        store
            .insert_prefix(NewPrefix::new(net("192.0.2.0/25"), None), false)
            .unwrap();
        let dups = prefix_duplicates(&store, &a).unwrap();
        assert_eq!(dups, vec![b]);
    }

    #[test]
    fn test_ip_address_duplicates_none() {
        let store = MemoryStore::new();
        let a = store
            .insert_ip_address(NewIpAddress::new(net("192.0.2.1/24"), None), true)
            .unwrap();
        assert!(ip_address_duplicates(&store, &a).unwrap().is_empty());
    }

    #[test]
    fn test_child_ip_addresses() {
        let store = MemoryStore::new();
        let vrf = store.create_vrf(NewVrf::new("Test", None, false)).unwrap();
        let prefix = store
            .insert_prefix(NewPrefix::new(net("192.0.2.0/24"), None), false)
            .unwrap();
        for (cidr, vrf_id) in [
            ("192.0.2.20/24", None),
            ("192.0.2.5/32", None),
            ("192.0.2.6/24", Some(vrf.id)),
            ("198.51.100.1/24", None),
            ("192.0.2.7/16", None),
        ] {
            store
                .insert_ip_address(NewIpAddress::new(net(cidr), vrf_id), false)
                .unwrap();
        }
        let children: Vec<String> = child_ip_addresses(&store, &prefix)
            .unwrap()
            .iter()
            .map(|a| a.address.to_string())
            .collect();
        assert_eq!(children, vec!["192.0.2.5/32", "192.0.2.7/16", "192.0.2.20/24"]);
    }
}
