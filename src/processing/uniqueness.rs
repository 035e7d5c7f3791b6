//! Duplicate check run before a Prefix or IP address is written.

use super::EffectivePolicy;
use crate::error::{DuplicateError, IpamError};
use crate::models::Addressed;
use crate::store::ObjectStore;

/// Reject `candidate` if another record of its kind has the same network in
/// the policy's partition. Exact match only; overlapping blocks pass.
///
/// The candidate's own id is excluded so an update does not collide with itself.
pub fn validate_unique<S, T>(
    store: &S,
    candidate: &T,
    policy: &EffectivePolicy,
) -> Result<(), IpamError>
where
    S: ObjectStore + ?Sized,
    T: Addressed,
{
    if !policy.enforce {
        log::trace!(
            "uniqueness not enforced in {} for {}",
            policy.partition,
            candidate.network()
        );
        return Ok(());
    }

    let hits = store.find_duplicates(
        T::KIND,
        candidate.network(),
        policy.partition,
        candidate.record_id(),
    )?;
    if hits.is_empty() {
        return Ok(());
    }

    log::debug!(
        "{} {} collides with record(s) {:?} in {}",
        T::KIND,
        candidate.network(),
        hits,
        policy.partition
    );
    Err(DuplicateError {
        kind: T::KIND,
        network: *candidate.network(),
        partition: policy.partition,
    }
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NetworkAddress, NewIpAddress, NewPrefix, Partition, RecordKind};
    use crate::store::MemoryStore;

    fn net(s: &str) -> NetworkAddress {
        NetworkAddress::new(s).unwrap()
    }

    const ENFORCED: EffectivePolicy = EffectivePolicy {
        partition: Partition::Global,
        enforce: true,
    };

    #[test]
    fn test_not_enforced_always_passes() {
        let store = MemoryStore::new();
        store
            .insert_prefix(NewPrefix::new(net("192.0.2.0/24"), None), false)
            .unwrap();
        let policy = EffectivePolicy {
            partition: Partition::Global,
            enforce: false,
        };
        let candidate = NewPrefix::new(net("192.0.2.0/24"), None);
        assert!(validate_unique(&store, &candidate, &policy).is_ok());
    }

    #[test]
    fn test_enforced_duplicate_rejected() {
        let store = MemoryStore::new();
        store
            .insert_prefix(NewPrefix::new(net("192.0.2.0/24"), None), false)
            .unwrap();
        let candidate = NewPrefix::new(net("192.0.2.0/24"), None);
        match validate_unique(&store, &candidate, &ENFORCED) {
            Err(IpamError::Duplicate(dup)) => {
                assert_eq!(dup.kind, RecordKind::Prefix);
                assert_eq!(dup.network, net("192.0.2.0/24"));
                assert_eq!(dup.partition, Partition::Global);
            }
            other => panic!("expected duplicate, got {other:?}"),
        }
    }

    #[test]
    fn test_overlap_is_not_duplicate() {
        let store = MemoryStore::new();
        store
            .insert_prefix(NewPrefix::new(net("192.0.2.0/24"), None), false)
            .unwrap();
        for other in ["192.0.2.0/25", "192.0.0.0/16", "192.0.3.0/24"] {
            let candidate = NewPrefix::new(net(other), None);
            assert!(validate_unique(&store, &candidate, &ENFORCED).is_ok(), "{other}");
        }
    }

    #[test]
    fn test_kinds_do_not_collide() {
        let store = MemoryStore::new();
        store
            .insert_prefix(NewPrefix::new(net("192.0.2.1/32"), None), false)
            .unwrap();
        let candidate = NewIpAddress::new(net("192.0.2.1/32"), None);
        assert!(validate_unique(&store, &candidate, &ENFORCED).is_ok());
    }

    #[test]
    fn test_update_excludes_self() {
        let store = MemoryStore::new();
        let existing = store
            .insert_ip_address(NewIpAddress::new(net("192.0.2.1/24"), None), false)
            .unwrap();
        assert!(validate_unique(&store, &existing, &ENFORCED).is_ok());
    }
}
