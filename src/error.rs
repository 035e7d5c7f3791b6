//! Error types surfaced by admission and the object store.

use crate::models::{NetworkAddress, Partition, RecordId, RecordKind, VrfId};

/// Admission rejected: the candidate repeats an existing record in its partition.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Duplicate {kind} found in {partition}: {network}")]
pub struct DuplicateError {
    pub kind: RecordKind,
    pub network: NetworkAddress,
    pub partition: Partition,
}

/// Failures raised by an [`ObjectStore`](crate::store::ObjectStore).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Store-level uniqueness constraint hit on insert or update.
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(DuplicateError),

    #[error("VRF #{vrf_id} not found")]
    VrfNotFound { vrf_id: VrfId },

    #[error("{kind} #{id} not found")]
    RecordNotFound { kind: RecordKind, id: RecordId },

    #[error("Route distinguisher {rd} already in use by VRF #{vrf_id}")]
    DuplicateRd { rd: String, vrf_id: VrfId },

    #[error("VRF #{vrf_id} is still referenced by {count} record(s)")]
    VrfInUse { vrf_id: VrfId, count: usize },

    #[error("Inconsistent snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Store backend failure: {0}")]
    Backend(String),
}

/// Everything the admission API can return.
#[derive(Debug, thiserror::Error)]
pub enum IpamError {
    #[error(transparent)]
    Duplicate(#[from] DuplicateError),

    /// Candidate references a VRF that does not exist.
    #[error("Invalid scope: VRF #{vrf_id} does not exist")]
    InvalidScope { vrf_id: VrfId },

    #[error("Invalid VRF '{name}': {reason}")]
    InvalidVrf { name: String, reason: String },

    #[error("Invalid network {network}: {reason}")]
    InvalidNetwork {
        network: NetworkAddress,
        reason: String,
    },

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for IpamError {
    fn from(err: StoreError) -> Self {
        // the store's constraint rejection is the same outcome as the validator's
        match err {
            StoreError::UniqueViolation(dup) => IpamError::Duplicate(dup),
            other => IpamError::Store(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dup() -> DuplicateError {
        DuplicateError {
            kind: RecordKind::Prefix,
            network: NetworkAddress::new("192.0.2.0/24").unwrap(),
            partition: Partition::Global,
        }
    }

    #[test]
    fn test_unique_violation_maps_to_duplicate() {
        let err: IpamError = StoreError::UniqueViolation(dup()).into();
        assert!(matches!(err, IpamError::Duplicate(d) if d == dup()));
    }

    #[test]
    fn test_other_store_errors_stay_store_errors() {
        let err: IpamError = StoreError::Backend("disk full".to_string()).into();
        assert!(matches!(err, IpamError::Store(StoreError::Backend(_))));
    }

    #[test]
    fn test_duplicate_message() {
        assert_eq!(
            dup().to_string(),
            "Duplicate prefix found in global table: 192.0.2.0/24"
        );
    }
}
