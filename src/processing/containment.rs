//! Containment repair: an admitted IP address implies its containing prefix.

use super::admission::insert_prefix_checked;
use crate::config::IpamConfig;
use crate::error::IpamError;
use crate::models::{Addressed, IpAddress, NewPrefix, Prefix, RecordId, RecordKind};
use crate::store::ObjectStore;

/// What repair did for one address.
#[derive(Debug, Clone, PartialEq)]
pub enum RepairOutcome {
    /// `auto_prefix_create` is off; nothing was looked at.
    Disabled,
    /// The containing prefix was already there.
    Existing(RecordId),
    /// A new default prefix was created.
    Created(Prefix),
    /// Another caller created the prefix between our lookup and our insert.
    CreatedConcurrently,
}

/// Ensure exactly one prefix equal to `address`'s network exists in its partition.
///
/// The create goes through normal prefix admission with the store constraint
/// forced on, so concurrent repairs of the same block cannot both insert. Losing
/// that race is success; any other failure is returned to the caller.
pub fn repair_containment<S>(
    store: &S,
    address: &IpAddress,
    config: &IpamConfig,
) -> Result<RepairOutcome, IpamError>
where
    S: ObjectStore + ?Sized,
{
    if !config.auto_prefix_create {
        return Ok(RepairOutcome::Disabled);
    }

    let parent = address.address.network();
    let existing = store.find_duplicates(RecordKind::Prefix, &parent, address.partition(), None)?;
    if let Some(id) = existing.first() {
        log::debug!("Prefix #{id} {parent} already covers {}", address.address);
        return Ok(RepairOutcome::Existing(*id));
    }

    match insert_prefix_checked(store, NewPrefix::new(parent, address.vrf), config, true) {
        Ok(prefix) => {
            log::info!(
                "Auto-created prefix #{} {} for {}",
                prefix.id,
                prefix.prefix,
                address.address
            );
            Ok(RepairOutcome::Created(prefix))
        }
        Err(IpamError::Duplicate(dup)) => {
            log::debug!("Prefix {} created concurrently: {dup}", dup.network);
            Ok(RepairOutcome::CreatedConcurrently)
        }
        Err(e) => Err(e),
    }
}
