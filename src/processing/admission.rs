//! Admission API: the entry points collaborators use to create or change records.
//!
//! Every path runs scope resolution, then the uniqueness check, then the store
//! write carrying the same constraint. IP address paths finish with
//! containment repair.

use super::containment::{repair_containment, RepairOutcome};
use super::{resolve_scope, validate_unique};
use crate::config::IpamConfig;
use crate::error::IpamError;
use crate::models::{
    validate_rd, Addressed, IpAddress, NetworkAddress, NewIpAddress, NewPrefix, NewVrf, Prefix,
    Vrf,
};
use crate::store::ObjectStore;

/// Result of a successful IP address admission.
///
/// `repair` is the secondary outcome: the address is stored even when it is `Err`.
#[derive(Debug)]
pub struct IpAddressAdmission {
    pub address: IpAddress,
    pub repair: Result<RepairOutcome, IpamError>,
}

/// Create a VRF after checking its route distinguisher format.
pub fn register_vrf<S>(store: &S, new: NewVrf) -> Result<Vrf, IpamError>
where
    S: ObjectStore + ?Sized,
{
    if let Some(rd) = &new.rd {
        validate_rd(rd).map_err(|e| IpamError::InvalidVrf {
            name: new.name.clone(),
            reason: e.to_string(),
        })?;
    }
    let vrf = store.create_vrf(new)?;
    log::info!("Created VRF #{} {vrf} enforce_unique={}", vrf.id, vrf.enforce_unique);
    Ok(vrf)
}

fn reject_default_route(kind: &str, network: &NetworkAddress) -> Result<(), IpamError> {
    if network.mask == 0 {
        return Err(IpamError::InvalidNetwork {
            network: *network,
            reason: format!("cannot create {kind} with /0 mask"),
        });
    }
    Ok(())
}

/// Admit a new prefix. Host bits are cleared before the check.
pub fn admit_prefix<S>(
    store: &S,
    candidate: NewPrefix,
    config: &IpamConfig,
) -> Result<Prefix, IpamError>
where
    S: ObjectStore + ?Sized,
{
    insert_prefix_checked(store, candidate, config, false)
}

/// Shared prefix admission. `always_unique` makes the store constraint apply
/// even when the partition permits duplicates.
pub(crate) fn insert_prefix_checked<S>(
    store: &S,
    mut candidate: NewPrefix,
    config: &IpamConfig,
    always_unique: bool,
) -> Result<Prefix, IpamError>
where
    S: ObjectStore + ?Sized,
{
    reject_default_route("prefix", &candidate.prefix)?;
    if !candidate.prefix.is_network() {
        log::debug!(
            "Clearing host bits of prefix {} -> {}",
            candidate.prefix,
            candidate.prefix.network()
        );
        candidate.prefix = candidate.prefix.network();
    }

    let policy = resolve_scope(store, candidate.vrf, config)?;
    validate_unique(store, &candidate, &policy)?;
    let prefix = store.insert_prefix(candidate, policy.enforce || always_unique)?;
    log::info!(
        "Admitted prefix #{} {} in {}",
        prefix.id,
        prefix.prefix,
        prefix.partition()
    );
    Ok(prefix)
}

/// Re-admit a changed prefix, excluding itself from the duplicate check.
pub fn update_prefix<S>(
    store: &S,
    mut prefix: Prefix,
    config: &IpamConfig,
) -> Result<Prefix, IpamError>
where
    S: ObjectStore + ?Sized,
{
    reject_default_route("prefix", &prefix.prefix)?;
    prefix.prefix = prefix.prefix.network();

    let policy = resolve_scope(store, prefix.vrf, config)?;
    validate_unique(store, &prefix, &policy)?;
    let prefix = store.update_prefix(prefix, policy.enforce)?;
    log::info!("Updated prefix #{} {}", prefix.id, prefix.prefix);
    Ok(prefix)
}

/// Admit a new IP address, then make sure its containing prefix exists.
pub fn admit_ip_address<S>(
    store: &S,
    candidate: NewIpAddress,
    config: &IpamConfig,
) -> Result<IpAddressAdmission, IpamError>
where
    S: ObjectStore + ?Sized,
{
    reject_default_route("IP address", &candidate.address)?;

    let policy = resolve_scope(store, candidate.vrf, config)?;
    validate_unique(store, &candidate, &policy)?;
    let address = store.insert_ip_address(candidate, policy.enforce)?;
    log::info!(
        "Admitted IP address #{} {} in {}",
        address.id,
        address.address,
        address.partition()
    );

    let repair = repair_containment(store, &address, config);
    if let Err(e) = &repair {
        log::error!("IP address {} admitted but prefix repair failed: {e}", address.address);
    }
    Ok(IpAddressAdmission { address, repair })
}

/// Re-admit a changed IP address, excluding itself from the duplicate check.
pub fn update_ip_address<S>(
    store: &S,
    address: IpAddress,
    config: &IpamConfig,
) -> Result<IpAddressAdmission, IpamError>
where
    S: ObjectStore + ?Sized,
{
    reject_default_route("IP address", &address.address)?;

    let policy = resolve_scope(store, address.vrf, config)?;
    validate_unique(store, &address, &policy)?;
    let address = store.update_ip_address(address, policy.enforce)?;
    log::info!("Updated IP address #{} {}", address.id, address.address);

    let repair = repair_containment(store, &address, config);
    if let Err(e) = &repair {
        log::error!("IP address {} updated but prefix repair failed: {e}", address.address);
    }
    Ok(IpAddressAdmission { address, repair })
}
