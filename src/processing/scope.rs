//! Effective uniqueness policy for a candidate record.

use crate::config::IpamConfig;
use crate::error::IpamError;
use crate::models::{Partition, VrfId};
use crate::store::ObjectStore;

/// Partition a candidate is checked in, and whether duplicates are rejected there.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct EffectivePolicy {
    pub partition: Partition,
    pub enforce: bool,
}

/// Resolve the policy for a record bound to `vrf` (or global when `None`).
///
/// A VRF-bound record follows that VRF's `enforce_unique`; a global record
/// follows `config.enforce_global_unique`. An unknown VRF id is a
/// configuration error and fails immediately.
pub fn resolve_scope<S>(
    store: &S,
    vrf: Option<VrfId>,
    config: &IpamConfig,
) -> Result<EffectivePolicy, IpamError>
where
    S: ObjectStore + ?Sized,
{
    let policy = match vrf {
        Some(vrf_id) => {
            let vrf = store
                .vrf(vrf_id)?
                .ok_or(IpamError::InvalidScope { vrf_id })?;
            EffectivePolicy {
                partition: Partition::Vrf(vrf.id),
                enforce: vrf.enforce_unique,
            }
        }
        None => EffectivePolicy {
            partition: Partition::Global,
            enforce: config.enforce_global_unique,
        },
    };
    log::trace!("resolve_scope({vrf:?}) -> {policy:?}");
    Ok(policy)
}
