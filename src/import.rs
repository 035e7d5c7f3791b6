//! Batch import of VRFs, prefixes and IP addresses from a JSON file.
//!
//! Records reference VRFs by name; each record goes through the admission API
//! and a rejection is logged and counted without stopping the batch.

use crate::config::IpamConfig;
use crate::error::{IpamError, StoreError};
use crate::models::{
    IpAddressStatus, NetworkAddress, NewIpAddress, NewPrefix, NewVrf, PrefixStatus, VrfId,
};
use crate::processing::{admit_ip_address, admit_prefix, register_vrf, RepairOutcome};
use crate::store::ObjectStore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::error::Error;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ImportPrefix {
    pub prefix: NetworkAddress,
    /// VRF name; absent means the global table.
    #[serde(default)]
    pub vrf: Option<String>,
    #[serde(default)]
    pub status: PrefixStatus,
    #[serde(default)]
    pub is_pool: bool,
    #[serde(default)]
    pub description: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ImportIpAddress {
    pub address: NetworkAddress,
    #[serde(default)]
    pub vrf: Option<String>,
    #[serde(default)]
    pub status: IpAddressStatus,
    #[serde(default)]
    pub description: String,
}

/// Contents of an import file.
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct ImportBatch {
    #[serde(default)]
    pub vrfs: Vec<NewVrf>,
    #[serde(default)]
    pub prefixes: Vec<ImportPrefix>,
    #[serde(default)]
    pub ip_addresses: Vec<ImportIpAddress>,
}

/// Counts and messages collected while importing.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ImportReport {
    pub vrfs_created: usize,
    pub prefixes_admitted: usize,
    pub ip_addresses_admitted: usize,
    pub prefixes_auto_created: usize,
    /// One line per record that was not admitted.
    pub rejected: Vec<String>,
    /// Addresses that were admitted but whose prefix repair failed.
    pub repair_failures: Vec<String>,
}

/// Parse an import file, reporting the JSON path of any error.
pub fn read_import_file(file: &str) -> Result<ImportBatch, Box<dyn Error>> {
    let json = std::fs::read_to_string(file)
        .map_err(|e| format!("Error reading import file {file}: {e}"))?;
    let mut deserializer = serde_json::Deserializer::from_str(&json);
    let batch: ImportBatch = serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        format!(
            "Error parsing import file {file}: path={} error={}",
            e.path(),
            e
        )
    })?;
    log::info!(
        "Read {} VRFs, {} prefixes, {} IP addresses from {file}",
        batch.vrfs.len(),
        batch.prefixes.len(),
        batch.ip_addresses.len()
    );
    Ok(batch)
}

fn lookup_vrf(
    names: &HashMap<String, VrfId>,
    name: Option<&String>,
) -> Result<Option<VrfId>, String> {
    match name {
        None => Ok(None),
        Some(name) => names
            .get(name)
            .copied()
            .map(Some)
            .ok_or_else(|| format!("unknown VRF '{name}'")),
    }
}

/// Admit everything in `batch`: VRFs first, then prefixes, then IP addresses.
///
/// VRFs whose name already exists in the store are reused. Only store
/// failures abort the import; admission rejections land in the report.
pub fn run_import<S>(
    store: &S,
    batch: ImportBatch,
    config: &IpamConfig,
) -> Result<ImportReport, IpamError>
where
    S: ObjectStore + ?Sized,
{
    let mut report = ImportReport::default();
    let mut names: HashMap<String, VrfId> = store
        .vrfs()?
        .into_iter()
        .map(|v| (v.name, v.id))
        .collect();

    for new_vrf in batch.vrfs {
        if let Some(id) = names.get(&new_vrf.name) {
            log::debug!("VRF '{}' already exists as #{id}", new_vrf.name);
            continue;
        }
        let name = new_vrf.name.clone();
        match register_vrf(store, new_vrf) {
            Ok(vrf) => {
                names.insert(vrf.name.clone(), vrf.id);
                report.vrfs_created += 1;
            }
            Err(IpamError::Store(e)) if !matches!(e, StoreError::DuplicateRd { .. }) => {
                return Err(IpamError::Store(e));
            }
            Err(e) => {
                log::warn!("VRF '{name}' rejected: {e}");
                report.rejected.push(format!("VRF {name}: {e}"));
            }
        }
    }

    for item in batch.prefixes {
        let vrf = match lookup_vrf(&names, item.vrf.as_ref()) {
            Ok(vrf) => vrf,
            Err(reason) => {
                log::warn!("Prefix {} rejected: {reason}", item.prefix);
                report.rejected.push(format!("prefix {}: {reason}", item.prefix));
                continue;
            }
        };
        let candidate = NewPrefix {
            prefix: item.prefix,
            vrf,
            status: item.status,
            is_pool: item.is_pool,
            description: item.description,
        };
        match admit_prefix(store, candidate, config) {
            Ok(_) => report.prefixes_admitted += 1,
            Err(IpamError::Store(e)) => return Err(IpamError::Store(e)),
            Err(e) => {
                log::warn!("Prefix {} rejected: {e}", item.prefix);
                report.rejected.push(format!("prefix {}: {e}", item.prefix));
            }
        }
    }

    for item in batch.ip_addresses {
        let vrf = match lookup_vrf(&names, item.vrf.as_ref()) {
            Ok(vrf) => vrf,
            Err(reason) => {
                log::warn!("IP address {} rejected: {reason}", item.address);
                report
                    .rejected
                    .push(format!("IP address {}: {reason}", item.address));
                continue;
            }
        };
        let candidate = NewIpAddress {
            address: item.address,
            vrf,
            status: item.status,
            description: item.description,
        };
        match admit_ip_address(store, candidate, config) {
            Ok(admission) => {
                report.ip_addresses_admitted += 1;
                match admission.repair {
                    Ok(RepairOutcome::Created(_)) => report.prefixes_auto_created += 1,
                    Ok(_) => {}
                    Err(e) => report
                        .repair_failures
                        .push(format!("IP address {}: {e}", admission.address.address)),
                }
            }
            Err(IpamError::Store(e)) => return Err(IpamError::Store(e)),
            Err(e) => {
                log::warn!("IP address {} rejected: {e}", item.address);
                report
                    .rejected
                    .push(format!("IP address {}: {e}", item.address));
            }
        }
    }

    log::info!(
        "Import done: {} VRFs, {} prefixes (+{} auto), {} IP addresses, {} rejected, {} repair failures",
        report.vrfs_created,
        report.prefixes_admitted,
        report.prefixes_auto_created,
        report.ip_addresses_admitted,
        report.rejected.len(),
        report.repair_failures.len()
    );
    Ok(report)
}
