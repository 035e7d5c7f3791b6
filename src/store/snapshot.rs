//! JSON snapshot files for [`MemoryStore`].

use super::{MemoryStore, StoreSnapshot};
use std::error::Error;
use std::path::Path;

/// Snapshot file name for today, e.g. `ipam_snapshot_2024-05-01.json`.
pub fn default_snapshot_file() -> String {
    let now = chrono::Local::now();
    format!("ipam_snapshot_{}.json", now.format("%Y-%m-%d"))
}

/// Load a store from a snapshot file, or start empty if today's default file doesn't exist.
///
/// # Arguments
/// * `snapshot_file` - Optional path to a specific snapshot. If None, uses default naming.
///
/// # Returns
/// * `Ok(MemoryStore)` - The store loaded from file, or an empty store
/// * `Err` - If a given snapshot file doesn't exist, the file can't be read,
///   the JSON can't be parsed, or the tables are inconsistent
pub fn read_store_snapshot(snapshot_file: Option<&str>) -> Result<MemoryStore, Box<dyn Error>> {
    let snapshot_file = match snapshot_file {
        Some(file) => {
            if !Path::new(file).exists() {
                return Err(format!("Snapshot file does not exist: {file}").into());
            }
            log::info!("Using provided snapshot file: {file}");
            file.to_string()
        }
        None => default_snapshot_file(),
    };
    load_snapshot(&snapshot_file)
}

/// Read and check one snapshot file; only a missing file means an empty store.
fn load_snapshot(snapshot_file: &str) -> Result<MemoryStore, Box<dyn Error>> {
    let snapshot = match std::fs::read_to_string(snapshot_file) {
        Ok(json) => {
            log::info!("Reading from snapshot file: {snapshot_file}");
            let mut deserializer = serde_json::Deserializer::from_str(&json);
            let snapshot: StoreSnapshot = serde_path_to_error::deserialize(&mut deserializer)
                .map_err(|e| {
                    format!(
                        "Error parsing snapshot {snapshot_file}: path={} error={}",
                        e.path(),
                        e
                    )
                })?;
            snapshot
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::warn!("Snapshot file not found: {snapshot_file}, starting with an empty store");
            StoreSnapshot::default()
        }
        Err(e) => {
            return Err(format!("Error reading snapshot file {snapshot_file}: {e}").into());
        }
    };

    log::info!(
        "Loaded {} VRFs, {} prefixes, {} IP addresses",
        snapshot.vrfs.len(),
        snapshot.prefixes.len(),
        snapshot.ip_addresses.len()
    );
    let store = MemoryStore::from_snapshot(snapshot)
        .map_err(|e| format!("Error loading snapshot {snapshot_file}: {e}"))?;
    Ok(store)
}

/// Write the store contents to `snapshot_file` as pretty JSON.
pub fn write_store_snapshot(store: &MemoryStore, snapshot_file: &str) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(&store.snapshot())
        .map_err(|e| format!("Error serializing snapshot: {e}"))?;
    log::warn!("Writing store to snapshot file: {snapshot_file}");
    std::fs::write(snapshot_file, json)
        .map_err(|e| format!("Error writing snapshot file {snapshot_file}: {e}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NetworkAddress, NewIpAddress, NewPrefix, NewVrf};
    use crate::store::ObjectStore;

    #[test]
    fn test_snapshot_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("snap.json");
        let path = path.to_str().unwrap();

        let store = MemoryStore::new();
        let vrf = store.create_vrf(NewVrf::new("Test", Some("1:1"), true)).unwrap();
        store
            .insert_prefix(
                NewPrefix::new(NetworkAddress::new("192.0.2.0/24").unwrap(), Some(vrf.id)),
                true,
            )
            .unwrap();
        store
            .insert_ip_address(
                NewIpAddress::new(NetworkAddress::new("2001:db8::1/64").unwrap(), None),
                false,
            )
            .unwrap();
        write_store_snapshot(&store, path).unwrap();

        let loaded = read_store_snapshot(Some(path)).unwrap();
        assert_eq!(loaded.vrfs().unwrap(), store.vrfs().unwrap());
        assert_eq!(loaded.prefixes().unwrap(), store.prefixes().unwrap());
        assert_eq!(loaded.ip_addresses().unwrap(), store.ip_addresses().unwrap());

        // ids keep counting from where the snapshot stopped
        let next = loaded
            .insert_prefix(
                NewPrefix::new(NetworkAddress::new("198.51.100.0/24").unwrap(), None),
                true,
            )
            .unwrap();
        assert_eq!(next.id, 4);
    }

    #[test]
    fn test_missing_snapshot_file() {
        let err = read_store_snapshot(Some("does/not/exist.json")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Snapshot file does not exist: does/not/exist.json"
        );
    }

    #[test]
    fn test_bad_snapshot_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"last_id":1,"vrfs":{},"prefixes":{"1":{"id":1,"prefix":"nope"}},"ip_addresses":{}}"#)
            .unwrap();
        let err = read_store_snapshot(path.to_str()).unwrap_err();
        assert!(err.to_string().contains("path=prefixes"), "{err}");
    }

    #[test]
    fn test_absent_default_file_starts_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("ipam_snapshot_absent.json");
        let store = load_snapshot(path.to_str().unwrap()).unwrap();
        assert!(store.prefixes().unwrap().is_empty());
    }

    #[test]
    fn test_unreadable_snapshot_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("garbled.json");
        std::fs::write(&path, [0xff, 0xfe, 0x7b]).unwrap();
        let err = load_snapshot(path.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().starts_with("Error reading snapshot file"), "{err}");

        // a directory in place of the file is not "missing" either
        let err = load_snapshot(dir.path().to_str().unwrap()).unwrap_err();
        assert!(err.to_string().starts_with("Error reading snapshot file"), "{err}");
    }

    #[test]
    fn test_stale_last_id_is_raised() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("stale.json");
        std::fs::write(
            &path,
            r#"{"last_id":0,"vrfs":{},"prefixes":{"1":{"id":1,"prefix":"10.0.0.0/8","vrf":null,
                "status":"Active","is_pool":false,"description":"keep me",
                "created":"2024-01-01T00:00:00Z"}},"ip_addresses":{}}"#,
        )
        .unwrap();
        let store = read_store_snapshot(path.to_str()).unwrap();
        let next = store
            .insert_prefix(
                NewPrefix::new(NetworkAddress::new("192.0.2.0/24").unwrap(), None),
                true,
            )
            .unwrap();
        assert_eq!(next.id, 2);

        let prefixes = store.prefixes().unwrap();
        assert_eq!(prefixes.len(), 2);
        assert_eq!(prefixes[0].description, "keep me");
    }

    #[test]
    fn test_inconsistent_snapshot_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let record = |id: u64, vrf: &str| {
            format!(
                r#"{{"id":{id},"prefix":"10.0.0.0/8","vrf":{vrf},"status":"Active",
                "is_pool":false,"description":"","created":"2024-01-01T00:00:00Z"}}"#
            )
        };

        let path = dir.path().join("wrong_key.json");
        std::fs::write(
            &path,
            format!(r#"{{"last_id":9,"vrfs":{{}},"prefixes":{{"1":{}}},"ip_addresses":{{}}}}"#, record(5, "null")),
        )
        .unwrap();
        let err = read_store_snapshot(path.to_str()).unwrap_err();
        assert!(err.to_string().contains("prefix key 1 holds id 5"), "{err}");

        let path = dir.path().join("missing_vrf.json");
        std::fs::write(
            &path,
            format!(r#"{{"last_id":9,"vrfs":{{}},"prefixes":{{"1":{}}},"ip_addresses":{{}}}}"#, record(1, "7")),
        )
        .unwrap();
        let err = read_store_snapshot(path.to_str()).unwrap_err();
        assert!(err.to_string().contains("references missing VRF"), "{err}");
    }
}
