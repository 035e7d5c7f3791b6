//! Terminal summary of the store, grouped by partition.

use crate::error::StoreError;
use crate::import::ImportReport;
use crate::models::{Addressed, Partition, Prefix};
use crate::processing::{child_ip_addresses, prefix_duplicates};
use crate::store::ObjectStore;
use colored::Colorize;
use itertools::Itertools;
use std::collections::HashMap;

/// Right-align `value` in `width` columns.
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    format!("{:>width$}", value.to_string())
}

fn partition_title<S>(store: &S, partition: Partition) -> Result<String, StoreError>
where
    S: ObjectStore + ?Sized,
{
    Ok(match partition {
        Partition::Global => "Global".to_string(),
        Partition::Vrf(id) => match store.vrf(id)? {
            Some(vrf) => format!(
                "VRF {vrf} [enforce_unique={}]",
                if vrf.enforce_unique { "yes" } else { "no" }
            ),
            None => format!("VRF #{id} (missing)"),
        },
    })
}

/// Render one line per prefix, with duplicates marked and child addresses listed.
pub fn format_summary<S>(store: &S) -> Result<Vec<String>, StoreError>
where
    S: ObjectStore + ?Sized,
{
    let mut lines = Vec::new();
    let by_partition: HashMap<Partition, Vec<Prefix>> = store
        .prefixes()?
        .into_iter()
        .into_group_map_by(|p| p.partition());

    for partition in by_partition.keys().sorted() {
        lines.push(partition_title(store, *partition)?.bold().to_string());
        let prefixes = by_partition[partition].iter().sorted_by_key(|p| (p.prefix, p.id));
        for prefix in prefixes {
            let children = child_ip_addresses(store, prefix)?;
            let dups = prefix_duplicates(store, prefix)?;
            let mut line = format!(
                "  {} {} {:?} {} address(es)",
                format_field(format!("#{}", prefix.id), 6),
                format_field(prefix.prefix, 20),
                prefix.status,
                children.len()
            );
            if !dups.is_empty() {
                line = format!("{line} {}", format!("[DUPLICATE x{}]", dups.len() + 1).red());
            }
            lines.push(line);
            for child in children {
                lines.push(format!(
                    "      {} {:?}",
                    format_field(child.address, 20),
                    child.status
                ));
            }
        }
    }
    Ok(lines)
}

/// Print the store summary to stdout.
pub fn print_summary<S>(store: &S) -> Result<(), StoreError>
where
    S: ObjectStore + ?Sized,
{
    let lines = format_summary(store)?;
    log::info!("Summary: {} line(s)", lines.len());
    for line in lines {
        println!("{line}");
    }
    Ok(())
}

/// Print an import report, rejections in red.
pub fn print_import_report(report: &ImportReport) {
    println!(
        "Imported {} VRF(s), {} prefix(es) (+{} auto-created), {} IP address(es)",
        report.vrfs_created,
        report.prefixes_admitted,
        report.prefixes_auto_created,
        report.ip_addresses_admitted
    );
    for reject in &report.rejected {
        println!("  {} {reject}", "rejected".on_red());
    }
    for failure in &report.repair_failures {
        println!("  {} {failure}", "repair failed".yellow());
    }
}
