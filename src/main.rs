use clap::Parser;
use ipam_core::import::{read_import_file, run_import};
use ipam_core::output::{print_import_report, print_summary};
use ipam_core::store::{default_snapshot_file, read_store_snapshot, write_store_snapshot};
use ipam_core::IpamConfig;
use std::error::Error;

/// Admit prefixes and IP addresses from a JSON file and summarise the result.
#[derive(Parser, Debug)]
#[command(name = "ipam-core", version, about)]
struct Args {
    /// JSON file with vrfs / prefixes / ip_addresses to admit
    #[arg(short, long)]
    import: Option<String>,

    /// Snapshot to load (default: today's ipam_snapshot_<date>.json if present)
    #[arg(short, long)]
    snapshot: Option<String>,

    /// Write the store back to the snapshot file when done
    #[arg(short, long)]
    write_snapshot: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    log4rs::init_file("log4rs.yml", Default::default())
        .map_err(|e| format!("Error initializing log4rs: {e}"))?;
    dotenv::dotenv().ok();
    let args = Args::parse();
    log::info!("#Start main() {args:?}");

    let config = IpamConfig::from_env()?;
    let store = read_store_snapshot(args.snapshot.as_deref())?;

    if let Some(file) = &args.import {
        let batch = read_import_file(file)?;
        let report = run_import(&store, batch, &config)?;
        print_import_report(&report);
    }

    print_summary(&store)?;

    if args.write_snapshot {
        let file = args.snapshot.unwrap_or_else(default_snapshot_file);
        write_store_snapshot(&store, &file)?;
    }

    Ok(())
}
