//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `marina_core` linkage.
//! - Open (or create) a ledger database, seed the default berth layout
//!   and print dashboard counters.

use marina_core::{LedgerStats, MarinaLedger};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(stats) => {
            println!("marina_core version={}", marina_core::core_version());
            println!(
                "slots free={} occupied={} vessels={} open_maintenance={}",
                stats.free_slots, stats.occupied_slots, stats.vessels, stats.open_maintenance
            );
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<LedgerStats, String> {
    if let Ok(log_dir) = std::env::var("MARINA_LOG_DIR") {
        marina_core::init_logging(marina_core::default_log_level(), &log_dir)?;
    }

    let mut ledger = match std::env::args().nth(1) {
        Some(path) => MarinaLedger::open(&path).map_err(|err| err.to_string())?,
        None => MarinaLedger::open_in_memory().map_err(|err| err.to_string())?,
    };

    ledger
        .ensure_default_slots()
        .map_err(|err| err.to_string())?;
    ledger.stats().map_err(|err| err.to_string())
}
