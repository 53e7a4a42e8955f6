//! Core domain logic for the marina resource ledger.
//! This crate is the single source of truth for business invariants:
//! slot/vessel allocation, maintenance scheduling and whole-dataset
//! backup/restore.

pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::client::{Client, ClientInput};
pub use model::maintenance::{Maintenance, MaintenanceInput, MaintenanceStatus};
pub use model::slot::{Slot, SlotInput, SlotSize, SlotStatus, SlotSurface};
pub use model::vessel::{Vessel, VesselInput, VesselKind};
pub use model::{RecordId, ValidationError};
pub use service::backup::{BackupError, Snapshot, SNAPSHOT_VERSION};
pub use service::ledger::{LedgerError, LedgerResult, LedgerStats, MarinaLedger};
pub use service::scheduler::CompletionOutcome;
pub use store::{Entity, EntityStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
