//! Ledger facade: the single entry point presentation code calls.
//!
//! # Responsibility
//! - Compose store, allocation and scheduler calls into atomic
//!   multi-entity operations.
//! - Own the storage context: one `MarinaLedger` wraps one connection,
//!   which is the single logical writer.
//!
//! # Invariants
//! - Every composite write runs inside one immediate transaction; a failed
//!   operation rolls back completely and readers never observe an
//!   intermediate state.
//! - Records are created and mutated only through this facade, never by
//!   writing to the store directly.

use super::allocation;
use super::backup::{self, BackupError, Snapshot};
use super::scheduler::{self, CompletionOutcome};
use crate::db::{self, DbError};
use crate::model::client::{Client, ClientInput};
use crate::model::maintenance::{Maintenance, MaintenanceInput, MaintenanceStatus};
use crate::model::slot::{Slot, SlotInput, SlotSize, SlotStatus, SlotSurface};
use crate::model::vessel::{Vessel, VesselInput};
use crate::model::{RecordId, ValidationError};
use crate::store::{EntityStore, StoreError};
use chrono::{Local, NaiveDate};
use log::info;
use rusqlite::{Connection, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Number of berths a fresh marina database is seeded with.
const DEFAULT_SLOT_COUNT: i64 = 12;

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Operation error reported synchronously to the caller; nothing is
/// retried internally.
#[derive(Debug)]
pub enum LedgerError {
    /// Operation targets a nonexistent id.
    NotFound { table: &'static str, id: RecordId },
    /// Delete blocked by a referencing entity, or a duplicate slot number.
    Conflict(&'static str),
    /// Target slot is already occupied by a different vessel.
    SlotUnavailable { slot_id: RecordId },
    /// The maintenance record was completed earlier.
    AlreadyCompleted(RecordId),
    /// A required field is missing or out of domain.
    Validation(ValidationError),
    /// Persistence-layer failure.
    Store(StoreError),
}

impl Display for LedgerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { table, id } => write!(f, "{table} record not found: {id}"),
            Self::Conflict(message) => write!(f, "conflict: {message}"),
            Self::SlotUnavailable { slot_id } => {
                write!(f, "slot {slot_id} is already occupied by another vessel")
            }
            Self::AlreadyCompleted(id) => {
                write!(f, "maintenance {id} is already completed")
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for LedgerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for LedgerError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound { table, id } => Self::NotFound { table, id },
            StoreError::Validation(err) => Self::Validation(err),
            other => Self::Store(other),
        }
    }
}

impl From<ValidationError> for LedgerError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<rusqlite::Error> for LedgerError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Store(StoreError::Db(DbError::Sqlite(value)))
    }
}

/// Counters surfaced on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerStats {
    pub free_slots: usize,
    pub occupied_slots: usize,
    pub vessels: usize,
    /// Pending plus overdue maintenance records.
    pub open_maintenance: usize,
}

/// The marina resource ledger over one SQLite database.
pub struct MarinaLedger {
    conn: Connection,
}

impl MarinaLedger {
    /// Wraps an already-bootstrapped connection (see [`crate::db::open_db`]).
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Opens (and migrates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DbError> {
        Ok(Self::new(db::open_db(path)?))
    }

    /// Opens an in-memory ledger, mainly for tests.
    pub fn open_in_memory() -> Result<Self, DbError> {
        Ok(Self::new(db::open_db_in_memory()?))
    }

    // ----- clients -----

    pub fn create_client(&mut self, input: ClientInput) -> LedgerResult<Client> {
        self.write_tx(|store| {
            let id = store.insert(&input.into_record(0))?;
            Ok(store.require(id)?)
        })
    }

    pub fn update_client(&mut self, id: RecordId, input: ClientInput) -> LedgerResult<Client> {
        self.write_tx(|store| {
            store.require::<Client>(id)?;
            store.update(&input.into_record(id))?;
            Ok(store.require(id)?)
        })
    }

    pub fn get_client(&self, id: RecordId) -> LedgerResult<Option<Client>> {
        Ok(self.read().get(id)?)
    }

    pub fn list_clients(&self) -> LedgerResult<Vec<Client>> {
        Ok(self.read().all()?)
    }

    /// Deletes a client; fails while any vessel still references it.
    pub fn delete_client(&mut self, id: RecordId) -> LedgerResult<()> {
        self.write_tx(|store| {
            store.require::<Client>(id)?;
            let owned: Vec<Vessel> = store.find("client_id", id)?;
            if !owned.is_empty() {
                return Err(LedgerError::Conflict("client still owns vessels"));
            }
            store.delete::<Client>(id)?;
            Ok(())
        })
    }

    // ----- slots -----

    /// Creates a slot; new berths always start free.
    pub fn create_slot(&mut self, input: SlotInput) -> LedgerResult<Slot> {
        self.write_tx(|store| {
            ensure_slot_number_free(store, input.number, None)?;
            let id = store.insert(&input.into_record(0, SlotStatus::Free))?;
            Ok(store.require(id)?)
        })
    }

    /// Updates berth number/size/surface. Status stays derived and is
    /// carried over unchanged.
    pub fn update_slot(&mut self, id: RecordId, input: SlotInput) -> LedgerResult<Slot> {
        self.write_tx(|store| {
            let current: Slot = store.require(id)?;
            ensure_slot_number_free(store, input.number, Some(id))?;
            store.update(&input.into_record(id, current.status))?;
            Ok(store.require(id)?)
        })
    }

    pub fn get_slot(&self, id: RecordId) -> LedgerResult<Option<Slot>> {
        Ok(self.read().get(id)?)
    }

    /// Lists every berth ordered by berth number.
    pub fn list_slots(&self) -> LedgerResult<Vec<Slot>> {
        let mut slots: Vec<Slot> = self.read().all()?;
        slots.sort_by_key(|slot| slot.number);
        Ok(slots)
    }

    pub fn free_slots(&self) -> LedgerResult<Vec<Slot>> {
        let mut slots: Vec<Slot> = self.read().find("status", "free".to_string())?;
        slots.sort_by_key(|slot| slot.number);
        Ok(slots)
    }

    /// Deletes a berth; fails while a vessel occupies it.
    pub fn delete_slot(&mut self, id: RecordId) -> LedgerResult<()> {
        self.write_tx(|store| {
            let slot: Slot = store.require(id)?;
            if slot.is_occupied() {
                return Err(LedgerError::Conflict("slot is occupied"));
            }
            store.delete::<Slot>(id)?;
            Ok(())
        })
    }

    /// Seeds the small-marina default layout (12 berths) when the slot
    /// table is empty. Returns the number of berths created.
    pub fn ensure_default_slots(&mut self) -> LedgerResult<usize> {
        let created = self.write_tx(|store| {
            if store.count::<Slot>()? > 0 {
                return Ok(0);
            }
            for number in 1..=DEFAULT_SLOT_COUNT {
                let size = match number {
                    1..=4 => SlotSize::Small,
                    5..=8 => SlotSize::Medium,
                    _ => SlotSize::Large,
                };
                let surface = if number % 2 == 0 {
                    SlotSurface::Water
                } else {
                    SlotSurface::Dry
                };
                store.insert(&Slot {
                    id: 0,
                    number,
                    size,
                    surface,
                    status: SlotStatus::Free,
                })?;
            }
            Ok(DEFAULT_SLOT_COUNT as usize)
        })?;
        if created > 0 {
            info!("event=slots_seeded module=ledger status=ok count={created}");
        }
        Ok(created)
    }

    // ----- vessels -----

    /// Creates a vessel for an existing client, optionally assigning a
    /// free slot in the same transaction.
    pub fn create_vessel(&mut self, input: VesselInput) -> LedgerResult<Vessel> {
        self.write_tx(|store| {
            store.require::<Client>(input.client_id)?;
            let requested_slot = input.slot_id;
            let mut record = input.into_record(0);
            record.slot_id = None;
            let id = store.insert(&record)?;
            allocation::assign_slot(store, id, requested_slot)?;
            Ok(store.require(id)?)
        })
    }

    /// Updates a vessel; a changed slot goes through the allocation rules
    /// before the rest of the patch is persisted.
    pub fn update_vessel(&mut self, id: RecordId, input: VesselInput) -> LedgerResult<Vessel> {
        self.write_tx(|store| {
            store.require::<Vessel>(id)?;
            store.require::<Client>(input.client_id)?;
            allocation::assign_slot(store, id, input.slot_id)?;

            let mut record: Vessel = store.require(id)?;
            record.name = input.name;
            record.kind = input.kind;
            record.model = input.model;
            record.year = input.year;
            record.length = input.length;
            record.client_id = input.client_id;
            store.update(&record)?;
            Ok(record)
        })
    }

    pub fn get_vessel(&self, id: RecordId) -> LedgerResult<Option<Vessel>> {
        Ok(self.read().get(id)?)
    }

    pub fn list_vessels(&self) -> LedgerResult<Vec<Vessel>> {
        Ok(self.read().all()?)
    }

    pub fn vessels_by_client(&self, client_id: RecordId) -> LedgerResult<Vec<Vessel>> {
        Ok(self.read().find("client_id", client_id)?)
    }

    pub fn vessel_by_slot(&self, slot_id: RecordId) -> LedgerResult<Option<Vessel>> {
        Ok(self.read().find_one("slot_id", slot_id)?)
    }

    /// Deletes a vessel, its maintenance history and its slot claim as one
    /// unit.
    pub fn delete_vessel(&mut self, id: RecordId) -> LedgerResult<()> {
        let removed = self.write_tx(|store| {
            store.require::<Vessel>(id)?;
            allocation::release(store, id)?;
            let removed = store.delete_where::<Maintenance>("vessel_id", id)?;
            store.delete::<Vessel>(id)?;
            Ok(removed)
        })?;
        info!(
            "event=vessel_delete module=ledger status=ok vessel_id={id} maintenance_removed={removed}"
        );
        Ok(())
    }

    // ----- maintenance -----

    /// Schedules maintenance for an existing vessel; new records start
    /// pending.
    pub fn create_maintenance(&mut self, input: MaintenanceInput) -> LedgerResult<Maintenance> {
        self.write_tx(|store| {
            store.require::<Vessel>(input.vessel_id)?;
            let id = store.insert(&input.into_record(0))?;
            Ok(store.require(id)?)
        })
    }

    /// Updates the schedulable fields of a record. Status and completion
    /// date are owned by the scheduler and carried over unchanged.
    pub fn update_maintenance(
        &mut self,
        id: RecordId,
        input: MaintenanceInput,
    ) -> LedgerResult<Maintenance> {
        self.write_tx(|store| {
            let mut record: Maintenance = store.require(id)?;
            store.require::<Vessel>(input.vessel_id)?;
            record.vessel_id = input.vessel_id;
            record.kind = input.kind;
            record.description = input.description;
            record.next_date = input.next_date;
            record.interval_months = input.interval_months;
            store.update(&record)?;
            Ok(record)
        })
    }

    pub fn get_maintenance(&self, id: RecordId) -> LedgerResult<Option<Maintenance>> {
        Ok(self.read().get(id)?)
    }

    /// Lists every maintenance record ascending by due date, refreshing
    /// overdue statuses first. The refresh is this explicit step, never a
    /// hidden side effect of reading.
    pub fn list_maintenance(&mut self) -> LedgerResult<Vec<Maintenance>> {
        self.refresh_maintenance_statuses(today())?;
        let mut records: Vec<Maintenance> = self.read().all()?;
        scheduler::sort_by_due_date(&mut records);
        Ok(records)
    }

    pub fn maintenance_by_vessel(&self, vessel_id: RecordId) -> LedgerResult<Vec<Maintenance>> {
        let mut records: Vec<Maintenance> = self.read().find("vessel_id", vessel_id)?;
        scheduler::sort_by_due_date(&mut records);
        Ok(records)
    }

    pub fn delete_maintenance(&mut self, id: RecordId) -> LedgerResult<()> {
        self.write_tx(|store| {
            store.delete::<Maintenance>(id)?;
            Ok(())
        })
    }

    /// Completes a record; a recurring one schedules exactly one follow-up
    /// in the same transaction.
    pub fn complete_maintenance(
        &mut self,
        id: RecordId,
        completed_date: NaiveDate,
    ) -> LedgerResult<CompletionOutcome> {
        self.write_tx(|store| scheduler::complete(store, id, completed_date))
    }

    /// Flips pending records past their due date to overdue. Idempotent
    /// for a given day; returns the number of records rewritten.
    pub fn refresh_maintenance_statuses(&mut self, as_of: NaiveDate) -> LedgerResult<usize> {
        self.write_tx(|store| scheduler::refresh_statuses(store, as_of))
    }

    /// Non-completed records due within `within_days` from today,
    /// excluding anything already past due.
    pub fn upcoming_maintenance(&self, within_days: u32) -> LedgerResult<Vec<Maintenance>> {
        scheduler::upcoming(&self.read(), today(), within_days)
    }

    /// Non-completed records already past due as of today.
    pub fn overdue_maintenance(&self) -> LedgerResult<Vec<Maintenance>> {
        scheduler::overdue(&self.read(), today())
    }

    // ----- dashboard & backup -----

    /// Dashboard counters, computed after an explicit status refresh.
    pub fn stats(&mut self) -> LedgerResult<LedgerStats> {
        self.write_tx(|store| {
            scheduler::refresh_statuses(store, today())?;

            let slots: Vec<Slot> = store.all()?;
            let free_slots = slots.iter().filter(|slot| !slot.is_occupied()).count();
            let occupied_slots = slots.len() - free_slots;
            let vessels = store.count::<Vessel>()? as usize;
            let open_maintenance = store
                .all::<Maintenance>()?
                .iter()
                .filter(|record| record.status != MaintenanceStatus::Completed)
                .count();

            Ok(LedgerStats {
                free_slots,
                occupied_slots,
                vessels,
                open_maintenance,
            })
        })
    }

    /// Serializes the full current state. Read-only, no side effects.
    pub fn export_snapshot(&self) -> Result<Snapshot, BackupError> {
        backup::export(&self.read())
    }

    /// Replaces the entire dataset with the snapshot contents, preserving
    /// its identifiers exactly. All-or-nothing; see [`backup::import`] for
    /// the trust boundary on cross-entity invariants.
    pub fn import_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), BackupError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        backup::import(&EntityStore::new(&tx), snapshot)?;
        tx.commit()?;
        info!(
            "event=snapshot_import module=ledger status=ok clients={} slots={} vessels={} maintenance={}",
            snapshot.clients.len(),
            snapshot.slots.len(),
            snapshot.vessels.len(),
            snapshot.maintenance.len()
        );
        Ok(())
    }

    // ----- internals -----

    fn read(&self) -> EntityStore<'_> {
        EntityStore::new(&self.conn)
    }

    /// Runs one composite write inside an immediate transaction. Any error
    /// rolls the whole operation back.
    fn write_tx<T, F>(&mut self, operation: F) -> LedgerResult<T>
    where
        F: FnOnce(&EntityStore<'_>) -> LedgerResult<T>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let result = operation(&EntityStore::new(&tx))?;
        tx.commit()?;
        Ok(result)
    }
}

fn ensure_slot_number_free(
    store: &EntityStore<'_>,
    number: i64,
    existing_id: Option<RecordId>,
) -> LedgerResult<()> {
    if let Some(other) = store.find_one::<Slot>("number", number)? {
        if existing_id != Some(other.id) {
            return Err(LedgerError::Conflict("slot number already in use"));
        }
    }
    Ok(())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
