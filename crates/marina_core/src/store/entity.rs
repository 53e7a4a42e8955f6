//! Storage contract and row mappings for the four ledger record kinds.
//!
//! # Invariants
//! - `to_values()` output order matches `COLUMNS` exactly.
//! - `from_row()` rejects out-of-domain persisted values with
//!   `StoreError::InvalidData` instead of defaulting them.

use crate::model::client::Client;
use crate::model::maintenance::{Maintenance, MaintenanceStatus};
use crate::model::slot::{Slot, SlotSize, SlotStatus, SlotSurface};
use crate::model::vessel::{Vessel, VesselKind};
use crate::model::{RecordId, ValidationError};
use crate::store::{StoreError, StoreResult};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::Row;

/// Contract every persisted ledger record implements.
///
/// The generic [`EntityStore`](crate::store::EntityStore) builds all SQL
/// from `TABLE`/`COLUMNS`, so one set of keyed-storage operations serves
/// every record kind.
pub trait Entity: Sized {
    const TABLE: &'static str;
    /// Column names excluding `id`, in `to_values()` order.
    const COLUMNS: &'static [&'static str];

    fn id(&self) -> RecordId;
    fn validate(&self) -> Result<(), ValidationError>;
    fn to_values(&self) -> Vec<Value>;
    fn from_row(row: &Row<'_>) -> StoreResult<Self>;
}

impl Entity for Client {
    const TABLE: &'static str = "clients";
    const COLUMNS: &'static [&'static str] = &["name", "phone", "email", "notes"];

    fn id(&self) -> RecordId {
        self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Client::validate(self)
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::from(self.name.clone()),
            Value::from(self.phone.clone()),
            Value::from(self.email.clone()),
            Value::from(self.notes.clone()),
        ]
    }

    fn from_row(row: &Row<'_>) -> StoreResult<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            phone: row.get("phone")?,
            email: row.get("email")?,
            notes: row.get("notes")?,
        })
    }
}

impl Entity for Slot {
    const TABLE: &'static str = "slots";
    const COLUMNS: &'static [&'static str] = &["number", "size", "surface", "status"];

    fn id(&self) -> RecordId {
        self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Slot::validate(self)
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::from(self.number),
            Value::from(slot_size_to_db(self.size).to_string()),
            Value::from(slot_surface_to_db(self.surface).to_string()),
            Value::from(slot_status_to_db(self.status).to_string()),
        ]
    }

    fn from_row(row: &Row<'_>) -> StoreResult<Self> {
        let size_text: String = row.get("size")?;
        let size = parse_slot_size(&size_text)
            .ok_or_else(|| invalid_column("slots", "size", &size_text))?;

        let surface_text: String = row.get("surface")?;
        let surface = parse_slot_surface(&surface_text)
            .ok_or_else(|| invalid_column("slots", "surface", &surface_text))?;

        let status_text: String = row.get("status")?;
        let status = parse_slot_status(&status_text)
            .ok_or_else(|| invalid_column("slots", "status", &status_text))?;

        Ok(Self {
            id: row.get("id")?,
            number: row.get("number")?,
            size,
            surface,
            status,
        })
    }
}

impl Entity for Vessel {
    const TABLE: &'static str = "vessels";
    const COLUMNS: &'static [&'static str] = &[
        "name", "kind", "model", "year", "length", "client_id", "slot_id",
    ];

    fn id(&self) -> RecordId {
        self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Vessel::validate(self)
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::from(self.name.clone()),
            Value::from(vessel_kind_to_db(self.kind).to_string()),
            Value::from(self.model.clone()),
            Value::from(self.year.map(i64::from)),
            Value::from(self.length),
            Value::from(self.client_id),
            Value::from(self.slot_id),
        ]
    }

    fn from_row(row: &Row<'_>) -> StoreResult<Self> {
        let kind_text: String = row.get("kind")?;
        let kind = parse_vessel_kind(&kind_text)
            .ok_or_else(|| invalid_column("vessels", "kind", &kind_text))?;

        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            kind,
            model: row.get("model")?,
            year: row.get("year")?,
            length: row.get("length")?,
            client_id: row.get("client_id")?,
            slot_id: row.get("slot_id")?,
        })
    }
}

impl Entity for Maintenance {
    const TABLE: &'static str = "maintenance";
    const COLUMNS: &'static [&'static str] = &[
        "vessel_id",
        "kind",
        "description",
        "next_date",
        "interval_months",
        "status",
        "completed_date",
    ];

    fn id(&self) -> RecordId {
        self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Maintenance::validate(self)
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::from(self.vessel_id),
            Value::from(self.kind.clone()),
            Value::from(self.description.clone()),
            Value::from(date_to_db(self.next_date)),
            Value::from(i64::from(self.interval_months)),
            Value::from(maintenance_status_to_db(self.status).to_string()),
            Value::from(self.completed_date.map(date_to_db)),
        ]
    }

    fn from_row(row: &Row<'_>) -> StoreResult<Self> {
        let status_text: String = row.get("status")?;
        let status = parse_maintenance_status(&status_text)
            .ok_or_else(|| invalid_column("maintenance", "status", &status_text))?;

        let next_date_text: String = row.get("next_date")?;
        let next_date = parse_db_date(&next_date_text)
            .ok_or_else(|| invalid_column("maintenance", "next_date", &next_date_text))?;

        let completed_date = match row.get::<_, Option<String>>("completed_date")? {
            Some(text) => Some(
                parse_db_date(&text)
                    .ok_or_else(|| invalid_column("maintenance", "completed_date", &text))?,
            ),
            None => None,
        };

        let interval: i64 = row.get("interval_months")?;
        let interval_months = u32::try_from(interval).map_err(|_| {
            invalid_column("maintenance", "interval_months", &interval.to_string())
        })?;

        Ok(Self {
            id: row.get("id")?,
            vessel_id: row.get("vessel_id")?,
            kind: row.get("kind")?,
            description: row.get("description")?,
            next_date,
            interval_months,
            status,
            completed_date,
        })
    }
}

const DB_DATE_FORMAT: &str = "%Y-%m-%d";

fn date_to_db(date: NaiveDate) -> String {
    date.format(DB_DATE_FORMAT).to_string()
}

fn parse_db_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DB_DATE_FORMAT).ok()
}

fn invalid_column(table: &str, column: &str, value: &str) -> StoreError {
    StoreError::InvalidData(format!("invalid value `{value}` in {table}.{column}"))
}

fn slot_size_to_db(size: SlotSize) -> &'static str {
    match size {
        SlotSize::Small => "small",
        SlotSize::Medium => "medium",
        SlotSize::Large => "large",
    }
}

fn parse_slot_size(value: &str) -> Option<SlotSize> {
    match value {
        "small" => Some(SlotSize::Small),
        "medium" => Some(SlotSize::Medium),
        "large" => Some(SlotSize::Large),
        _ => None,
    }
}

fn slot_surface_to_db(surface: SlotSurface) -> &'static str {
    match surface {
        SlotSurface::Water => "water",
        SlotSurface::Dry => "dry",
    }
}

fn parse_slot_surface(value: &str) -> Option<SlotSurface> {
    match value {
        "water" => Some(SlotSurface::Water),
        "dry" => Some(SlotSurface::Dry),
        _ => None,
    }
}

fn slot_status_to_db(status: SlotStatus) -> &'static str {
    match status {
        SlotStatus::Free => "free",
        SlotStatus::Occupied => "occupied",
    }
}

fn parse_slot_status(value: &str) -> Option<SlotStatus> {
    match value {
        "free" => Some(SlotStatus::Free),
        "occupied" => Some(SlotStatus::Occupied),
        _ => None,
    }
}

fn vessel_kind_to_db(kind: VesselKind) -> &'static str {
    match kind {
        VesselKind::Launch => "launch",
        VesselKind::JetSki => "jet-ski",
        VesselKind::Sailboat => "sailboat",
        VesselKind::Yacht => "yacht",
        VesselKind::Boat => "boat",
    }
}

fn parse_vessel_kind(value: &str) -> Option<VesselKind> {
    match value {
        "launch" => Some(VesselKind::Launch),
        "jet-ski" => Some(VesselKind::JetSki),
        "sailboat" => Some(VesselKind::Sailboat),
        "yacht" => Some(VesselKind::Yacht),
        "boat" => Some(VesselKind::Boat),
        _ => None,
    }
}

fn maintenance_status_to_db(status: MaintenanceStatus) -> &'static str {
    match status {
        MaintenanceStatus::Pending => "pending",
        MaintenanceStatus::Overdue => "overdue",
        MaintenanceStatus::Completed => "completed",
    }
}

fn parse_maintenance_status(value: &str) -> Option<MaintenanceStatus> {
    match value {
        "pending" => Some(MaintenanceStatus::Pending),
        "overdue" => Some(MaintenanceStatus::Overdue),
        "completed" => Some(MaintenanceStatus::Completed),
        _ => None,
    }
}
