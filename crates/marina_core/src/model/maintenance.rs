//! Maintenance domain record.
//!
//! # Invariants
//! - `Completed` is terminal: a completed record is never recomputed to
//!   `Overdue`, and completing it again is rejected.
//! - `interval_months == 0` means non-recurring.

use super::{RecordId, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaintenanceStatus {
    Pending,
    Overdue,
    Completed,
}

/// A scheduled or completed service task tied to one vessel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Maintenance {
    /// Store-assigned identifier.
    pub id: RecordId,
    pub vessel_id: RecordId,
    /// Service kind, free text ("Troca de oleo", "Limpeza do casco", ...).
    pub kind: String,
    pub description: Option<String>,
    /// Day the service is due; day granularity, no time component.
    pub next_date: NaiveDate,
    /// Recurrence interval; 0 disables recurrence.
    pub interval_months: u32,
    pub status: MaintenanceStatus,
    pub completed_date: Option<NaiveDate>,
}

/// Caller-editable maintenance fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaintenanceInput {
    pub vessel_id: RecordId,
    pub kind: String,
    pub description: Option<String>,
    pub next_date: NaiveDate,
    pub interval_months: u32,
}

impl MaintenanceInput {
    pub(crate) fn into_record(self, id: RecordId) -> Maintenance {
        Maintenance {
            id,
            vessel_id: self.vessel_id,
            kind: self.kind,
            description: self.description,
            next_date: self.next_date,
            interval_months: self.interval_months,
            status: MaintenanceStatus::Pending,
            completed_date: None,
        }
    }
}

impl Maintenance {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.kind.trim().is_empty() {
            return Err(ValidationError::MissingField {
                entity: "maintenance",
                field: "kind",
            });
        }
        if self.vessel_id < 1 {
            return Err(ValidationError::MissingField {
                entity: "maintenance",
                field: "vessel_id",
            });
        }
        Ok(())
    }

    pub fn is_completed(&self) -> bool {
        self.status == MaintenanceStatus::Completed
    }
}
