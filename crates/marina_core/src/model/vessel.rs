//! Vessel domain record.
//!
//! # Invariants
//! - `client_id` always references an existing client; enforced by the
//!   ledger facade on create/update and by the client delete guard.
//! - `slot_id` changes go through the allocation rules only.

use super::{RecordId, ValidationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VesselKind {
    Launch,
    JetSki,
    Sailboat,
    Yacht,
    Boat,
}

/// A client-owned boat, optionally occupying one slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vessel {
    /// Store-assigned identifier.
    pub id: RecordId,
    pub name: String,
    pub kind: VesselKind,
    pub model: Option<String>,
    pub year: Option<i32>,
    /// Hull length in meters.
    pub length: Option<f64>,
    pub client_id: RecordId,
    pub slot_id: Option<RecordId>,
}

/// Caller-editable vessel fields.
#[derive(Debug, Clone, PartialEq)]
pub struct VesselInput {
    pub name: String,
    pub kind: VesselKind,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub length: Option<f64>,
    pub client_id: RecordId,
    pub slot_id: Option<RecordId>,
}

impl VesselInput {
    pub(crate) fn into_record(self, id: RecordId) -> Vessel {
        Vessel {
            id,
            name: self.name,
            kind: self.kind,
            model: self.model,
            year: self.year,
            length: self.length,
            client_id: self.client_id,
            slot_id: self.slot_id,
        }
    }
}

impl Vessel {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField {
                entity: "vessel",
                field: "name",
            });
        }
        if self.client_id < 1 {
            return Err(ValidationError::MissingField {
                entity: "vessel",
                field: "client_id",
            });
        }
        if let Some(length) = self.length {
            if !(length > 0.0) {
                return Err(ValidationError::InvalidValue {
                    entity: "vessel",
                    field: "length",
                    reason: "must be a positive length in meters",
                });
            }
        }
        Ok(())
    }
}
