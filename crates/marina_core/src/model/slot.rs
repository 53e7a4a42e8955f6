//! Slot (berth) domain record.
//!
//! # Invariants
//! - `number` is unique within the marina.
//! - `status` mirrors vessel allocation: `Occupied` iff exactly one vessel
//!   references this slot. The allocation rules own every status change
//!   after creation.

use super::{RecordId, ValidationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotSize {
    Small,
    Medium,
    Large,
}

/// Whether the berth is in the water or dry storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotSurface {
    Water,
    Dry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Free,
    Occupied,
}

/// A physical berth assignable to one vessel at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// Store-assigned identifier.
    pub id: RecordId,
    pub number: i64,
    pub size: SlotSize,
    pub surface: SlotSurface,
    /// Derived allocation state, cached on the record.
    pub status: SlotStatus,
}

/// Caller-editable slot fields. Status is always derived, never input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotInput {
    pub number: i64,
    pub size: SlotSize,
    pub surface: SlotSurface,
}

impl SlotInput {
    pub(crate) fn into_record(self, id: RecordId, status: SlotStatus) -> Slot {
        Slot {
            id,
            number: self.number,
            size: self.size,
            surface: self.surface,
            status,
        }
    }
}

impl Slot {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.number < 1 {
            return Err(ValidationError::InvalidValue {
                entity: "slot",
                field: "number",
                reason: "must be a positive berth number",
            });
        }
        Ok(())
    }

    pub fn is_occupied(&self) -> bool {
        self.status == SlotStatus::Occupied
    }
}
