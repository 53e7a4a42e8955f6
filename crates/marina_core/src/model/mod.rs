//! Domain records for the marina resource ledger.
//!
//! # Responsibility
//! - Define the canonical typed records used by core business logic.
//! - Validate required-vs-optional field rules before persistence.
//!
//! # Invariants
//! - Every record is identified by a store-assigned `RecordId`.
//! - `Slot::status` is derived state owned by the allocation rules; callers
//!   never set it directly after creation.

pub mod client;
pub mod maintenance;
pub mod slot;
pub mod vessel;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned auto-incrementing identifier shared by all entity kinds.
pub type RecordId = i64;

/// Field-level rejection raised before any write reaches storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is empty or absent.
    MissingField {
        entity: &'static str,
        field: &'static str,
    },
    /// A field is present but holds a value outside its domain.
    InvalidValue {
        entity: &'static str,
        field: &'static str,
        reason: &'static str,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { entity, field } => {
                write!(f, "{entity}.{field} is required")
            }
            Self::InvalidValue {
                entity,
                field,
                reason,
            } => write!(f, "{entity}.{field} is invalid: {reason}"),
        }
    }
}

impl Error for ValidationError {}
