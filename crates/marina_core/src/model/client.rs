//! Client domain record.

use super::{RecordId, ValidationError};
use serde::{Deserialize, Serialize};

/// A boat owner registered with the marina.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    /// Store-assigned identifier.
    pub id: RecordId,
    pub name: String,
    /// Contact phone, kept verbatim as entered (formatting is a UI concern).
    pub phone: String,
    pub email: Option<String>,
    pub notes: Option<String>,
}

/// Caller-editable client fields; the store owns the identifier.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClientInput {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub notes: Option<String>,
}

impl ClientInput {
    pub(crate) fn into_record(self, id: RecordId) -> Client {
        Client {
            id,
            name: self.name,
            phone: self.phone,
            email: self.email,
            notes: self.notes,
        }
    }
}

impl Client {
    /// Checks required-field rules before any write.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField {
                entity: "client",
                field: "name",
            });
        }
        if self.phone.trim().is_empty() {
            return Err(ValidationError::MissingField {
                entity: "client",
                field: "phone",
            });
        }
        Ok(())
    }
}
