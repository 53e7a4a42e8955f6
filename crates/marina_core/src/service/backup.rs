//! Versioned whole-dataset snapshot export and restore.
//!
//! # Responsibility
//! - Serialize the full ledger as one JSON document and restore it with
//!   all-or-nothing replace semantics.
//!
//! # Invariants
//! - Restore preserves the snapshot's identifiers exactly; nothing is
//!   re-keyed.
//! - A well-formed snapshot is trusted: restore does not re-derive
//!   cross-entity invariants (slot statuses, reference coherence). The
//!   exporter is the conformant side of that contract.

use crate::model::client::Client;
use crate::model::maintenance::Maintenance;
use crate::model::slot::Slot;
use crate::model::vessel::Vessel;
use crate::store::{EntityStore, StoreError};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// The only snapshot layout this build understands.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Complete, versioned serialization of all ledger entities.
///
/// Wire keys keep the source system's backup file vocabulary so existing
/// backup files restore unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    /// RFC 3339 timestamp taken at export time.
    #[serde(rename = "exportDate")]
    pub export_date: String,
    #[serde(rename = "clientes")]
    pub clients: Vec<Client>,
    #[serde(rename = "vagas")]
    pub slots: Vec<Slot>,
    #[serde(rename = "embarcacoes")]
    pub vessels: Vec<Vessel>,
    #[serde(rename = "manutencoes")]
    pub maintenance: Vec<Maintenance>,
}

pub type BackupResult<T> = Result<T, BackupError>;

#[derive(Debug)]
pub enum BackupError {
    /// The document is not a snapshot: bad JSON, or one of the four
    /// entity arrays is missing.
    InvalidFormat(String),
    /// The document is a snapshot, but from a layout this build does not
    /// understand.
    UnsupportedVersion { found: u32, supported: u32 },
    /// Persistence-layer failure during export or restore.
    Store(StoreError),
}

impl Display for BackupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFormat(message) => write!(f, "invalid snapshot format: {message}"),
            Self::UnsupportedVersion { found, supported } => write!(
                f,
                "unsupported snapshot version {found}; this build supports {supported}"
            ),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BackupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for BackupError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<rusqlite::Error> for BackupError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Store(StoreError::from(value))
    }
}

impl Snapshot {
    /// Parses a snapshot document, rejecting anything that is not a
    /// complete, version-supported snapshot.
    pub fn parse(json: &str) -> BackupResult<Self> {
        let snapshot: Self =
            serde_json::from_str(json).map_err(|err| BackupError::InvalidFormat(err.to_string()))?;
        snapshot.check_version()?;
        Ok(snapshot)
    }

    pub fn to_json(&self) -> BackupResult<String> {
        serde_json::to_string_pretty(self).map_err(|err| BackupError::InvalidFormat(err.to_string()))
    }

    fn check_version(&self) -> BackupResult<()> {
        if self.version != SNAPSHOT_VERSION {
            return Err(BackupError::UnsupportedVersion {
                found: self.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        Ok(())
    }
}

/// Captures the full current state. Read-only.
pub(crate) fn export(store: &EntityStore<'_>) -> BackupResult<Snapshot> {
    Ok(Snapshot {
        version: SNAPSHOT_VERSION,
        export_date: Utc::now().to_rfc3339(),
        clients: store.all()?,
        slots: store.all()?,
        vessels: store.all()?,
        maintenance: store.all()?,
    })
}

/// Clears all four entity kinds and restores the snapshot rows with their
/// identifiers intact. Runs inside the caller's transaction.
pub(crate) fn import(store: &EntityStore<'_>, snapshot: &Snapshot) -> BackupResult<()> {
    snapshot.check_version()?;

    store.clear::<Maintenance>()?;
    store.clear::<Vessel>()?;
    store.clear::<Slot>()?;
    store.clear::<Client>()?;

    store.bulk_insert(&snapshot.clients)?;
    store.bulk_insert(&snapshot.slots)?;
    store.bulk_insert(&snapshot.vessels)?;
    store.bulk_insert(&snapshot.maintenance)?;

    Ok(())
}
