//! Maintenance status derivation and recurrence.
//!
//! # Responsibility
//! - Flip pending records to overdue once their due date has passed.
//! - Spawn the single follow-up record for recurring maintenance on
//!   completion.
//!
//! # Invariants
//! - `Completed` is terminal; completed records are never rescanned.
//! - `refresh_statuses` is idempotent for a given `as_of` day.
//! - Listings ascend by due date, ties broken by id for determinism.

use super::ledger::{LedgerError, LedgerResult};
use crate::model::maintenance::{Maintenance, MaintenanceStatus};
use crate::model::{RecordId, ValidationError};
use crate::store::EntityStore;
use chrono::{Days, Months, NaiveDate};

/// Result of completing one maintenance record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionOutcome {
    pub completed: Maintenance,
    /// The follow-up record, present iff the completed record recurs.
    pub successor: Option<Maintenance>,
}

/// Marks every pending record whose due date precedes `as_of` as overdue.
/// Returns the number of records rewritten; zero on a repeated run.
pub(crate) fn refresh_statuses(store: &EntityStore<'_>, as_of: NaiveDate) -> LedgerResult<usize> {
    let mut changed = 0;
    for mut record in store.all::<Maintenance>()? {
        if record.status == MaintenanceStatus::Pending && record.next_date < as_of {
            record.status = MaintenanceStatus::Overdue;
            store.update(&record)?;
            changed += 1;
        }
    }
    Ok(changed)
}

/// Completes one record and, for recurring maintenance, schedules exactly
/// one successor `interval_months` after the old due date.
pub(crate) fn complete(
    store: &EntityStore<'_>,
    id: RecordId,
    completed_date: NaiveDate,
) -> LedgerResult<CompletionOutcome> {
    let mut record: Maintenance = store.require(id)?;
    if record.is_completed() {
        return Err(LedgerError::AlreadyCompleted(id));
    }

    record.status = MaintenanceStatus::Completed;
    record.completed_date = Some(completed_date);
    store.update(&record)?;

    let successor = if record.interval_months > 0 {
        let next_date = add_months(record.next_date, record.interval_months)?;
        let follow_up = Maintenance {
            id: 0,
            vessel_id: record.vessel_id,
            kind: record.kind.clone(),
            description: record.description.clone(),
            next_date,
            interval_months: record.interval_months,
            status: MaintenanceStatus::Pending,
            completed_date: None,
        };
        let successor_id = store.insert(&follow_up)?;
        Some(store.require::<Maintenance>(successor_id)?)
    } else {
        None
    };

    Ok(CompletionOutcome {
        completed: record,
        successor,
    })
}

/// Non-completed records due within `[as_of, as_of + within_days]`,
/// excluding anything already past due.
pub(crate) fn upcoming(
    store: &EntityStore<'_>,
    as_of: NaiveDate,
    within_days: u32,
) -> LedgerResult<Vec<Maintenance>> {
    let horizon = as_of
        .checked_add_days(Days::new(u64::from(within_days)))
        .ok_or(out_of_range("within_days"))?;
    let mut records: Vec<Maintenance> = store
        .all::<Maintenance>()?
        .into_iter()
        .filter(|record| {
            !record.is_completed() && record.next_date >= as_of && record.next_date <= horizon
        })
        .collect();
    sort_by_due_date(&mut records);
    Ok(records)
}

/// Non-completed records whose due date precedes `as_of`.
pub(crate) fn overdue(store: &EntityStore<'_>, as_of: NaiveDate) -> LedgerResult<Vec<Maintenance>> {
    let mut records: Vec<Maintenance> = store
        .all::<Maintenance>()?
        .into_iter()
        .filter(|record| !record.is_completed() && record.next_date < as_of)
        .collect();
    sort_by_due_date(&mut records);
    Ok(records)
}

pub(crate) fn sort_by_due_date(records: &mut [Maintenance]) {
    records.sort_by_key(|record| (record.next_date, record.id));
}

fn add_months(date: NaiveDate, months: u32) -> LedgerResult<NaiveDate> {
    date.checked_add_months(Months::new(months))
        .ok_or(out_of_range("interval_months"))
}

fn out_of_range(field: &'static str) -> LedgerError {
    LedgerError::Validation(ValidationError::InvalidValue {
        entity: "maintenance",
        field,
        reason: "resulting date is out of the supported range",
    })
}
