//! Slot allocation rules.
//!
//! # Responsibility
//! - Keep the one-to-one slot/vessel relationship consistent: a slot is
//!   `Occupied` iff exactly one vessel references it.
//!
//! # Invariants
//! - Availability is checked before any state is mutated; a rejected
//!   assignment leaves both slots and the vessel untouched.
//! - Only the ledger facade calls into this module, always inside one
//!   write transaction.

use super::ledger::{LedgerError, LedgerResult};
use crate::model::slot::{Slot, SlotStatus};
use crate::model::vessel::Vessel;
use crate::model::RecordId;
use crate::store::EntityStore;

/// Moves a vessel onto `new_slot_id` (or off any slot when `None`),
/// freeing its previous slot and occupying the new one.
pub(crate) fn assign_slot(
    store: &EntityStore<'_>,
    vessel_id: RecordId,
    new_slot_id: Option<RecordId>,
) -> LedgerResult<()> {
    let mut vessel: Vessel = store.require(vessel_id)?;
    if vessel.slot_id == new_slot_id {
        return Ok(());
    }

    // Reject before mutating anything: partial application is forbidden.
    if let Some(slot_id) = new_slot_id {
        let target: Slot = store.require(slot_id)?;
        if target.is_occupied() && occupant_differs(store, slot_id, vessel_id)? {
            return Err(LedgerError::SlotUnavailable { slot_id });
        }
    }

    if let Some(old_slot_id) = vessel.slot_id {
        set_slot_status(store, old_slot_id, SlotStatus::Free)?;
    }
    if let Some(slot_id) = new_slot_id {
        set_slot_status(store, slot_id, SlotStatus::Occupied)?;
    }

    vessel.slot_id = new_slot_id;
    store.update(&vessel)?;
    Ok(())
}

/// Detaches a vessel from its slot, if any.
pub(crate) fn release(store: &EntityStore<'_>, vessel_id: RecordId) -> LedgerResult<()> {
    assign_slot(store, vessel_id, None)
}

fn occupant_differs(
    store: &EntityStore<'_>,
    slot_id: RecordId,
    vessel_id: RecordId,
) -> LedgerResult<bool> {
    let occupant: Option<Vessel> = store.find_one("slot_id", slot_id)?;
    Ok(occupant.map_or(true, |vessel| vessel.id != vessel_id))
}

fn set_slot_status(
    store: &EntityStore<'_>,
    slot_id: RecordId,
    status: SlotStatus,
) -> LedgerResult<()> {
    // A dangling slot reference (possible after a trusted snapshot import)
    // is tolerated here; the assignment itself still proceeds.
    if let Some(mut slot) = store.get::<Slot>(slot_id)? {
        if slot.status != status {
            slot.status = status;
            store.update(&slot)?;
        }
    }
    Ok(())
}
