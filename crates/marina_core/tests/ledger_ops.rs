use chrono::NaiveDate;
use marina_core::{
    ClientInput, LedgerError, MaintenanceInput, MarinaLedger, RecordId, SlotInput, SlotSize,
    SlotStatus, SlotSurface, VesselInput, VesselKind,
};

#[test]
fn create_vessel_with_slot_marks_slot_occupied() {
    let mut ledger = ledger();
    let client_id = create_client(&mut ledger, "Ana Souza");
    let slot_id = create_slot(&mut ledger, 1);

    let vessel = ledger
        .create_vessel(vessel_input("Mar Azul", client_id, Some(slot_id)))
        .unwrap();

    assert_eq!(vessel.slot_id, Some(slot_id));
    assert_eq!(slot_status(&ledger, slot_id), SlotStatus::Occupied);
    assert_allocation_consistent(&ledger);
}

#[test]
fn assigning_an_occupied_slot_fails_and_changes_nothing() {
    let mut ledger = ledger();
    let client_id = create_client(&mut ledger, "Ana Souza");
    let slot_id = create_slot(&mut ledger, 1);
    let other_slot = create_slot(&mut ledger, 2);

    let first = ledger
        .create_vessel(vessel_input("Mar Azul", client_id, Some(slot_id)))
        .unwrap();
    let second = ledger
        .create_vessel(vessel_input("Vento Sul", client_id, Some(other_slot)))
        .unwrap();

    let err = ledger
        .update_vessel(
            second.id,
            VesselInput {
                slot_id: Some(slot_id),
                ..vessel_input("Vento Sul", client_id, None)
            },
        )
        .unwrap_err();
    assert!(matches!(err, LedgerError::SlotUnavailable { slot_id: s } if s == slot_id));

    // Rolled back: both vessels keep their slots, both slots keep status.
    assert_eq!(
        ledger.get_vessel(first.id).unwrap().unwrap().slot_id,
        Some(slot_id)
    );
    assert_eq!(
        ledger.get_vessel(second.id).unwrap().unwrap().slot_id,
        Some(other_slot)
    );
    assert_eq!(slot_status(&ledger, slot_id), SlotStatus::Occupied);
    assert_eq!(slot_status(&ledger, other_slot), SlotStatus::Occupied);
    assert_allocation_consistent(&ledger);
}

#[test]
fn failed_vessel_creation_rolls_back_the_insert() {
    let mut ledger = ledger();
    let client_id = create_client(&mut ledger, "Ana Souza");
    let slot_id = create_slot(&mut ledger, 1);
    ledger
        .create_vessel(vessel_input("Mar Azul", client_id, Some(slot_id)))
        .unwrap();

    let err = ledger
        .create_vessel(vessel_input("Vento Sul", client_id, Some(slot_id)))
        .unwrap_err();
    assert!(matches!(err, LedgerError::SlotUnavailable { .. }));
    assert_eq!(ledger.list_vessels().unwrap().len(), 1);
}

#[test]
fn reassigning_frees_the_old_slot_and_occupies_the_new_one() {
    let mut ledger = ledger();
    let client_id = create_client(&mut ledger, "Ana Souza");
    let old_slot = create_slot(&mut ledger, 1);
    let new_slot = create_slot(&mut ledger, 2);

    let vessel = ledger
        .create_vessel(vessel_input("Mar Azul", client_id, Some(old_slot)))
        .unwrap();
    ledger
        .update_vessel(
            vessel.id,
            VesselInput {
                slot_id: Some(new_slot),
                ..vessel_input("Mar Azul", client_id, None)
            },
        )
        .unwrap();

    assert_eq!(slot_status(&ledger, old_slot), SlotStatus::Free);
    assert_eq!(slot_status(&ledger, new_slot), SlotStatus::Occupied);
    assert_allocation_consistent(&ledger);
}

#[test]
fn keeping_the_same_slot_is_a_noop() {
    let mut ledger = ledger();
    let client_id = create_client(&mut ledger, "Ana Souza");
    let slot_id = create_slot(&mut ledger, 1);

    let vessel = ledger
        .create_vessel(vessel_input("Mar Azul", client_id, Some(slot_id)))
        .unwrap();
    let updated = ledger
        .update_vessel(
            vessel.id,
            VesselInput {
                slot_id: Some(slot_id),
                year: Some(2021),
                ..vessel_input("Mar Azul", client_id, None)
            },
        )
        .unwrap();

    assert_eq!(updated.slot_id, Some(slot_id));
    assert_eq!(updated.year, Some(2021));
    assert_eq!(slot_status(&ledger, slot_id), SlotStatus::Occupied);
}

#[test]
fn deleting_a_vessel_cascades_maintenance_and_frees_the_slot() {
    let mut ledger = ledger();
    let client_id = create_client(&mut ledger, "Ana Souza");
    let slot_id = create_slot(&mut ledger, 1);
    let vessel = ledger
        .create_vessel(vessel_input("Mar Azul", client_id, Some(slot_id)))
        .unwrap();

    for month in 1..=3 {
        ledger
            .create_maintenance(maintenance_input(vessel.id, date(2030, month, 10)))
            .unwrap();
    }
    assert_eq!(ledger.maintenance_by_vessel(vessel.id).unwrap().len(), 3);

    ledger.delete_vessel(vessel.id).unwrap();

    assert!(ledger.get_vessel(vessel.id).unwrap().is_none());
    assert!(ledger.maintenance_by_vessel(vessel.id).unwrap().is_empty());
    assert_eq!(slot_status(&ledger, slot_id), SlotStatus::Free);
    assert_allocation_consistent(&ledger);
}

#[test]
fn deleting_a_referenced_client_is_a_conflict() {
    let mut ledger = ledger();
    let owner = create_client(&mut ledger, "Ana Souza");
    let bystander = create_client(&mut ledger, "Bruno Lima");
    ledger
        .create_vessel(vessel_input("Mar Azul", owner, None))
        .unwrap();

    let err = ledger.delete_client(owner).unwrap_err();
    assert!(matches!(err, LedgerError::Conflict(_)));
    assert!(ledger.get_client(owner).unwrap().is_some());

    ledger.delete_client(bystander).unwrap();
    assert!(ledger.get_client(bystander).unwrap().is_none());
}

#[test]
fn deleting_an_occupied_slot_is_a_conflict() {
    let mut ledger = ledger();
    let client_id = create_client(&mut ledger, "Ana Souza");
    let slot_id = create_slot(&mut ledger, 1);
    let free_slot = create_slot(&mut ledger, 2);
    let vessel = ledger
        .create_vessel(vessel_input("Mar Azul", client_id, Some(slot_id)))
        .unwrap();

    let err = ledger.delete_slot(slot_id).unwrap_err();
    assert!(matches!(err, LedgerError::Conflict(_)));

    ledger.delete_slot(free_slot).unwrap();

    // Once the vessel releases the slot, deletion goes through.
    ledger.delete_vessel(vessel.id).unwrap();
    ledger.delete_slot(slot_id).unwrap();
}

#[test]
fn duplicate_slot_numbers_are_rejected() {
    let mut ledger = ledger();
    create_slot(&mut ledger, 7);

    let err = ledger
        .create_slot(SlotInput {
            number: 7,
            size: SlotSize::Large,
            surface: SlotSurface::Dry,
        })
        .unwrap_err();
    assert!(matches!(err, LedgerError::Conflict(_)));
}

#[test]
fn update_slot_keeps_derived_status() {
    let mut ledger = ledger();
    let client_id = create_client(&mut ledger, "Ana Souza");
    let slot_id = create_slot(&mut ledger, 1);
    ledger
        .create_vessel(vessel_input("Mar Azul", client_id, Some(slot_id)))
        .unwrap();

    let updated = ledger
        .update_slot(
            slot_id,
            SlotInput {
                number: 1,
                size: SlotSize::Large,
                surface: SlotSurface::Dry,
            },
        )
        .unwrap();

    assert_eq!(updated.size, SlotSize::Large);
    assert_eq!(updated.status, SlotStatus::Occupied);
}

#[test]
fn vessel_creation_requires_an_existing_client() {
    let mut ledger = ledger();

    let err = ledger
        .create_vessel(vessel_input("Mar Azul", 999, None))
        .unwrap_err();
    assert!(matches!(err, LedgerError::NotFound { table: "clients", .. }));
}

#[test]
fn empty_required_fields_fail_validation() {
    let mut ledger = ledger();

    let err = ledger
        .create_client(ClientInput {
            name: "  ".to_string(),
            phone: "11 99999-0000".to_string(),
            ..ClientInput::default()
        })
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
}

#[test]
fn default_slot_seeding_runs_once() {
    let mut ledger = ledger();

    assert_eq!(ledger.ensure_default_slots().unwrap(), 12);
    assert_eq!(ledger.ensure_default_slots().unwrap(), 0);

    let slots = ledger.list_slots().unwrap();
    assert_eq!(slots.len(), 12);
    assert_eq!(slots[0].number, 1);
    assert_eq!(slots[0].size, SlotSize::Small);
    assert_eq!(slots[11].size, SlotSize::Large);
    assert!(slots.iter().all(|slot| slot.status == SlotStatus::Free));
}

#[test]
fn stats_reflect_allocation_and_open_maintenance() {
    let mut ledger = ledger();
    let client_id = create_client(&mut ledger, "Ana Souza");
    let slot_a = create_slot(&mut ledger, 1);
    create_slot(&mut ledger, 2);
    let vessel = ledger
        .create_vessel(vessel_input("Mar Azul", client_id, Some(slot_a)))
        .unwrap();
    ledger
        .create_maintenance(maintenance_input(vessel.id, date(2030, 6, 1)))
        .unwrap();
    let done = ledger
        .create_maintenance(maintenance_input(vessel.id, date(2030, 7, 1)))
        .unwrap();
    ledger
        .complete_maintenance(done.id, date(2030, 6, 20))
        .unwrap();

    let stats = ledger.stats().unwrap();
    assert_eq!(stats.free_slots, 1);
    assert_eq!(stats.occupied_slots, 1);
    assert_eq!(stats.vessels, 1);
    assert_eq!(stats.open_maintenance, 1);
}

#[test]
fn allocation_stays_consistent_across_an_operation_sequence() {
    let mut ledger = ledger();
    let client_id = create_client(&mut ledger, "Ana Souza");
    let slots: Vec<RecordId> = (1..=4).map(|n| create_slot(&mut ledger, n)).collect();

    let a = ledger
        .create_vessel(vessel_input("A", client_id, Some(slots[0])))
        .unwrap();
    let b = ledger
        .create_vessel(vessel_input("B", client_id, Some(slots[1])))
        .unwrap();
    assert_allocation_consistent(&ledger);

    // Shuffle assignments, including a rejected move and a release.
    let _ = ledger.update_vessel(
        a.id,
        VesselInput {
            slot_id: Some(slots[1]),
            ..vessel_input("A", client_id, None)
        },
    );
    assert_allocation_consistent(&ledger);

    ledger
        .update_vessel(
            a.id,
            VesselInput {
                slot_id: Some(slots[2]),
                ..vessel_input("A", client_id, None)
            },
        )
        .unwrap();
    assert_allocation_consistent(&ledger);

    ledger
        .update_vessel(b.id, vessel_input("B", client_id, None))
        .unwrap();
    assert_allocation_consistent(&ledger);

    ledger.delete_vessel(a.id).unwrap();
    assert_allocation_consistent(&ledger);

    let statuses: Vec<SlotStatus> = ledger
        .list_slots()
        .unwrap()
        .into_iter()
        .map(|slot| slot.status)
        .collect();
    assert_eq!(statuses, vec![SlotStatus::Free; 4]);
}

// ----- helpers -----

fn ledger() -> MarinaLedger {
    MarinaLedger::open_in_memory().unwrap()
}

fn create_client(ledger: &mut MarinaLedger, name: &str) -> RecordId {
    ledger
        .create_client(ClientInput {
            name: name.to_string(),
            phone: "11 99999-0000".to_string(),
            email: None,
            notes: None,
        })
        .unwrap()
        .id
}

fn create_slot(ledger: &mut MarinaLedger, number: i64) -> RecordId {
    ledger
        .create_slot(SlotInput {
            number,
            size: SlotSize::Medium,
            surface: SlotSurface::Water,
        })
        .unwrap()
        .id
}

fn vessel_input(name: &str, client_id: RecordId, slot_id: Option<RecordId>) -> VesselInput {
    VesselInput {
        name: name.to_string(),
        kind: VesselKind::Launch,
        model: None,
        year: None,
        length: Some(8.5),
        client_id,
        slot_id,
    }
}

fn maintenance_input(vessel_id: RecordId, next_date: chrono::NaiveDate) -> MaintenanceInput {
    MaintenanceInput {
        vessel_id,
        kind: "Troca de oleo".to_string(),
        description: None,
        next_date,
        interval_months: 0,
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn slot_status(ledger: &MarinaLedger, slot_id: RecordId) -> SlotStatus {
    ledger.get_slot(slot_id).unwrap().unwrap().status
}

/// Invariant check: a slot is occupied iff exactly one vessel references it.
fn assert_allocation_consistent(ledger: &MarinaLedger) {
    let vessels = ledger.list_vessels().unwrap();
    for slot in ledger.list_slots().unwrap() {
        let referencing = vessels
            .iter()
            .filter(|vessel| vessel.slot_id == Some(slot.id))
            .count();
        assert!(
            referencing <= 1,
            "slot {} referenced by {referencing} vessels",
            slot.id
        );
        let expected = if referencing == 1 {
            SlotStatus::Occupied
        } else {
            SlotStatus::Free
        };
        assert_eq!(
            slot.status, expected,
            "slot {} status out of sync with allocation",
            slot.id
        );
    }
}
