use marina_core::db::open_db_in_memory;
use marina_core::{Client, EntityStore, StoreError};

#[test]
fn insert_assigns_sequential_identifiers() {
    let conn = open_db_in_memory().unwrap();
    let store = EntityStore::new(&conn);

    let first = store.insert(&client(0, "Ana Souza")).unwrap();
    let second = store.insert(&client(0, "Bruno Lima")).unwrap();

    assert!(second > first);
    let loaded: Client = store.require(first).unwrap();
    assert_eq!(loaded.name, "Ana Souza");
    assert_eq!(loaded.id, first);
}

#[test]
fn update_rewrites_the_full_row() {
    let conn = open_db_in_memory().unwrap();
    let store = EntityStore::new(&conn);

    let id = store.insert(&client(0, "Ana Souza")).unwrap();
    let mut record: Client = store.require(id).unwrap();
    record.email = Some("ana@example.com".to_string());
    store.update(&record).unwrap();

    let loaded: Client = store.require(id).unwrap();
    assert_eq!(loaded.email.as_deref(), Some("ana@example.com"));
}

#[test]
fn update_on_a_missing_id_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let store = EntityStore::new(&conn);

    let err = store.update(&client(42, "Ghost")).unwrap_err();
    assert!(matches!(
        err,
        StoreError::NotFound {
            table: "clients",
            id: 42
        }
    ));
}

#[test]
fn delete_on_a_missing_id_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let store = EntityStore::new(&conn);

    let err = store.delete::<Client>(42).unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[test]
fn find_matches_on_field_equality() {
    let conn = open_db_in_memory().unwrap();
    let store = EntityStore::new(&conn);

    store.insert(&client(0, "Ana Souza")).unwrap();
    store.insert(&client(0, "Bruno Lima")).unwrap();

    let matches: Vec<Client> = store.find("name", "Bruno Lima".to_string()).unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].name, "Bruno Lima");

    let none: Option<Client> = store.find_one("name", "Carla".to_string()).unwrap();
    assert!(none.is_none());
}

#[test]
fn find_rejects_unknown_columns() {
    let conn = open_db_in_memory().unwrap();
    let store = EntityStore::new(&conn);

    let err = store
        .find::<Client>("nonexistent", "x".to_string())
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)));
}

#[test]
fn bulk_insert_preserves_caller_identifiers() {
    let conn = open_db_in_memory().unwrap();
    let store = EntityStore::new(&conn);

    let batch = vec![client(10, "Ana Souza"), client(25, "Bruno Lima")];
    store.bulk_insert(&batch).unwrap();

    assert_eq!(store.count::<Client>().unwrap(), 2);
    let loaded: Client = store.require(25).unwrap();
    assert_eq!(loaded.name, "Bruno Lima");

    // Fresh inserts continue past the restored key space.
    let next = store.insert(&client(0, "Carla Dias")).unwrap();
    assert!(next > 25);
}

#[test]
fn clear_empties_one_entity_kind() {
    let conn = open_db_in_memory().unwrap();
    let store = EntityStore::new(&conn);

    store.insert(&client(0, "Ana Souza")).unwrap();
    store.clear::<Client>().unwrap();
    assert_eq!(store.count::<Client>().unwrap(), 0);
}

#[test]
fn validation_blocks_invalid_writes() {
    let conn = open_db_in_memory().unwrap();
    let store = EntityStore::new(&conn);

    let err = store.insert(&client(0, "   ")).unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
}

fn client(id: i64, name: &str) -> Client {
    Client {
        id,
        name: name.to_string(),
        phone: "11 98888-7777".to_string(),
        email: None,
        notes: None,
    }
}
