//! Device registration tests

#[path = "../common/mod.rs"]
mod common;
use common::*;

#[test]
fn test_find_or_create_device_creates_then_reuses() {
    let conn = setup_test_db();
    let user = create_test_user(&conn, "dev@example.com");

    let first = queries::find_or_create_device(&conn, &user.id, "fp-1").unwrap();
    assert!(first.is_new());

    let second = queries::find_or_create_device(&conn, &user.id, "fp-1").unwrap();
    assert!(!second.is_new());
    assert_eq!(first.device().id, second.device().id);
    assert_eq!(count_rows(&conn, "devices"), 1);
}

#[test]
fn test_same_fingerprint_different_users_are_distinct_devices() {
    let conn = setup_test_db();
    let alice = create_test_user(&conn, "alice@example.com");
    let bob = create_test_user(&conn, "bob@example.com");

    let a = queries::find_or_create_device(&conn, &alice.id, "shared-fp").unwrap();
    let b = queries::find_or_create_device(&conn, &bob.id, "shared-fp").unwrap();

    assert!(a.is_new() && b.is_new());
    assert_ne!(a.device().id, b.device().id);
    assert_eq!(queries::list_devices_for_user(&conn, &alice.id).unwrap().len(), 1);
    assert_eq!(queries::list_devices_for_user(&conn, &bob.id).unwrap().len(), 1);
}

#[test]
fn test_existing_device_last_seen_is_bumped() {
    let conn = setup_test_db();
    let user = create_test_user(&conn, "seen@example.com");
    let device = queries::find_or_create_device(&conn, &user.id, "fp")
        .unwrap()
        .device()
        .clone();

    conn.execute(
        "UPDATE devices SET last_seen = ?1 WHERE id = ?2",
        rusqlite::params![past_timestamp(10), &device.id],
    )
    .unwrap();

    let again = queries::find_or_create_device(&conn, &user.id, "fp")
        .unwrap()
        .device()
        .clone();
    assert!(again.last_seen >= now() - 5);

    let stored = queries::list_devices_for_user(&conn, &user.id).unwrap();
    assert_eq!(stored[0].last_seen, again.last_seen);
}

#[test]
fn test_get_device_requires_matching_fingerprint() {
    let conn = setup_test_db();
    let user = create_test_user(&conn, "fp@example.com");
    let device = queries::find_or_create_device(&conn, &user.id, "right")
        .unwrap()
        .device()
        .clone();

    assert!(
        queries::get_device_by_id_and_fingerprint(&conn, &device.id, "right")
            .unwrap()
            .is_some()
    );
    assert!(
        queries::get_device_by_id_and_fingerprint(&conn, &device.id, "wrong")
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_update_device_last_seen() {
    let conn = setup_test_db();
    let user = create_test_user(&conn, "touch@example.com");
    let device = queries::find_or_create_device(&conn, &user.id, "fp")
        .unwrap()
        .device()
        .clone();

    conn.execute(
        "UPDATE devices SET last_seen = 0 WHERE id = ?1",
        [&device.id],
    )
    .unwrap();
    queries::update_device_last_seen(&conn, &device.id).unwrap();

    let stored = queries::list_devices_for_user(&conn, &user.id).unwrap();
    assert!(stored[0].last_seen > 0);
}
