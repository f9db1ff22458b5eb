//! User storage tests

#[path = "../common/mod.rs"]
mod common;
use common::*;

use license_server::crypto::verify_password;
use license_server::error::AppError;

#[test]
fn test_create_user_normalizes_email() {
    let conn = setup_test_db();
    let user = create_test_user(&conn, "  Alice@Example.COM ");

    assert_eq!(user.email, "alice@example.com");

    let found = queries::get_user_by_email(&conn, "ALICE@example.com")
        .unwrap()
        .expect("lookup should be case-insensitive");
    assert_eq!(found.id, user.id);
}

#[test]
fn test_get_user_by_id() {
    let conn = setup_test_db();
    let user = create_test_user(&conn, "bob@example.com");

    let found = queries::get_user_by_id(&conn, &user.id).unwrap().unwrap();
    assert_eq!(found.email, "bob@example.com");
    assert!(verify_password(TEST_PASSWORD, &found.password_hash).unwrap());

    assert!(queries::get_user_by_id(&conn, "missing").unwrap().is_none());
}

#[test]
fn test_password_is_stored_hashed() {
    let conn = setup_test_db();
    let user = create_test_user(&conn, "carol@example.com");

    assert_ne!(user.password_hash, TEST_PASSWORD);
    assert!(user.password_hash.starts_with("$argon2"));
}

#[test]
fn test_duplicate_email_is_unique_violation() {
    let conn = setup_test_db();
    create_test_user(&conn, "dave@example.com");

    let hash = hash_password("other").unwrap();
    let err = queries::create_user(&conn, "DAVE@example.com", &hash).unwrap_err();
    assert!(err.is_unique_violation(), "unexpected error: {err}");
    assert!(matches!(err, AppError::Database(_)));
    assert_eq!(count_rows(&conn, "users"), 1);
}
