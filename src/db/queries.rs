use rusqlite::{Connection, params};
use uuid::Uuid;

use crate::crypto::generate_license_key;
use crate::error::{AppError, Result, msg};
use crate::models::*;
use crate::util::{license_expiry, now};

use super::from_row::{
    DEVICE_COLS, LICENSE_COLS, SUBSCRIPTION_COLS, USER_COLS, query_all, query_one,
};

fn gen_id() -> String {
    Uuid::new_v4().to_string()
}

// ============ Users ============

/// Create a user. The email is stored normalized; the hash must already be computed.
pub fn create_user(conn: &Connection, email: &str, password_hash: &str) -> Result<User> {
    let id = gen_id();
    let now = now();
    let email = normalize_email(email);

    conn.execute(
        "INSERT INTO users (id, email, password_hash, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![&id, &email, password_hash, now, now],
    )?;

    Ok(User {
        id,
        email,
        password_hash: password_hash.to_string(),
        created_at: now,
        updated_at: now,
    })
}

pub fn get_user_by_id(conn: &Connection, id: &str) -> Result<Option<User>> {
    query_one(
        conn,
        &format!("SELECT {} FROM users WHERE id = ?1", USER_COLS),
        &[&id],
    )
}

pub fn get_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>> {
    let email = normalize_email(email);
    query_one(
        conn,
        &format!("SELECT {} FROM users WHERE email = ?1", USER_COLS),
        &[&email],
    )
}

// ============ Devices ============

/// Find the device registered for `(user_id, fingerprint)` or create it.
///
/// An existing device gets its `last_seen` bumped. Call inside a transaction
/// when the result feeds another write.
pub fn find_or_create_device(
    conn: &Connection,
    user_id: &str,
    fingerprint: &str,
) -> Result<DeviceAcquisition> {
    let now = now();

    let existing: Option<Device> = query_one(
        conn,
        &format!(
            "SELECT {} FROM devices WHERE user_id = ?1 AND fingerprint = ?2",
            DEVICE_COLS
        ),
        &[&user_id, &fingerprint],
    )?;

    if let Some(device) = existing {
        conn.execute(
            "UPDATE devices SET last_seen = ?1, updated_at = ?1 WHERE id = ?2",
            params![now, &device.id],
        )?;
        return Ok(DeviceAcquisition::Existing(Device {
            last_seen: now,
            updated_at: now,
            ..device
        }));
    }

    let id = gen_id();
    conn.execute(
        "INSERT INTO devices (id, user_id, fingerprint, last_seen, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?4, ?4)",
        params![&id, user_id, fingerprint, now],
    )?;

    Ok(DeviceAcquisition::Created(Device {
        id,
        user_id: user_id.to_string(),
        fingerprint: fingerprint.to_string(),
        last_seen: now,
        created_at: now,
        updated_at: now,
    }))
}

/// The device with this id, only if it also carries `fingerprint`.
pub fn get_device_by_id_and_fingerprint(
    conn: &Connection,
    id: &str,
    fingerprint: &str,
) -> Result<Option<Device>> {
    query_one(
        conn,
        &format!(
            "SELECT {} FROM devices WHERE id = ?1 AND fingerprint = ?2",
            DEVICE_COLS
        ),
        &[&id, &fingerprint],
    )
}

pub fn list_devices_for_user(conn: &Connection, user_id: &str) -> Result<Vec<Device>> {
    query_all(
        conn,
        &format!(
            "SELECT {} FROM devices WHERE user_id = ?1 ORDER BY created_at DESC",
            DEVICE_COLS
        ),
        &[&user_id],
    )
}

pub fn update_device_last_seen(conn: &Connection, id: &str) -> Result<()> {
    let now = now();
    conn.execute(
        "UPDATE devices SET last_seen = ?1, updated_at = ?1 WHERE id = ?2",
        params![now, id],
    )?;
    Ok(())
}

// ============ Licenses ============

/// Activate a new license for `(user_id, fingerprint)`.
///
/// Runs as one IMMEDIATE transaction: the user check, device find-or-create
/// and license insert either all land or none do, and concurrent activations
/// for the same new fingerprint serialize on the write lock.
///
/// Duplicate activations are allowed; each call mints an independent license.
pub fn activate_license(
    conn: &mut Connection,
    user_id: &str,
    fingerprint: &str,
    input: &CreateLicense,
) -> Result<Activation> {
    if fingerprint.trim().is_empty() {
        return Err(AppError::BadRequest(msg::FINGERPRINT_EMPTY.into()));
    }
    if input.plan.trim().is_empty() {
        return Err(AppError::BadRequest(msg::PLAN_EMPTY.into()));
    }

    let tx = conn.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;

    if get_user_by_id(&tx, user_id)?.is_none() {
        return Err(AppError::BadRequest(msg::USER_NOT_FOUND.into()));
    }

    let device = find_or_create_device(&tx, user_id, fingerprint)?;

    let id = gen_id();
    let key = generate_license_key();
    let now = now();
    let expires_at = license_expiry(now)?;

    tx.execute(
        "INSERT INTO licenses (id, key, user_id, device_id, plan, valid, expires_at, payment_provider, payment_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?7, ?8, ?9, ?9)",
        params![&id, &key, user_id, &device.device().id, &input.plan, expires_at, &input.payment_provider, &input.payment_id, now],
    )?;

    tx.commit()?;

    let license = License {
        id,
        key,
        user_id: user_id.to_string(),
        device_id: device.device().id.clone(),
        plan: input.plan.clone(),
        valid: true,
        expires_at,
        payment_provider: input.payment_provider.clone(),
        payment_id: input.payment_id.clone(),
        created_at: now,
        updated_at: now,
    };

    Ok(Activation { license, device })
}

pub fn get_license_by_key(conn: &Connection, key: &str) -> Result<Option<License>> {
    query_one(
        conn,
        &format!("SELECT {} FROM licenses WHERE key = ?1", LICENSE_COLS),
        &[&key],
    )
}

/// Look up a license by exact key that is still valid and unexpired at `now`.
pub fn get_usable_license_by_key(conn: &Connection, key: &str, now: i64) -> Result<Option<License>> {
    query_one(
        conn,
        &format!(
            "SELECT {} FROM licenses WHERE key = ?1 AND valid = 1 AND expires_at > ?2",
            LICENSE_COLS
        ),
        params![key, now],
    )
}

pub fn list_licenses_for_user(conn: &Connection, user_id: &str) -> Result<Vec<License>> {
    query_all(
        conn,
        &format!(
            "SELECT {} FROM licenses WHERE user_id = ?1 ORDER BY created_at DESC",
            LICENSE_COLS
        ),
        &[&user_id],
    )
}

// ============ Subscriptions ============

pub fn create_subscription(
    conn: &Connection,
    user_id: &str,
    input: &CreateSubscription,
) -> Result<Subscription> {
    let id = gen_id();
    let now = now();

    conn.execute(
        "INSERT INTO subscriptions (id, user_id, provider, status, plan, started_at, expires_at, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
        params![&id, user_id, &input.provider, &input.status, &input.plan, input.started_at, input.expires_at, now],
    )?;

    Ok(Subscription {
        id,
        user_id: user_id.to_string(),
        provider: input.provider.clone(),
        status: input.status.clone(),
        plan: input.plan.clone(),
        started_at: input.started_at,
        expires_at: input.expires_at,
        created_at: now,
        updated_at: now,
    })
}

pub fn list_subscriptions_for_user(conn: &Connection, user_id: &str) -> Result<Vec<Subscription>> {
    query_all(
        conn,
        &format!(
            "SELECT {} FROM subscriptions WHERE user_id = ?1 ORDER BY created_at DESC",
            SUBSCRIPTION_COLS
        ),
        &[&user_id],
    )
}
