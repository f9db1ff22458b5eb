mod from_row;
mod schema;
pub mod queries;

pub use schema::init_db;

use std::time::Duration;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;

use crate::jwt::SessionSigner;

pub type DbPool = Pool<SqliteConnectionManager>;

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    /// Database pool (users, devices, licenses, subscriptions)
    pub db: DbPool,
    /// Issues and verifies session tokens
    pub sessions: SessionSigner,
    /// Razorpay webhook secret; signature checks are skipped when None
    pub razorpay_webhook_secret: Option<String>,
}

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Per-connection setup: foreign keys are off by default in SQLite, and
/// concurrent writers wait on the lock instead of failing with SQLITE_BUSY.
pub fn configure_connection(conn: &mut Connection) -> rusqlite::Result<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    conn.pragma_update(None, "foreign_keys", "ON")
}

pub fn create_pool(database_path: &str) -> Result<DbPool, r2d2::Error> {
    let manager = SqliteConnectionManager::file(database_path).with_init(|conn| {
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))?;
        configure_connection(conn)
    });
    Pool::builder().max_size(10).build(manager)
}

/// Single-connection in-memory pool (every in-memory connection is its own database).
pub fn create_memory_pool() -> Result<DbPool, r2d2::Error> {
    let manager = SqliteConnectionManager::memory().with_init(configure_connection);
    Pool::builder().max_size(1).build(manager)
}
