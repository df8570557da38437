//! Shared test utilities for Doodlebucks.
//!
//! Helpers for setting up an in-memory database and building identities and
//! timestamps with sensible defaults.

use crate::{
    core::identity::AuthenticatedIdentity,
    entities::{LedgerEntry, ledger_entry},
    errors::Result,
};
use chrono::{DateTime, TimeZone, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use tracing_subscriber::EnvFilter;

/// Routes tracing output through the test harness. Safe to call repeatedly.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Builds a valid identity.
///
/// # Panics
/// Panics if `account_id` is not a valid identity.
#[allow(clippy::expect_used)]
pub fn test_identity(account_id: u64, display_name: Option<&str>) -> AuthenticatedIdentity {
    AuthenticatedIdentity::new(account_id, display_name.map(ToString::to_string))
        .expect("test identity should be valid")
}

/// UTC instant at whole minutes.
///
/// # Panics
/// Panics on an impossible date.
#[allow(clippy::expect_used)]
pub fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .expect("test timestamp should be valid")
}

/// Number of ledger rows recorded for `account_id`.
pub async fn ledger_entry_count(db: &DatabaseConnection, account_id: i64) -> Result<u64> {
    LedgerEntry::find()
        .filter(ledger_entry::Column::AccountId.eq(account_id))
        .count(db)
        .await
        .map_err(Into::into)
}
