//! Account entity - One record per external identity.
//!
//! The cached `balance` is authoritative at runtime; the ledger justifies it.
//! `version` is bumped on every claim and guards the conditional claim update.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    /// External identity (Discord user id), never reassigned
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    /// Optional label, refreshed on each resolution
    pub display_name: Option<String>,
    /// Current balance, always equal to the sum of this account's ledger deltas
    pub balance: i64,
    /// Consecutive calendar-day claims
    pub streak: i32,
    /// Instant of the most recent successful claim
    pub last_claim_at: Option<DateTimeUtc>,
    /// Optimistic-concurrency counter
    pub version: i64,
    /// When the account was first resolved
    pub created_at: DateTimeUtc,
    /// When the account row was last written
    pub updated_at: DateTimeUtc,
}

/// Accounts hold no references to their ledger entries.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
