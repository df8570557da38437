//! Ledger entry entity - Append-only audit record of one balance delta.
//!
//! Rows are inserted and never updated or deleted. `account_id` is a plain
//! foreign key used for lookup; the account owns the current balance.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Closed set of reasons a balance can change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(50))")]
pub enum LedgerReason {
    /// Periodic daily reward
    #[sea_orm(string_value = "daily")]
    Daily,
}

/// Ledger entry database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ledger_entries")]
pub struct Model {
    /// Monotonically assigned identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Account whose balance changed
    #[sea_orm(indexed)]
    pub account_id: i64,
    /// Signed change applied to the balance
    pub delta: i64,
    /// Why the balance changed
    pub reason: LedgerReason,
    /// Free-form annotation, informational only
    #[sea_orm(column_type = "Text", nullable)]
    pub context: Option<String>,
    /// When the change happened
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `LedgerEntry` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each entry belongs to one account
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AccountId",
        to = "super::account::Column::Id"
    )]
    Account,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
