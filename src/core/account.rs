//! Account directory - Resolves external identities to account records.
//!
//! Accounts are created lazily on first resolution with a zero balance and no
//! streak. Creation is idempotent under concurrency: the insert is a no-op on a
//! primary-key conflict and every caller re-reads the winning row.

use crate::{
    core::identity::AuthenticatedIdentity,
    entities::{Account, account},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{
    Set,
    prelude::*,
    sea_query::{Expr, OnConflict},
};
use serde::Serialize;
use tracing::{debug, info, instrument};

/// Read-only view of an account's economy state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceSummary {
    /// External identity
    pub account_id: i64,
    /// Current display name
    pub display_name: Option<String>,
    /// Current balance
    pub balance: i64,
    /// Current streak
    pub streak: i32,
    /// Most recent successful claim
    pub last_claim_at: Option<DateTime<Utc>>,
}

impl From<account::Model> for BalanceSummary {
    fn from(model: account::Model) -> Self {
        Self {
            account_id: model.id,
            display_name: model.display_name,
            balance: model.balance,
            streak: model.streak,
            last_claim_at: model.last_claim_at,
        }
    }
}

/// Finds an account by id without creating it.
pub async fn find_account<C>(db: &C, account_id: i64) -> Result<Option<account::Model>>
where
    C: ConnectionTrait,
{
    Account::find_by_id(account_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Returns the account for `identity`, creating it if needed.
///
/// When the identity carries a display name that differs from the stored one,
/// the stored name is replaced. Nothing else about an existing account changes.
#[instrument(skip(db, identity), fields(account_id = identity.account_id()))]
pub async fn resolve_or_create<C>(db: &C, identity: &AuthenticatedIdentity) -> Result<account::Model>
where
    C: ConnectionTrait,
{
    let account_id = identity.account_id();

    let existing = match find_account(db, account_id).await? {
        Some(model) => model,
        None => {
            insert_if_absent(db, identity).await?;
            find_account(db, account_id)
                .await?
                .ok_or(Error::AccountNotFound { account_id })?
        }
    };

    refresh_display_name(db, existing, identity.display_name()).await
}

/// Read/upsert used by balance queries. No eligibility logic.
pub async fn get_balance<C>(db: &C, identity: &AuthenticatedIdentity) -> Result<BalanceSummary>
where
    C: ConnectionTrait,
{
    resolve_or_create(db, identity).await.map(Into::into)
}

async fn insert_if_absent<C>(db: &C, identity: &AuthenticatedIdentity) -> Result<()>
where
    C: ConnectionTrait,
{
    let now = Utc::now();
    let new_account = account::ActiveModel {
        id: Set(identity.account_id()),
        display_name: Set(identity.display_name().map(ToString::to_string)),
        balance: Set(0),
        streak: Set(0),
        last_claim_at: Set(None),
        version: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let inserted = Account::insert(new_account)
        .on_conflict(
            OnConflict::column(account::Column::Id)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    if inserted == 0 {
        debug!("Account already created by a concurrent caller");
    } else {
        info!("Created account");
    }
    Ok(())
}

async fn refresh_display_name<C>(
    db: &C,
    existing: account::Model,
    display_name: Option<&str>,
) -> Result<account::Model>
where
    C: ConnectionTrait,
{
    let Some(name) = display_name else {
        return Ok(existing);
    };
    if existing.display_name.as_deref() == Some(name) {
        return Ok(existing);
    }

    // Only the name column is written so a concurrent claim's balance is never overwritten.
    Account::update_many()
        .col_expr(account::Column::DisplayName, Expr::value(name))
        .col_expr(account::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(account::Column::Id.eq(existing.id))
        .exec(db)
        .await?;

    find_account(db, existing.id)
        .await?
        .ok_or(Error::AccountNotFound {
            account_id: existing.id,
        })
}
