//! Ledger store - Append-only record of balance deltas.
//!
//! Entries are only ever inserted. Summation exists for reconciliation and
//! tests; the account's cached balance is what the hot path reads.

use crate::{
    entities::{Account, LedgerEntry, LedgerReason, account, ledger_entry},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, QuerySelect, Set, prelude::*};
use tracing::{debug, instrument, warn};

/// Appends one entry. Pass a transaction to make it part of a larger atomic unit.
#[instrument(skip(db, context))]
pub async fn append<C>(
    db: &C,
    account_id: i64,
    delta: i64,
    reason: LedgerReason,
    context: Option<String>,
    at: DateTime<Utc>,
) -> Result<ledger_entry::Model>
where
    C: ConnectionTrait,
{
    let entry = ledger_entry::ActiveModel {
        account_id: Set(account_id),
        delta: Set(delta),
        reason: Set(reason),
        context: Set(context),
        created_at: Set(at),
        ..Default::default()
    };

    let inserted = entry.insert(db).await?;
    debug!(entry_id = inserted.id, "Ledger entry appended");
    Ok(inserted)
}

/// Sum of all deltas recorded for `account_id` (zero when there are none).
pub async fn sum_for<C>(db: &C, account_id: i64) -> Result<i64>
where
    C: ConnectionTrait,
{
    let total: Option<Option<i64>> = LedgerEntry::find()
        .select_only()
        .column_as(ledger_entry::Column::Delta.sum(), "total")
        .filter(ledger_entry::Column::AccountId.eq(account_id))
        .into_tuple()
        .one(db)
        .await?;

    Ok(total.flatten().unwrap_or(0))
}

/// Outcome of checking one account against its ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciliation {
    /// Account checked
    pub account_id: i64,
    /// Cached balance on the account row
    pub balance: i64,
    /// Sum of the account's ledger deltas
    pub ledger_sum: i64,
}

impl Reconciliation {
    /// Whether the cached balance matches the ledger.
    #[must_use]
    pub const fn is_balanced(&self) -> bool {
        self.balance == self.ledger_sum
    }

    /// Converts an imbalance into `Error::LedgerMismatch`.
    ///
    /// # Errors
    /// Returns `Error::LedgerMismatch` when the balance and ledger sum differ.
    pub fn ensure_balanced(self) -> Result<Self> {
        if self.is_balanced() {
            Ok(self)
        } else {
            Err(Error::LedgerMismatch {
                account_id: self.account_id,
                balance: self.balance,
                ledger_sum: self.ledger_sum,
            })
        }
    }
}

/// Compares one account's cached balance with its ledger.
pub async fn verify_account<C>(db: &C, account_id: i64) -> Result<Reconciliation>
where
    C: ConnectionTrait,
{
    let account = Account::find_by_id(account_id)
        .one(db)
        .await?
        .ok_or(Error::AccountNotFound { account_id })?;
    let ledger_sum = sum_for(db, account_id).await?;

    Ok(Reconciliation {
        account_id,
        balance: account.balance,
        ledger_sum,
    })
}

/// Reconciles every account, ordered by id. Imbalances are logged and returned,
/// not raised, so one bad account does not hide the rest.
pub async fn verify_all<C>(db: &C) -> Result<Vec<Reconciliation>>
where
    C: ConnectionTrait,
{
    let sums: Vec<(i64, Option<i64>)> = LedgerEntry::find()
        .select_only()
        .column(ledger_entry::Column::AccountId)
        .column_as(ledger_entry::Column::Delta.sum(), "total")
        .group_by(ledger_entry::Column::AccountId)
        .into_tuple()
        .all(db)
        .await?;
    let sums: std::collections::HashMap<i64, i64> = sums
        .into_iter()
        .map(|(account_id, total)| (account_id, total.unwrap_or(0)))
        .collect();

    let accounts = Account::find()
        .order_by_asc(account::Column::Id)
        .all(db)
        .await?;

    let report: Vec<Reconciliation> = accounts
        .into_iter()
        .map(|model| Reconciliation {
            account_id: model.id,
            balance: model.balance,
            ledger_sum: sums.get(&model.id).copied().unwrap_or(0),
        })
        .collect();

    for imbalance in report.iter().filter(|r| !r.is_balanced()) {
        warn!(
            account_id = imbalance.account_id,
            balance = imbalance.balance,
            ledger_sum = imbalance.ledger_sum,
            "Account balance does not match ledger"
        );
    }

    Ok(report)
}
