//! Daily-claim engine - Decides claim eligibility and applies the reward.
//!
//! A claim is evaluated against a snapshot of the account. When eligible, the
//! balance, streak, `last_claim_at` and the ledger row are written in one database
//! transaction whose first statement is a conditional update on the account's
//! `version`. If another claim got there first the update touches no rows, the
//! transaction is rolled back and the whole evaluation runs again against a fresh
//! snapshot, up to [`RetryPolicy::max_attempts`] times.
//!
//! Dropping an uncommitted transaction rolls it back, so a cancelled or failed
//! claim never leaves a balance change without its ledger entry or the reverse.

use crate::{
    config::settings::{DEFAULT_MAX_CLAIM_ATTEMPTS, Settings},
    core::{
        account::{find_account, resolve_or_create},
        identity::AuthenticatedIdentity,
        ledger,
        streak::{DAILY_REWARD, cooldown_remaining, next_streak, retry_after_seconds},
    },
    entities::{Account, LedgerReason, account},
    errors::{Error, Result},
};
use chrono::{DateTime, Duration, Utc};
use sea_orm::{TransactionTrait, prelude::*, sea_query::Expr};
use tracing::{debug, info, instrument, warn};

/// How many times a contended claim is evaluated before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
}

impl RetryPolicy {
    /// Creates a policy; at least one attempt is always made.
    #[must_use]
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    /// Maximum number of evaluations per claim.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CLAIM_ATTEMPTS)
    }
}

impl From<&Settings> for RetryPolicy {
    fn from(settings: &Settings) -> Self {
        Self::new(settings.max_claim_attempts)
    }
}

/// Result of a claim. A denied claim is a normal result, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimResult {
    /// Whether the reward was granted
    pub allowed: bool,
    /// Balance after the claim (unchanged when denied)
    pub balance: i64,
    /// Streak after the claim (unchanged when denied)
    pub streak: i32,
    /// Time until the next claim is allowed, set only when denied
    pub retry_after: Option<Duration>,
}

impl ClaimResult {
    fn granted(balance: i64, streak: i32) -> Self {
        Self {
            allowed: true,
            balance,
            streak,
            retry_after: None,
        }
    }

    fn denied(snapshot: &account::Model, remaining: Duration) -> Self {
        Self {
            allowed: false,
            balance: snapshot.balance,
            streak: snapshot.streak,
            retry_after: Some(remaining),
        }
    }

    /// Whole seconds until the next claim, rounded up.
    #[must_use]
    pub fn retry_after_seconds(&self) -> Option<i64> {
        self.retry_after.map(retry_after_seconds)
    }
}

/// Outcome of evaluating a claim against one snapshot.
#[derive(Debug)]
pub(crate) enum Attempt {
    Settled(ClaimResult),
    Conflict,
}

/// Claims the daily reward for `identity` at the current instant.
pub async fn claim_daily(
    db: &DatabaseConnection,
    identity: &AuthenticatedIdentity,
    policy: &RetryPolicy,
) -> Result<ClaimResult> {
    claim_daily_at(db, identity, Utc::now(), policy).await
}

/// Claims the daily reward for `identity` as of `now`.
///
/// # Errors
/// Returns `Error::Database` on storage faults and `Error::ClaimContention` when
/// every attempt lost a race. In both cases nothing was written.
#[instrument(skip(db, identity, policy), fields(account_id = identity.account_id()))]
pub async fn claim_daily_at(
    db: &DatabaseConnection,
    identity: &AuthenticatedIdentity,
    now: DateTime<Utc>,
    policy: &RetryPolicy,
) -> Result<ClaimResult> {
    let snapshot = resolve_or_create(db, identity).await?;
    claim_from_snapshot(db, snapshot, now, policy).await
}

/// Runs the bounded evaluate-and-apply loop starting from `snapshot`.
pub(crate) async fn claim_from_snapshot(
    db: &DatabaseConnection,
    mut snapshot: account::Model,
    now: DateTime<Utc>,
    policy: &RetryPolicy,
) -> Result<ClaimResult> {
    let account_id = snapshot.id;

    for attempt in 1..=policy.max_attempts() {
        match try_claim(db, &snapshot, now).await? {
            Attempt::Settled(result) => return Ok(result),
            Attempt::Conflict => {
                debug!(attempt, "Claim lost a race, re-evaluating");
                snapshot = find_account(db, account_id)
                    .await?
                    .ok_or(Error::AccountNotFound { account_id })?;
            }
        }
    }

    warn!(attempts = policy.max_attempts(), "Claim contention not resolved");
    Err(Error::ClaimContention {
        account_id,
        attempts: policy.max_attempts(),
    })
}

/// Evaluates one claim against `snapshot` and applies it if the snapshot is
/// still current.
pub(crate) async fn try_claim(
    db: &DatabaseConnection,
    snapshot: &account::Model,
    now: DateTime<Utc>,
) -> Result<Attempt> {
    if let Some(remaining) = cooldown_remaining(snapshot.last_claim_at, now) {
        debug!(
            retry_after_secs = retry_after_seconds(remaining),
            "Claim denied, cooldown active"
        );
        return Ok(Attempt::Settled(ClaimResult::denied(snapshot, remaining)));
    }

    let streak = next_streak(snapshot.last_claim_at, snapshot.streak, now);

    let txn = db.begin().await?;

    let updated = Account::update_many()
        .col_expr(
            account::Column::Balance,
            Expr::col(account::Column::Balance).add(DAILY_REWARD),
        )
        .col_expr(account::Column::Streak, Expr::value(streak))
        .col_expr(account::Column::LastClaimAt, Expr::value(now))
        .col_expr(
            account::Column::Version,
            Expr::col(account::Column::Version).add(1),
        )
        .col_expr(account::Column::UpdatedAt, Expr::value(now))
        .filter(account::Column::Id.eq(snapshot.id))
        .filter(account::Column::Version.eq(snapshot.version))
        .exec(&txn)
        .await?;

    if updated.rows_affected == 0 {
        txn.rollback().await?;
        return Ok(Attempt::Conflict);
    }

    ledger::append(&txn, snapshot.id, DAILY_REWARD, LedgerReason::Daily, None, now).await?;

    txn.commit().await?;

    let balance = snapshot.balance + DAILY_REWARD;
    info!(balance, streak, "Daily reward claimed");
    Ok(Attempt::Settled(ClaimResult::granted(balance, streak)))
}
