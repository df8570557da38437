//! Unified error types for Doodlebucks.
//!
//! A denied daily claim is not an error; it is reported through
//! [`crate::core::daily::ClaimResult`]. Everything here is a real failure.

use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// The persistence layer failed; no partial mutation is visible
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Optimistic-concurrency retries were exhausted for a claim
    #[error("Claim for account {account_id} kept conflicting after {attempts} attempts")]
    ClaimContention {
        /// Account being claimed for
        account_id: i64,
        /// Number of evaluations attempted
        attempts: u32,
    },

    /// The caller's identity is malformed
    #[error("Invalid identity: {reason}")]
    InvalidIdentity {
        /// Why the identity was rejected
        reason: String,
    },

    /// An account that should exist could not be found
    #[error("Account {account_id} not found")]
    AccountNotFound {
        /// Missing account id
        account_id: i64,
    },

    /// Cached balance disagrees with the ledger
    #[error("Ledger mismatch for account {account_id}: balance {balance}, ledger sum {ledger_sum}")]
    LedgerMismatch {
        /// Account that failed reconciliation
        account_id: i64,
        /// Cached balance on the account row
        balance: i64,
        /// Sum of the account's ledger deltas
        ledger_sum: i64,
    },

    /// Environment variable error
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Serenity/Poise framework error
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl Error {
    /// Whether the caller may reasonably retry the same operation later.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Database(_) | Self::ClaimContention { .. })
    }
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
