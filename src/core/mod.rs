//! Core business logic - framework-agnostic account, ledger and daily-claim operations.

/// Account directory: lazy, idempotent account resolution
pub mod account;
/// Daily-claim engine
pub mod daily;
/// Authenticated caller identity
pub mod identity;
/// Append-only ledger and reconciliation
pub mod ledger;
/// Cooldown and streak arithmetic
pub mod streak;
