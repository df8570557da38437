//! Entity module - SeaORM definitions for the `accounts` and `ledger_entries` tables.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod account;
pub mod ledger_entry;

pub use account::{Entity as Account, Model as AccountModel};
pub use ledger_entry::{Entity as LedgerEntry, LedgerReason, Model as LedgerEntryModel};
