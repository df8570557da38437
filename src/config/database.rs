//! Database configuration module for Doodlebucks.
//!
//! Handles `SQLite` connection setup and table creation using `SeaORM`. Tables and
//! indexes are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust models.
//! Creation is idempotent and safe to run on every startup.

use crate::entities::{Account, LedgerEntry};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::{debug, info, instrument};

/// Default database location, created on first use.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/doodlebucks.sqlite?mode=rwc";

/// Opens a connection to the database at `database_url`.
#[instrument]
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to database");
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates the `accounts` and `ledger_entries` tables and the ledger's
/// `account_id` index if they do not already exist.
pub async fn create_tables<C>(db: &C) -> Result<()>
where
    C: ConnectionTrait,
{
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut account_table = schema.create_table_from_entity(Account);
    let mut ledger_table = schema.create_table_from_entity(LedgerEntry);
    account_table.if_not_exists();
    ledger_table.if_not_exists();

    db.execute(builder.build(&account_table)).await?;
    db.execute(builder.build(&ledger_table)).await?;

    for mut index in schema.create_index_from_entity(LedgerEntry) {
        index.if_not_exists();
        db.execute(builder.build(&index)).await?;
    }

    info!("Database tables ensured");
    Ok(())
}

/// Connects to `database_url` and makes sure the schema exists.
pub async fn init_db(database_url: &str) -> Result<DatabaseConnection> {
    let db = create_connection(database_url).await?;
    create_tables(&db).await?;
    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{AccountModel, LedgerEntryModel};
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        let _: Vec<AccountModel> = Account::find().limit(1).all(&db).await?;
        let _: Vec<LedgerEntryModel> = LedgerEntry::find().limit(1).all(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;

        let _: Vec<AccountModel> = Account::find().limit(1).all(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_init_db_in_memory() -> Result<()> {
        let db = init_db("sqlite::memory:").await?;
        let _: Vec<LedgerEntryModel> = LedgerEntry::find().limit(1).all(&db).await?;
        Ok(())
    }
}
