use doodlebucks::{
    bot::{self, BotData},
    config::{
        database,
        settings::{self, SettingsSource},
    },
    errors::{Error, Result},
};
use dotenvy::dotenv;
use std::env;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load .env first so RUST_LOG and overrides are visible
    dotenv().ok(); // Non-fatal, env vars can be set externally

    // 2. Load settings (reported after tracing is up)
    let (settings, source) = settings::load_app_settings()?;

    // 3. Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
        )
        .init();
    match &source {
        SettingsSource::File(path) => info!("Loaded settings from {}", path.display()),
        SettingsSource::Defaults => info!("No config.toml found, using default settings"),
    }
    info!(app = %settings.app_name, "Settings loaded");

    // 4. Initialize database
    let db = database::init_db(&settings.database_url)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Run the bot
    // DISCORD_BOT_TOKEN is loaded directly before use, not stored in Settings
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {}", e))
        .map_err(Error::EnvVar)?;

    bot::run_bot(token, BotData::new(db, settings)).await
}
