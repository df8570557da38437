//! Bot layer - Discord interface for the Doodlebucks economy
//!
//! Discord authenticates every slash-command author, so this layer is the identity
//! boundary: it turns the author into an [`AuthenticatedIdentity`] and hands it to
//! the core. Nothing below this module sees Discord types.

/// Discord command implementations (economy, general)
pub mod commands;

use crate::{
    config::settings::Settings,
    core::{daily::RetryPolicy, identity::AuthenticatedIdentity},
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use tracing::{error, info, instrument};

/// Poise context used by every command.
pub type Context<'a> = poise::Context<'a, BotData, Error>;

/// Shared data available to all bot commands.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Settings the bot was started with
    pub settings: Settings,
    /// Retry policy for contended claims
    pub retry_policy: RetryPolicy,
}

impl BotData {
    /// Creates the shared command context from an open connection and settings.
    #[must_use]
    pub fn new(database: DatabaseConnection, settings: Settings) -> Self {
        let retry_policy = RetryPolicy::from(&settings);
        Self {
            database,
            settings,
            retry_policy,
        }
    }
}

/// Builds the core identity for a Discord user, preferring the global display name.
///
/// # Errors
/// Returns `Error::InvalidIdentity` if the user id or name cannot be used.
pub fn identity_for(user: &serenity::User) -> Result<AuthenticatedIdentity> {
    let display_name = user.global_name.clone().unwrap_or_else(|| user.name.clone());
    AuthenticatedIdentity::new(user.id.get(), Some(display_name))
}

/// Reply shown when a command fails. Never mentions cooldowns: a denied claim is
/// not an error and is answered by the command itself.
#[must_use]
pub const fn fault_message(error: &Error) -> &'static str {
    match error {
        Error::Database(_) | Error::ClaimContention { .. } => {
            "⚠️ Something went wrong while talking to the bank. Nothing was changed, please try again in a moment."
        }
        Error::InvalidIdentity { .. } => "❌ Sorry, I couldn't verify who you are.",
        _ => "❌ An unexpected error occurred.",
    }
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx.say(fault_message(&error)).await {
                error!("Failed to send error message: {}", e);
            }
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Registers the slash commands and runs the Discord client until it stops.
///
/// # Errors
/// Returns an error if the client cannot be built or the gateway connection fails.
#[instrument(skip(token, data))]
pub async fn run_bot(token: String, data: BotData) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::daily(),
                commands::balance(),
                commands::ping(),
                commands::help(),
            ],
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                info!("Commands registered globally");
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    let mut client = serenity::Client::builder(&token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {:?}", e))?;

    info!("Starting bot client...");
    client.start().await.map_err(Error::from)
}
