//! General Discord commands - ping and help.
//! These commands don't touch the database.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{bot::Context, errors::Result};

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: Context<'_>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: Context<'_>) -> Result<()> {
        let app_name = &ctx.data().settings.app_name;
        let help_text = format!(
            "**{app_name} Help**\n\
            Collect a reward once a day and keep your streak going.\n\n\
            • `/daily` - Claims your daily reward (once every 24 hours).\n\
            • `/balance` - Shows your balance, streak and last claim.\n\
            • `/ping` - Checks if the bot is responsive.\n\
            • `/help` - Shows this help message.\n\n\
            Claiming on consecutive calendar days (UTC) grows your streak; \
            skip a day and it starts over."
        );

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
