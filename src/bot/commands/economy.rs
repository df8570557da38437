//! Economy Discord commands - `daily` and `balance`.
//!
//! Commands resolve the caller's identity from the Discord author and delegate
//! to the core. Reply text is built by plain functions so it can be tested
//! without a Discord context.

use crate::core::{account::BalanceSummary, daily::ClaimResult};

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use super::{format_balance_reply, format_claim_reply};
    use crate::{
        bot::{Context, identity_for},
        core::{account::get_balance, daily::claim_daily},
        errors::Result,
    };

    /// Claims your daily reward.
    #[poise::command(slash_command, prefix_command)]
    pub async fn daily(ctx: Context<'_>) -> Result<()> {
        let identity = identity_for(ctx.author())?;
        let data = ctx.data();

        let result = claim_daily(&data.database, &identity, &data.retry_policy).await?;

        ctx.say(format_claim_reply(&data.settings.app_name, &result))
            .await?;
        Ok(())
    }

    /// Shows your balance and streak.
    #[poise::command(slash_command, prefix_command)]
    pub async fn balance(ctx: Context<'_>) -> Result<()> {
        let identity = identity_for(ctx.author())?;
        let data = ctx.data();

        let summary = get_balance(&data.database, &identity).await?;

        ctx.say(format_balance_reply(&data.settings.app_name, &summary))
            .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;

/// Formats a wait in seconds as `"5h 3m 2s"`, dropping leading zero units.
#[must_use]
pub fn format_wait(total_seconds: i64) -> String {
    let total = total_seconds.max(0);
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

/// Reply for `/daily`.
#[must_use]
pub fn format_claim_reply(app_name: &str, result: &ClaimResult) -> String {
    if result.allowed {
        format!(
            "✅ Daily reward collected! Balance: **{}** {app_name} · Streak: **{}** day(s)",
            result.balance, result.streak
        )
    } else {
        let wait = result.retry_after_seconds().unwrap_or(0);
        format!(
            "⏳ Already claimed. Try again in **{}**. Balance: **{}** {app_name} · Streak: **{}** day(s)",
            format_wait(wait),
            result.balance,
            result.streak
        )
    }
}

/// Reply for `/balance`.
#[must_use]
pub fn format_balance_reply(app_name: &str, summary: &BalanceSummary) -> String {
    let name = summary.display_name.as_deref().unwrap_or("You");
    let last_claim = summary.last_claim_at.map_or_else(
        || "never".to_string(),
        |at| at.format("%Y-%m-%d %H:%M UTC").to_string(),
    );
    format!(
        "💰 {name}: **{}** {app_name} · Streak: **{}** day(s) · Last claim: {last_claim}",
        summary.balance, summary.streak
    )
}
