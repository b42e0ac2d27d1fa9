use crate::{CommandResult, Context};

/// Link to the Gnomebot GitHub repo
#[poise::command(slash_command, category = "General")]
pub async fn code(ctx: Context<'_>) -> CommandResult {
    ctx.say(&ctx.data().config.repository_url).await?;
    Ok(())
}
