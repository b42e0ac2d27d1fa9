use poise::CreateReply;
use poise::serenity_prelude::CreateEmbed;

use crate::{CommandResult, Context};

/// Check that Gnomebot works
#[poise::command(slash_command, category = "General")]
pub async fn ping(ctx: Context<'_>) -> CommandResult {
    let latency = ctx.ping().await.as_millis();

    let embed = CreateEmbed::new()
        .title("Pong!")
        .field("API Latency", format!("{} ms", latency), false);

    let reply = CreateReply::default().embed(embed).ephemeral(false);

    ctx.send(reply).await?;

    Ok(())
}
