use poise::CreateReply;
use poise::serenity_prelude as serenity;
use tracing::info;

use crate::{CommandResult, Context, is_admin};

/// Say a message in a channel
#[poise::command(slash_command, check = "is_admin", category = "Admin")]
pub async fn say(
    ctx: Context<'_>,
    #[description = "What to say"] message: String,
    #[description = "Where to say it (defaults to this channel)"]
    channel: Option<serenity::GuildChannel>,
) -> CommandResult {
    let target = channel.map_or(ctx.channel_id(), |channel| channel.id);
    target.say(ctx.http(), message).await?;
    info!("{} made the bot speak in channel {}", ctx.author().name, target);

    ctx.send(CreateReply::default().content("Sent.").ephemeral(true))
        .await?;

    Ok(())
}
