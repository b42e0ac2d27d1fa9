use tracing::info;

use crate::{CommandResult, Context, is_admin};

/// Clear a stuck image generation lock
#[poise::command(slash_command, check = "is_admin", category = "Admin")]
pub async fn unlock(ctx: Context<'_>) -> CommandResult {
    let was_locked = ctx.data().generation_lock.force_release();
    info!("{} cleared the generation lock (was {})", ctx.author().name, was_locked);

    let say_content = if was_locked {
        "Generation lock cleared."
    } else {
        "Nothing was locked."
    };
    ctx.say(say_content).await?;

    Ok(())
}
