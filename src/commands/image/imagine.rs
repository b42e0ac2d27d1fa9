use gnomebot::image_creator::{ImageCreatorError, MAX_IMAGES, generate_images};
use poise::CreateReply;
use poise::serenity_prelude::CreateAttachment;
use tracing::{info, warn};

use crate::{CommandResult, Context};

/// Generate images with Bing Image Creator
#[poise::command(slash_command, category = "Image")]
pub async fn imagine(
    ctx: Context<'_>,
    #[description = "What to draw"] prompt: String,
    #[description = "How many images to post (1-4)"]
    #[min = 1]
    #[max = 4]
    count: Option<u8>,
) -> CommandResult {
    let data = ctx.data();

    let Some(_guard) = data.generation_lock.acquire() else {
        ctx.send(
            CreateReply::default()
                .content("Already drawing something, try again in a minute.")
                .ephemeral(true),
        )
        .await?;
        return Ok(());
    };

    ctx.defer().await?;

    let count = count.map_or(MAX_IMAGES, usize::from);
    info!(
        "Generating {} image(s) for {} in channel {}",
        count,
        ctx.author().name,
        ctx.channel_id()
    );

    let files = match generate_images(
        &prompt,
        &data.config.output_dir,
        &data.config.credentials,
        data.config.session.clone(),
        count,
    )
    .await
    {
        Ok(files) => files,
        Err(e) => {
            warn!("Image generation failed: {}", e);
            ctx.say(failure_message(&e)).await?;
            return Ok(());
        }
    };

    let mut reply =
        CreateReply::default().content(format!("**{}**: {}", ctx.author().name, prompt));
    for file in &files {
        reply = reply.attachment(CreateAttachment::path(&file.path).await?);
    }
    ctx.send(reply).await?;

    Ok(())
}

/// User-facing text for a failed generation.
fn failure_message(error: &ImageCreatorError) -> String {
    match error {
        ImageCreatorError::Http(_) | ImageCreatorError::Io(_) => {
            "Something went wrong talking to Bing, try again later.".to_string()
        }
        ImageCreatorError::RedirectFailed { .. } | ImageCreatorError::PollFailed { .. } => {
            "Bing didn't accept the request. The cookies may have expired.".to_string()
        }
        other => other.to_string(),
    }
}
