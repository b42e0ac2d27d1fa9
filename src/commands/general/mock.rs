use poise::serenity_prelude::GetMessages;

use crate::{CommandResult, Context};

/// MoCk tHe PrEvIoUs MeSsAgE
#[poise::command(slash_command, category = "General")]
pub async fn mock(ctx: Context<'_>) -> CommandResult {
    let previous = ctx
        .channel_id()
        .messages(ctx, GetMessages::new().limit(1))
        .await?;

    match previous.first() {
        Some(message) if !message.content.is_empty() => {
            ctx.say(mock_text(&message.content)).await?;
        }
        _ => {
            ctx.say("Nothing to mock.").await?;
        }
    }

    Ok(())
}

/// Upper-cases every even character and lower-cases every odd one.
pub(crate) fn mock_text(text: &str) -> String {
    text.chars()
        .enumerate()
        .flat_map(|(i, ch)| {
            let lower = ch.to_lowercase().collect::<String>();
            if i % 2 == 0 {
                lower.to_uppercase().chars().collect::<Vec<_>>()
            } else {
                lower.chars().collect::<Vec<_>>()
            }
        })
        .collect()
}
