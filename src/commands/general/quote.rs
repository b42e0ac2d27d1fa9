use poise::CreateReply;
use poise::serenity_prelude::{ChannelId, GetMessages};
use tracing::info;

use crate::{CommandResult, Context};

/// What `/quote` should post.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum QuoteSource {
    Given { author: String, text: String },
    PreviousMessage,
}

/// Quote something to the quotes channel
#[poise::command(slash_command, category = "General")]
pub async fn quote(
    ctx: Context<'_>,
    #[description = "Optional: Must be used alongside 'quote'"] author: Option<String>,
    #[description = "Optional: Must be used alongside 'author'"] quote: Option<String>,
) -> CommandResult {
    let Some(channel) = ctx.data().config.quote_channel.map(ChannelId::new) else {
        reply_ephemeral(ctx, "No quote channel is configured.").await?;
        return Ok(());
    };

    let (author, text) = match quote_source(author, quote) {
        Some(QuoteSource::Given { author, text }) => (author, text),
        Some(QuoteSource::PreviousMessage) => {
            let previous = ctx
                .channel_id()
                .messages(ctx, GetMessages::new().limit(1))
                .await?;
            match previous.into_iter().next() {
                Some(message) if !message.content.is_empty() => {
                    let author = message
                        .author
                        .global_name
                        .clone()
                        .unwrap_or_else(|| message.author.name.clone());
                    (author, message.content)
                }
                _ => {
                    reply_ephemeral(ctx, "Nothing to quote.").await?;
                    return Ok(());
                }
            }
        }
        None => {
            reply_ephemeral(ctx, "Need either both author and quote or neither.").await?;
            return Ok(());
        }
    };

    channel.say(ctx.http(), format_quote(&text, &author)).await?;
    info!("{} quoted {} to channel {}", ctx.author().name, author, channel);
    reply_ephemeral(ctx, "Quoted.").await?;

    Ok(())
}

async fn reply_ephemeral(ctx: Context<'_>, content: &str) -> CommandResult {
    ctx.send(CreateReply::default().content(content).ephemeral(true))
        .await?;
    Ok(())
}

/// Both arguments quote them directly, neither quotes the previous message,
/// and only one of them is an error.
pub(crate) fn quote_source(
    author: Option<String>,
    text: Option<String>,
) -> Option<QuoteSource> {
    match (author, text) {
        (Some(author), Some(text)) => Some(QuoteSource::Given { author, text }),
        (None, None) => Some(QuoteSource::PreviousMessage),
        _ => None,
    }
}

pub(crate) fn format_quote(text: &str, author: &str) -> String {
    format!("{}\n\n-{}", text.trim(), author.trim())
}
