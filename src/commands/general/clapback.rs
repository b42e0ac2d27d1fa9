use crate::{CommandResult, Context};

/// Make 👏 your 👏 point
#[poise::command(slash_command, category = "General")]
pub async fn clapback(
    ctx: Context<'_>,
    #[description = "The point you want to make"] message: String,
) -> CommandResult {
    match clap_text(&ctx.author().name, &message) {
        Some(text) => {
            ctx.say(text).await?;
        }
        None => {
            ctx.send(
                poise::CreateReply::default()
                    .content("Give me at least three words to clap.")
                    .ephemeral(true),
            )
            .await?;
        }
    }

    Ok(())
}

/// Joins the words of `message` with claps, prefixed by the author's name.
/// Messages of two words or fewer aren't worth clapping.
pub(crate) fn clap_text(author: &str, message: &str) -> Option<String> {
    let words: Vec<&str> = message.split_whitespace().collect();
    if words.len() <= 2 {
        return None;
    }

    Some(format!("{author}: {}", words.join(" 👏 ")))
}
