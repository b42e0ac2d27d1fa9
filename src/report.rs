//! Status and failure notices for the configured debug channels.

use poise::serenity_prelude::{ChannelId, Http};
use tracing::warn;

/// Discord rejects messages longer than this many characters.
const MESSAGE_LIMIT: usize = 2000;
const FENCE: &str = "```";

/// Posts `message` to every channel in `channels`.
///
/// Delivery failures are logged and otherwise ignored.
pub(crate) async fn report(http: &Http, channels: &[u64], message: &str) {
    for &id in channels {
        if let Err(e) = ChannelId::new(id).say(http, message).await {
            warn!("Could not post to debug channel {}: {}", id, e);
        }
    }
}

/// Wraps `text` in a code block that fits in one message.
pub(crate) fn code_block(text: &str) -> String {
    let room = MESSAGE_LIMIT - 2 * FENCE.len();
    let body: String = text.chars().take(room).collect();
    format!("{FENCE}{body}{FENCE}")
}
