//! Bot configuration, read from the environment (optionally via a `.env` file).

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::image_creator::{Cookie, Credentials, ImageCreatorError, SessionConfig};

pub const DEFAULT_OUTPUT_DIR: &str = "images";
pub const DEFAULT_REPOSITORY_URL: &str = "https://github.com/Noam-Elisha/GnomeBot";

/// Errors raised while reading the bot configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("Missing environment variable {0}")]
    Missing(&'static str),

    /// A variable is set but cannot be parsed.
    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },

    /// The image creator cookies are unusable.
    #[error(transparent)]
    Credentials(#[from] ImageCreatorError),
}

/// Everything the bot needs to start.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub discord_token: String,
    pub credentials: Credentials,
    pub session: SessionConfig,
    pub output_dir: PathBuf,
    pub admins: Vec<u64>,
    /// Channels that receive the startup notice and command failures.
    pub debug_channels: Vec<u64>,
    /// Channel `/quote` posts to.
    pub quote_channel: Option<u64>,
    pub repository_url: String,
}

impl BotConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let discord_token = get("DISCORD_TOKEN").ok_or(ConfigError::Missing("DISCORD_TOKEN"))?;

        let credentials = Credentials::new(
            get("BING_AUTH_COOKIE").unwrap_or_default(),
            get("BING_SESSION_COOKIE").unwrap_or_default(),
        )?;
        let credentials = match get("BING_EXTRA_COOKIES") {
            Some(raw) => credentials.with_extra_cookies(parse_cookies(&raw)?),
            None => credentials,
        };

        let mut session = SessionConfig::default();
        if let Some(base_url) = get("BING_URL") {
            session = session.with_base_url(base_url);
        }
        if let Some(secs) = get("IMAGE_POLL_TIMEOUT_SECS") {
            let secs = secs.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                name: "IMAGE_POLL_TIMEOUT_SECS",
                reason: e.to_string(),
            })?;
            session = session.with_poll_budget(Duration::from_secs(secs));
        }

        let output_dir = get("IMAGE_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        let admins = match get("BOT_ADMINS") {
            Some(raw) => parse_ids("BOT_ADMINS", &raw)?,
            None => Vec::new(),
        };
        let debug_channels = match get("DEBUG_CHANNELS") {
            Some(raw) => parse_ids("DEBUG_CHANNELS", &raw)?,
            None => Vec::new(),
        };
        let quote_channel = get("QUOTE_CHANNEL")
            .map(|raw| parse_id("QUOTE_CHANNEL", raw.trim()))
            .transpose()?;

        let repository_url =
            get("REPOSITORY_URL").unwrap_or_else(|| DEFAULT_REPOSITORY_URL.to_string());

        Ok(Self {
            discord_token,
            credentials,
            session,
            output_dir,
            admins,
            debug_channels,
            quote_channel,
            repository_url,
        })
    }

    pub fn is_admin(&self, user_id: u64) -> bool {
        self.admins.contains(&user_id)
    }
}

/// Parses a JSON array of `{"name": .., "value": ..}` objects.
fn parse_cookies(raw: &str) -> Result<Vec<Cookie>, ConfigError> {
    serde_json::from_str(raw).map_err(|e| ConfigError::Invalid {
        name: "BING_EXTRA_COOKIES",
        reason: e.to_string(),
    })
}

/// Parses a comma-separated list of Discord ids.
fn parse_ids(name: &'static str, raw: &str) -> Result<Vec<u64>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| parse_id(name, id))
        .collect()
}

fn parse_id(name: &'static str, id: &str) -> Result<u64, ConfigError> {
    id.parse::<u64>().map_err(|e| ConfigError::Invalid {
        name,
        reason: format!("{id}: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("DISCORD_TOKEN", "discord-token"),
        ("BING_AUTH_COOKIE", "auth"),
        ("BING_SESSION_COOKIE", "session"),
    ];

    #[test]
    fn test_defaults_apply() {
        let config = BotConfig::from_lookup(lookup_from(&REQUIRED)).unwrap();

        assert_eq!(config.discord_token, "discord-token");
        assert_eq!(config.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(config.session.base_url, "https://www.bing.com");
        assert_eq!(config.session.poll_budget, Duration::from_secs(200));
        assert!(config.admins.is_empty());
        assert!(config.debug_channels.is_empty());
        assert_eq!(config.quote_channel, None);
        assert_eq!(config.credentials.cookies().count(), 2);
    }

    #[test]
    fn test_optional_values_are_parsed() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("BING_URL", "http://localhost:8080/"),
            ("IMAGE_OUTPUT_DIR", "/tmp/gnome"),
            ("IMAGE_POLL_TIMEOUT_SECS", "30"),
            ("BOT_ADMINS", "123, 456"),
            ("DEBUG_CHANNELS", "900,901"),
            ("QUOTE_CHANNEL", " 777 "),
            ("BING_EXTRA_COOKIES", r#"[{"name":"MUID","value":"abc"}]"#),
        ]);

        let config = BotConfig::from_lookup(lookup_from(&pairs)).unwrap();

        assert_eq!(config.session.base_url, "http://localhost:8080");
        assert_eq!(config.output_dir, PathBuf::from("/tmp/gnome"));
        assert_eq!(config.session.poll_budget, Duration::from_secs(30));
        assert_eq!(config.admins, vec![123, 456]);
        assert!(config.is_admin(456));
        assert_eq!(config.debug_channels, vec![900, 901]);
        assert_eq!(config.quote_channel, Some(777));
        assert!(
            config
                .credentials
                .cookies()
                .any(|c| c == &Cookie::new("MUID", "abc"))
        );
    }

    #[test]
    fn test_missing_token() {
        let pairs = &REQUIRED[1..];
        assert_matches!(
            BotConfig::from_lookup(lookup_from(pairs)),
            Err(ConfigError::Missing("DISCORD_TOKEN"))
        );
    }

    #[test]
    fn test_missing_cookie_is_credentials_error() {
        let pairs = &REQUIRED[..2];
        assert_matches!(
            BotConfig::from_lookup(lookup_from(pairs)),
            Err(ConfigError::Credentials(
                ImageCreatorError::MissingCredentials { .. }
            ))
        );
    }

    #[test]
    fn test_bad_admin_id() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("BOT_ADMINS", "123,abc"));
        assert_matches!(
            BotConfig::from_lookup(lookup_from(&pairs)),
            Err(ConfigError::Invalid {
                name: "BOT_ADMINS",
                ..
            })
        );
    }

    #[test]
    fn test_bad_quote_channel() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("QUOTE_CHANNEL", "quotes"));
        assert_matches!(
            BotConfig::from_lookup(lookup_from(&pairs)),
            Err(ConfigError::Invalid {
                name: "QUOTE_CHANNEL",
                ..
            })
        );
    }
}
