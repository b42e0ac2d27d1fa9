//! This module aggregates all the command modules for the bot.

/// Commands restricted to bot admins.
pub(crate) mod admins;
/// General purpose commands (e.g., ping, mock).
pub(crate) mod general;
/// Image generation commands.
pub(crate) mod image;
