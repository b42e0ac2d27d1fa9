//! General purpose commands that don't talk to any external service.

/// Submodule defining the `/clapback` command.
pub(crate) mod clapback;
/// Submodule defining the `/code` command.
pub(crate) mod code;
/// Submodule defining the `/mock` command.
pub(crate) mod mock;
/// Submodule defining the `/ping` command.
pub(crate) mod ping;
/// Submodule defining the `/quote` command.
pub(crate) mod quote;
