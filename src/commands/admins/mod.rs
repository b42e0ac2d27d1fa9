//! Commands restricted to the configured bot admins.

/// Submodule defining the `/say` command.
pub(crate) mod say;
/// Submodule defining the `/unlock` command.
pub(crate) mod unlock;
