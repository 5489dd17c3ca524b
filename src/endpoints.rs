//! The API endpoint URIs.

/// The route for synchronizing the caller's authenticated identity into the
/// local user table.
pub const SYNC_USER: &str = "/api/users/sync";
