//! Database ID type definitions.

/// Alias for the integer type used for user row IDs.
pub type UserId = i64;

/// Alias for the string type used for account IDs.
///
/// Accounts use caller-supplied TEXT keys so that fixtures such as the demo
/// account can be upserted under a stable, well-known ID.
pub type AccountId = String;

/// Alias for the string type used for transaction IDs (UUIDs).
pub type TransactionId = String;
