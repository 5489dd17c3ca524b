//! The boundary to the external identity provider.
//!
//! Authentication itself is delegated to a hosted identity service. The
//! application only ever asks one question: "who, if anyone, does this
//! session token belong to?". The [IdentityProvider] trait is that seam,
//! so route handlers and tests never depend on the provider's wire
//! protocol.

use serde::{Deserialize, Serialize};

use crate::Error;

/// An externally authenticated principal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// The stable identifier assigned by the identity provider.
    pub id: String,
    /// The email addresses registered with the provider, primary first.
    ///
    /// A returned identity always carries at least one address.
    pub emails: Vec<String>,
    /// The display name registered with the provider.
    pub name: String,
}

impl Identity {
    /// The primary email address, i.e. the first one in the list.
    pub fn primary_email(&self) -> Option<&str> {
        self.emails.first().map(String::as_str)
    }
}

/// The query interface to the external identity provider.
pub trait IdentityProvider: Send + Sync {
    /// Resolve the identity behind `session_token`.
    ///
    /// Returns `Ok(None)` when there is no authenticated identity, which is
    /// a normal outcome and not an error.
    ///
    /// # Errors
    /// Returns an error if the provider could not be reached or gave an
    /// unusable answer.
    fn current_identity(&self, session_token: Option<&str>) -> Result<Option<Identity>, Error>;
}

/// An identity provider for local development and tests.
///
/// Any non-empty session token resolves to the one configured identity.
/// Production deployments wire the hosted provider's verifier behind
/// [IdentityProvider] instead.
#[derive(Debug, Clone)]
pub struct StaticIdentityProvider {
    identity: Identity,
}

impl StaticIdentityProvider {
    /// Create a provider that resolves every authenticated request to
    /// `identity`.
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }
}

impl IdentityProvider for StaticIdentityProvider {
    fn current_identity(&self, session_token: Option<&str>) -> Result<Option<Identity>, Error> {
        match session_token {
            Some(token) if !token.is_empty() => Ok(Some(self.identity.clone())),
            _ => Ok(None),
        }
    }
}
