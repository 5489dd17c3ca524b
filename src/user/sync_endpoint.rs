//! Defines the endpoint that synchronizes the caller's authenticated
//! identity into the local user table.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    identity::{Identity, IdentityProvider},
    user::core::insert_user_if_absent,
};

/// The state needed to sync a user.
#[derive(Clone)]
pub struct SyncUserState {
    /// The database connection for managing users.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The boundary to the external identity provider.
    pub identity_provider: Arc<dyn IdentityProvider>,
}

impl FromRef<AppState> for SyncUserState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            identity_provider: state.identity_provider.clone(),
        }
    }
}

/// The response body for the user sync endpoint.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct SyncUserResponse {
    /// The external identity ID of the synced user, or null when the
    /// request carried no authenticated identity.
    pub user_id: Option<String>,
}

/// A route handler that ensures a local user row exists for the caller's
/// authenticated identity.
///
/// An unauthenticated request is a normal outcome for this endpoint: the
/// response carries a null `user_id` and the database is never touched.
pub async fn sync_user_endpoint(
    State(state): State<SyncUserState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
) -> Result<Json<SyncUserResponse>, Error> {
    let token = bearer.as_ref().map(|TypedHeader(auth)| auth.token());
    let identity = state.identity_provider.current_identity(token)?;

    let Some(identity) = identity else {
        return Ok(Json(SyncUserResponse { user_id: None }));
    };

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("Could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let user_id = sync_user(Some(&identity), &connection)?;

    Ok(Json(SyncUserResponse { user_id }))
}

/// Ensure that exactly one local user row exists for `identity` and return
/// the identity's external ID.
///
/// A `None` identity short-circuits to `Ok(None)` without touching the
/// database. Repeated calls for the same identity never create more than
/// one row: the insert is conditional on the UNIQUE external identity ID,
/// so the first writer wins and every later call is a read.
///
/// # Errors
/// This function will return a:
/// - [Error::MissingEmail] if the identity carries no email addresses,
/// - [Error::DuplicateEmail] if the primary email is already registered
///   under a different identity,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn sync_user(
    identity: Option<&Identity>,
    connection: &Connection,
) -> Result<Option<String>, Error> {
    let Some(identity) = identity else {
        return Ok(None);
    };

    let email = identity.primary_email().ok_or(Error::MissingEmail)?;
    insert_user_if_absent(&identity.id, email, &identity.name, connection)?;

    Ok(Some(identity.id.clone()))
}
