//! Stash is a web app for tracking personal income and expenses.
//!
//! This library provides the server-side pieces that are not tied to the
//! web frontend: synchronizing externally authenticated identities into
//! the local user table, and generating sample financial data for local
//! development.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod account;
mod app_state;
mod database_id;
mod db;
mod endpoints;
mod identity;
mod routing;
pub mod seed;
mod transaction;
mod user;

pub use account::{Account, AccountType, get_account, upsert_account};
pub use app_state::AppState;
pub use database_id::{AccountId, TransactionId, UserId};
pub use db::initialize as initialize_db;
pub use identity::{Identity, IdentityProvider, StaticIdentityProvider};
pub use routing::build_router;
pub use seed::run_seed;
pub use transaction::{Transaction, TransactionStatus, TransactionType};
pub use user::{User, get_user_by_clerk_id, sync_user};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The email address is already registered under a different external
    /// identity.
    ///
    /// The user table enforces uniqueness on both the external identity ID
    /// and the email address. A conflict on the identity ID is the normal
    /// "already synced" case and is absorbed by the conditional insert; a
    /// conflict on the email is not, and surfaces as this error.
    #[error("the email address is already registered to another identity")]
    DuplicateEmail,

    /// A transaction with the same ID already exists in the database.
    #[error("a transaction with the same ID already exists in the database")]
    DuplicateTransactionId,

    /// The identity provider returned an identity with no email addresses.
    ///
    /// The provider contract is that an authenticated identity carries at
    /// least one email address, the first being the primary one.
    #[error("the identity has no email addresses")]
    MissingEmail,

    /// Tried to update an account that does not exist
    #[error("tried to update an account that is not in the database")]
    UpdateMissingAccount,

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            // Code 1555 occurs when a PRIMARY KEY constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 1555 && desc.ends_with("transaction.id") =>
            {
                Error::DuplicateTransactionId
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({"error": "not found"})),
            )
                .into_response(),
            // Any errors that are not handled above are not intended to be
            // shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": "internal server error"})),
                )
                    .into_response()
            }
        }
    }
}
