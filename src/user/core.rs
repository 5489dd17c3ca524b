//! Code for creating the user table and fetching users from the database.

use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Serialize};

use crate::{Error, database_id::UserId};

/// A user of the application.
///
/// Each row mirrors one identity from the external identity provider,
/// keyed by that provider's stable ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserId,
    /// The stable ID assigned by the external identity provider.
    pub clerk_user_id: String,
    /// The user's primary email address.
    pub email: String,
    /// The user's display name.
    pub name: String,
}

/// Create the user table.
///
/// Both the external identity ID and the email address carry UNIQUE
/// constraints. The conditional inserts below rely on the storage layer
/// enforcing these, so that concurrent first-time syncs cannot create
/// duplicate rows.
///
/// # Errors
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                clerk_user_id TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [User].
pub fn map_row_to_user(row: &Row) -> Result<User, rusqlite::Error> {
    let id = row.get(0)?;
    let clerk_user_id = row.get(1)?;
    let email = row.get(2)?;
    let name = row.get(3)?;

    Ok(User {
        id,
        clerk_user_id,
        email,
        name,
    })
}

/// Insert a user unless a row with the same external identity ID exists,
/// then return the row that is in the database afterwards.
///
/// The insert and the uniqueness check are a single statement, so two
/// concurrent calls for the same identity end up with exactly one row
/// between them.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateEmail] if a different identity already registered
///   the email address,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn insert_user_if_absent(
    clerk_user_id: &str,
    email: &str,
    name: &str,
    connection: &Connection,
) -> Result<User, Error> {
    connection.execute(
        "INSERT INTO user (clerk_user_id, email, name) VALUES (?1, ?2, ?3)
         ON CONFLICT(clerk_user_id) DO NOTHING",
        params![clerk_user_id, email, name],
    )?;

    get_user_by_clerk_id(clerk_user_id, connection)
}

/// Insert a user unless a row with the same email address exists, then
/// return the row that is in the database afterwards.
///
/// This is the upsert used by the demo data seed, which keys its fixture
/// user on a well-known email address. An existing row is left unchanged.
///
/// # Errors
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn insert_user_if_email_absent(
    clerk_user_id: &str,
    email: &str,
    name: &str,
    connection: &Connection,
) -> Result<User, Error> {
    connection.execute(
        "INSERT INTO user (clerk_user_id, email, name) VALUES (?1, ?2, ?3)
         ON CONFLICT(email) DO NOTHING",
        params![clerk_user_id, email, name],
    )?;

    get_user_by_email(email, connection)
}

/// Get the user from the database with an external identity ID equal to
/// `clerk_user_id`.
///
/// # Errors
///
/// This function will return an error if:
/// - `clerk_user_id` does not belong to a synced user.
/// - there was an error trying to access the store.
pub fn get_user_by_clerk_id(clerk_user_id: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, clerk_user_id, email, name FROM user WHERE clerk_user_id = :clerk_user_id")?
        .query_one(&[(":clerk_user_id", clerk_user_id)], map_row_to_user)
        .map_err(|error| error.into())
}

/// Get the user from the database with an email address equal to `email`.
///
/// # Errors
///
/// This function will return an error if:
/// - `email` does not belong to a known user.
/// - there was an error trying to access the store.
pub fn get_user_by_email(email: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, clerk_user_id, email, name FROM user WHERE email = :email")?
        .query_one(&[(":email", email)], map_row_to_user)
        .map_err(|error| error.into())
}

/// Get the number of users in the database.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn count_users(connection: &Connection) -> Result<usize, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM user;", [], |row| {
            row.get::<_, i64>(0).map(|count| count as usize)
        })
        .map_err(|error| error.into())
}
