//! Defines the core data model and database queries for accounts.

use rusqlite::{
    Connection, Row, params,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    database_id::{AccountId, UserId},
};

/// The kind of monetary container an account is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    /// An everyday spending account.
    Current,
    /// A savings account.
    Savings,
}

impl AccountType {
    /// The TEXT form stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Current => "CURRENT",
            AccountType::Savings => "SAVINGS",
        }
    }

    fn from_str(value: &str) -> Option<Self> {
        match value {
            "CURRENT" => Some(AccountType::Current),
            "SAVINGS" => Some(AccountType::Savings),
            _ => None,
        }
    }
}

impl ToSql for AccountType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for AccountType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()
            .and_then(|text| Self::from_str(text).ok_or(FromSqlError::InvalidType))
    }
}

/// A named monetary container owned by a user.
///
/// The balance carries the invariant that it equals the signed sum of the
/// transactions currently attached to the account. Any code path that
/// replaces an account's transaction set must set the balance in the same
/// atomic unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// The ID of the account.
    pub id: AccountId,
    /// The display name of the account.
    pub name: String,
    /// The kind of account.
    pub account_type: AccountType,
    /// The current balance, equal to the signed sum of the account's
    /// transactions.
    pub balance: f64,
    /// The ID of the user that owns the account.
    pub user_id: UserId,
    /// Whether this is the user's default account.
    pub is_default: bool,
}

/// Create the account table.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS account (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                account_type TEXT NOT NULL,
                balance REAL NOT NULL,
                user_id INTEGER NOT NULL,
                is_default INTEGER NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

/// Map a database row to an [Account].
pub fn map_row_to_account(row: &Row) -> Result<Account, rusqlite::Error> {
    let id = row.get(0)?;
    let name = row.get(1)?;
    let account_type = row.get(2)?;
    let balance = row.get(3)?;
    let user_id = row.get(4)?;
    let is_default = row.get(5)?;

    Ok(Account {
        id,
        name,
        account_type,
        balance,
        user_id,
        is_default,
    })
}

/// Insert an account unless a row with the same ID exists, then return the
/// row that is in the database afterwards.
///
/// The insert is conditional on the primary key, so an existing account is
/// left entirely unchanged, balance included.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn upsert_account(account: &Account, connection: &Connection) -> Result<Account, Error> {
    connection.execute(
        "INSERT INTO account (id, name, account_type, balance, user_id, is_default)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(id) DO NOTHING",
        params![
            account.id,
            account.name,
            account.account_type,
            account.balance,
            account.user_id,
            account.is_default,
        ],
    )?;

    get_account(&account.id, connection)
}

/// Retrieve an account from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid account,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_account(id: &str, connection: &Connection) -> Result<Account, Error> {
    connection
        .prepare(
            "SELECT id, name, account_type, balance, user_id, is_default
             FROM account WHERE id = :id",
        )?
        .query_one(&[(":id", id)], map_row_to_account)
        .map_err(|error| error.into())
}
