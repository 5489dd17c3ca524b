//! Defines the core data model and database queries for transactions.

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    database_id::{TransactionId, UserId},
};

/// Whether a transaction brought money in or sent money out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Money received.
    Income,
    /// Money spent.
    Expense,
}

impl TransactionType {
    /// The TEXT form stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "INCOME",
            TransactionType::Expense => "EXPENSE",
        }
    }

    fn from_str(value: &str) -> Option<Self> {
        match value {
            "INCOME" => Some(TransactionType::Income),
            "EXPENSE" => Some(TransactionType::Expense),
            _ => None,
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()
            .and_then(|text| Self::from_str(text).ok_or(FromSqlError::InvalidType))
    }
}

/// Where a transaction is in its settlement lifecycle.
///
/// Bulk-generated sample data is always [TransactionStatus::Completed];
/// the other states exist for transactions recorded by the application
/// proper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    /// Recorded but not yet settled.
    Pending,
    /// Settled.
    Completed,
    /// Rejected by the payment rail.
    Failed,
}

impl TransactionStatus {
    /// The TEXT form stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::Completed => "COMPLETED",
            TransactionStatus::Failed => "FAILED",
        }
    }

    fn from_str(value: &str) -> Option<Self> {
        match value {
            "PENDING" => Some(TransactionStatus::Pending),
            "COMPLETED" => Some(TransactionStatus::Completed),
            "FAILED" => Some(TransactionStatus::Failed),
            _ => None,
        }
    }
}

impl ToSql for TransactionStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()
            .and_then(|text| Self::from_str(text).ok_or(FromSqlError::InvalidType))
    }
}

/// A single monetary event attached to one account.
///
/// Amounts are always positive; the direction comes from
/// [Transaction::transaction_type].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// Whether this is income or an expense.
    pub transaction_type: TransactionType,
    /// The amount of money, always positive.
    pub amount: f64,
    /// A text description of what the transaction was for.
    pub description: String,
    /// When the transaction happened.
    pub date: Date,
    /// The category label, e.g. "groceries".
    pub category: String,
    /// Where the transaction is in its settlement lifecycle.
    pub status: TransactionStatus,
    /// The ID of the user that owns the transaction.
    pub user_id: UserId,
    /// The ID of the account the transaction belongs to.
    pub account_id: String,
    /// When the row was created.
    pub created_at: OffsetDateTime,
    /// When the row was last updated.
    pub updated_at: OffsetDateTime,
}

impl Transaction {
    /// The amount signed by direction: positive for income, negative for
    /// expenses.
    pub fn signed_amount(&self) -> f64 {
        match self.transaction_type {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id TEXT PRIMARY KEY,
                transaction_type TEXT NOT NULL,
                amount REAL NOT NULL,
                description TEXT NOT NULL,
                date TEXT NOT NULL,
                category TEXT NOT NULL,
                status TEXT NOT NULL,
                user_id INTEGER NOT NULL,
                account_id TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
                FOREIGN KEY(account_id) REFERENCES account(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    // Index used by the delete-by-account path in the seed.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_account ON \"transaction\"(account_id);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [Transaction].
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let transaction_type = row.get(1)?;
    let amount = row.get(2)?;
    let description = row.get(3)?;
    let date = row.get(4)?;
    let category = row.get(5)?;
    let status = row.get(6)?;
    let user_id = row.get(7)?;
    let account_id = row.get(8)?;
    let created_at = row.get(9)?;
    let updated_at = row.get(10)?;

    Ok(Transaction {
        id,
        transaction_type,
        amount,
        description,
        date,
        category,
        status,
        user_id,
        account_id,
        created_at,
        updated_at,
    })
}

/// Get the number of transactions attached to `account_id`.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn count_transactions_for_account(
    account_id: &str,
    connection: &Connection,
) -> Result<u32, Error> {
    connection
        .query_row(
            "SELECT COUNT(id) FROM \"transaction\" WHERE account_id = ?1;",
            [account_id],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Retrieve all transactions attached to `account_id`, oldest first.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_transactions_for_account(
    account_id: &str,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, transaction_type, amount, description, date, category, status,
                    user_id, account_id, created_at, updated_at
             FROM \"transaction\" WHERE account_id = :account_id ORDER BY date ASC",
        )?
        .query_map(&[(":account_id", account_id)], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::SqlError))
        .collect()
}

#[cfg(test)]
pub(crate) mod test_utils {
    use time::Date;
    use uuid::Uuid;

    use super::{Transaction, TransactionStatus, TransactionType};

    /// Build a completed transaction with the given direction and amount,
    /// stamped at midnight UTC of `date`.
    pub fn make_transaction(
        transaction_type: TransactionType,
        amount: f64,
        date: Date,
        user_id: i64,
        account_id: &str,
    ) -> Transaction {
        let stamp = date.midnight().assume_utc();

        Transaction {
            id: Uuid::new_v4().to_string(),
            transaction_type,
            amount,
            description: "test transaction".to_owned(),
            date,
            category: "other-income".to_owned(),
            status: TransactionStatus::Completed,
            user_id,
            account_id: account_id.to_owned(),
            created_at: stamp,
            updated_at: stamp,
        }
    }
}

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        account::{Account, AccountType, upsert_account},
        db::initialize,
        user::insert_user_if_absent,
    };

    use super::{
        TransactionType, count_transactions_for_account, get_transactions_for_account,
        test_utils::make_transaction,
    };

    fn get_test_connection() -> (Connection, i64) {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let user = insert_user_if_absent("u_123", "foo@bar.baz", "Foo Bar", &conn).unwrap();
        upsert_account(
            &Account {
                id: "acct-1".to_owned(),
                name: "Everyday".to_owned(),
                account_type: AccountType::Current,
                balance: 0.0,
                user_id: user.id,
                is_default: true,
            },
            &conn,
        )
        .unwrap();

        (conn, user.id)
    }

    fn insert(transaction: &super::Transaction, conn: &Connection) {
        conn.execute(
            "INSERT INTO \"transaction\" (id, transaction_type, amount, description, date,
                    category, status, user_id, account_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            rusqlite::params![
                transaction.id,
                transaction.transaction_type,
                transaction.amount,
                transaction.description,
                transaction.date,
                transaction.category,
                transaction.status,
                transaction.user_id,
                transaction.account_id,
                transaction.created_at,
                transaction.updated_at,
            ],
        )
        .expect("Could not insert transaction");
    }

    #[test]
    fn stored_transactions_round_trip() {
        let (conn, user_id) = get_test_connection();
        let want = make_transaction(
            TransactionType::Income,
            123.45,
            date!(2025 - 06 - 01),
            user_id,
            "acct-1",
        );
        insert(&want, &conn);

        let got = get_transactions_for_account("acct-1", &conn).unwrap();

        assert_eq!(vec![want], got);
    }

    #[test]
    fn count_is_scoped_to_account() {
        let (conn, user_id) = get_test_connection();
        let transaction = make_transaction(
            TransactionType::Expense,
            50.0,
            date!(2025 - 06 - 01),
            user_id,
            "acct-1",
        );
        insert(&transaction, &conn);

        assert_eq!(
            1,
            count_transactions_for_account("acct-1", &conn).unwrap()
        );
        assert_eq!(
            0,
            count_transactions_for_account("acct-other", &conn).unwrap()
        );
    }

    #[test]
    fn signed_amount_follows_direction() {
        let (_conn, user_id) = get_test_connection();
        let income = make_transaction(
            TransactionType::Income,
            10.0,
            date!(2025 - 06 - 01),
            user_id,
            "acct-1",
        );
        let expense = make_transaction(
            TransactionType::Expense,
            10.0,
            date!(2025 - 06 - 01),
            user_id,
            "acct-1",
        );

        assert_eq!(income.signed_amount(), 10.0);
        assert_eq!(expense.signed_amount(), -10.0);
    }
}
