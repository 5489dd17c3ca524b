//! Atomically replaces an account's transaction set.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior, params};

use crate::{Error, transaction::Transaction};

/// Replace every transaction attached to `account_id` with `transactions`
/// and set the account's balance to `new_balance`, as one atomic unit.
///
/// The delete, the bulk insert, and the balance update commit or roll back
/// together. If any statement fails, the database keeps the account's
/// previous transaction set and balance; there is no state in which the
/// old rows are gone but the new ones are not in, or in which the balance
/// disagrees with the stored transactions.
///
/// `new_balance` must be the signed sum of `transactions` for the account
/// balance invariant to hold after the commit.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateTransactionId] if `transactions` contains an ID that
///   collides with itself,
/// - [Error::UpdateMissingAccount] if `account_id` does not refer to an
///   account,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn replace_account_transactions(
    account_id: &str,
    transactions: &[Transaction],
    new_balance: f64,
    connection: &Connection,
) -> Result<(), Error> {
    // Immediate behaviour takes the write lock up front so the unit cannot
    // deadlock against itself after partial progress.
    let unit = SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    unit.execute(
        "DELETE FROM \"transaction\" WHERE account_id = ?1",
        params![account_id],
    )?;

    {
        let mut statement = unit.prepare(
            "INSERT INTO \"transaction\" (id, transaction_type, amount, description, date,
                    category, status, user_id, account_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        )?;

        for transaction in transactions {
            statement.execute(params![
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
            ])?;
        }
    }

    let updated = unit.execute(
        "UPDATE account SET balance = ?1 WHERE id = ?2",
        params![new_balance, account_id],
    )?;

    if updated == 0 {
        // Dropping the unit without committing rolls everything back.
        return Err(Error::UpdateMissingAccount);
    }

    unit.commit()?;

    Ok(())
}

#[cfg(test)]
mod replace_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        account::{Account, AccountType, get_account, upsert_account},
        db::initialize,
        transaction::{
            TransactionType, core::test_utils::make_transaction, count_transactions_for_account,
            get_transactions_for_account,
        },
        user::insert_user_if_absent,
    };

    use super::replace_account_transactions;

    const ACCOUNT_ID: &str = "acct-1";

    fn get_test_connection() -> (Connection, i64) {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let user = insert_user_if_absent("u_123", "foo@bar.baz", "Foo Bar", &conn).unwrap();
        upsert_account(
            &Account {
                id: ACCOUNT_ID.to_owned(),
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

    #[test]
    fn replaces_rows_and_sets_balance() {
        let (conn, user_id) = get_test_connection();
        let old = vec![make_transaction(
            TransactionType::Expense,
            99.0,
            date!(2025 - 05 - 01),
            user_id,
            ACCOUNT_ID,
        )];
        replace_account_transactions(ACCOUNT_ID, &old, -99.0, &conn).unwrap();

        let new = vec![
            make_transaction(
                TransactionType::Income,
                100.0,
                date!(2025 - 06 - 01),
                user_id,
                ACCOUNT_ID,
            ),
            make_transaction(
                TransactionType::Expense,
                40.5,
                date!(2025 - 06 - 02),
                user_id,
                ACCOUNT_ID,
            ),
        ];
        replace_account_transactions(ACCOUNT_ID, &new, 59.5, &conn).unwrap();

        let stored = get_transactions_for_account(ACCOUNT_ID, &conn).unwrap();
        assert_eq!(new, stored);
        assert_eq!(get_account(ACCOUNT_ID, &conn).unwrap().balance, 59.5);
    }

    #[test]
    fn fails_and_inserts_nothing_for_missing_account() {
        let (conn, user_id) = get_test_connection();
        let transactions = vec![make_transaction(
            TransactionType::Income,
            10.0,
            date!(2025 - 06 - 01),
            user_id,
            "acct-missing",
        )];

        let result = replace_account_transactions("acct-missing", &transactions, 10.0, &conn);

        assert_eq!(result, Err(Error::UpdateMissingAccount));
        assert_eq!(
            0,
            count_transactions_for_account("acct-missing", &conn).unwrap()
        );
    }

    #[test]
    fn rolls_back_delete_when_insert_fails() {
        let (conn, user_id) = get_test_connection();
        let old = vec![make_transaction(
            TransactionType::Income,
            75.0,
            date!(2025 - 05 - 01),
            user_id,
            ACCOUNT_ID,
        )];
        replace_account_transactions(ACCOUNT_ID, &old, 75.0, &conn).unwrap();

        // Two transactions sharing one ID make the second insert fail
        // partway through the batch.
        let mut colliding = make_transaction(
            TransactionType::Expense,
            5.0,
            date!(2025 - 06 - 01),
            user_id,
            ACCOUNT_ID,
        );
        let first = make_transaction(
            TransactionType::Expense,
            10.0,
            date!(2025 - 06 - 01),
            user_id,
            ACCOUNT_ID,
        );
        colliding.id = first.id.clone();

        let result =
            replace_account_transactions(ACCOUNT_ID, &[first, colliding], -15.0, &conn);

        assert_eq!(result, Err(Error::DuplicateTransactionId));
        let stored = get_transactions_for_account(ACCOUNT_ID, &conn).unwrap();
        assert_eq!(old, stored, "prior transaction set must survive a failed replace");
        assert_eq!(
            get_account(ACCOUNT_ID, &conn).unwrap().balance,
            75.0,
            "prior balance must survive a failed replace"
        );
    }
}
