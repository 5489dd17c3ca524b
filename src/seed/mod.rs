//! Populates the database with sample data for local development.
//!
//! One run ensures the demo user and account exist, regenerates the
//! account's transaction history from scratch, and swaps it in atomically
//! so the account balance never disagrees with the stored transactions.

mod categories;
mod generator;

pub use categories::{CategoryRange, EXPENSE_CATEGORIES, INCOME_CATEGORIES, categories_for};
pub use generator::{GeneratedBatch, HISTORY_DAYS, generate_demo_transactions};

use rand::Rng;
use rusqlite::Connection;
use time::Date;

use crate::{
    Error,
    account::{Account, AccountType, upsert_account},
    transaction::replace_account_transactions,
    user::insert_user_if_email_absent,
};

/// The email address the demo user is keyed on.
pub const DEMO_USER_EMAIL: &str = "test@stash.dev";
/// The external identity ID recorded for the demo user.
pub const DEMO_USER_CLERK_ID: &str = "local-test-user";
/// The display name recorded for the demo user.
pub const DEMO_USER_NAME: &str = "Test User";
/// The fixed ID the demo account is keyed on.
pub const DEMO_ACCOUNT_ID: &str = "local-test-account";
/// The display name recorded for the demo account.
pub const DEMO_ACCOUNT_NAME: &str = "Test Account";

/// Populate the database with the demo user, the demo account, and a fresh
/// 61-day transaction history, returning the number of transactions
/// created.
///
/// The user and account upserts are idempotent; existing rows are left
/// unchanged. The transaction history is replaced wholesale: the old
/// rows are deleted, the new batch inserted, and the account balance set
/// to the batch's signed sum, all in one atomic unit. A failure anywhere
/// in that unit leaves the previous history and balance intact.
///
/// # Errors
/// This function will return an error if the database cannot be read or
/// the atomic replace fails.
pub fn run_seed(
    rng: &mut impl Rng,
    today: Date,
    connection: &Connection,
) -> Result<usize, Error> {
    let user = insert_user_if_email_absent(
        DEMO_USER_CLERK_ID,
        DEMO_USER_EMAIL,
        DEMO_USER_NAME,
        connection,
    )?;
    tracing::info!("Demo user present as {}", user.email);

    let account = upsert_account(
        &Account {
            id: DEMO_ACCOUNT_ID.to_owned(),
            name: DEMO_ACCOUNT_NAME.to_owned(),
            account_type: AccountType::Current,
            balance: 0.0,
            user_id: user.id,
            is_default: true,
        },
        connection,
    )?;

    let batch = generate_demo_transactions(rng, today, user.id, &account.id);
    replace_account_transactions(&account.id, &batch.transactions, batch.balance, connection)?;

    tracing::info!(
        "Replaced demo history with {} transactions, balance {:.2}",
        batch.transactions.len(),
        batch.balance
    );

    Ok(batch.transactions.len())
}

#[cfg(test)]
mod seed_tests {
    use rand::{SeedableRng, rngs::StdRng};
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        account::get_account,
        db::initialize,
        transaction::get_transactions_for_account,
        user::{count_users, get_user_by_email},
    };

    use super::{
        DEMO_ACCOUNT_ID, DEMO_ACCOUNT_NAME, DEMO_USER_CLERK_ID, DEMO_USER_EMAIL, run_seed,
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn creates_demo_user_account_and_history() {
        let conn = get_test_connection();
        let mut rng = StdRng::seed_from_u64(42);

        let count = run_seed(&mut rng, date!(2026 - 08 - 06), &conn).unwrap();

        let user = get_user_by_email(DEMO_USER_EMAIL, &conn).unwrap();
        assert_eq!(user.clerk_user_id, DEMO_USER_CLERK_ID);

        let account = get_account(DEMO_ACCOUNT_ID, &conn).unwrap();
        assert_eq!(account.name, DEMO_ACCOUNT_NAME);
        assert!(account.is_default);
        assert_eq!(account.user_id, user.id);

        // 61 days at one to three transactions each.
        assert!(
            (61..=183).contains(&count),
            "want 61 to 183 transactions, got {count}"
        );

        let stored = get_transactions_for_account(DEMO_ACCOUNT_ID, &conn).unwrap();
        assert_eq!(stored.len(), count);

        let signed_sum: f64 = stored
            .iter()
            .map(|transaction| transaction.signed_amount())
            .sum();
        assert!(
            (account.balance - signed_sum).abs() < 0.01,
            "balance {} disagrees with stored signed sum {}",
            account.balance,
            signed_sum
        );
    }

    #[test]
    fn rerun_replaces_history_instead_of_accumulating() {
        let conn = get_test_connection();
        let mut rng = StdRng::seed_from_u64(42);
        let first_count = run_seed(&mut rng, date!(2026 - 08 - 06), &conn).unwrap();
        let first_ids: Vec<_> = get_transactions_for_account(DEMO_ACCOUNT_ID, &conn)
            .unwrap()
            .into_iter()
            .map(|transaction| transaction.id)
            .collect();
        assert_eq!(first_ids.len(), first_count);

        let second_count = run_seed(&mut rng, date!(2026 - 08 - 06), &conn).unwrap();

        let stored = get_transactions_for_account(DEMO_ACCOUNT_ID, &conn).unwrap();
        assert_eq!(
            stored.len(),
            second_count,
            "old transactions must not survive a re-run"
        );
        for transaction in &stored {
            assert!(
                !first_ids.contains(&transaction.id),
                "transaction {} from the first run survived the re-run",
                transaction.id
            );
        }

        let account = get_account(DEMO_ACCOUNT_ID, &conn).unwrap();
        let signed_sum: f64 = stored
            .iter()
            .map(|transaction| transaction.signed_amount())
            .sum();
        assert!((account.balance - signed_sum).abs() < 0.01);
    }

    #[test]
    fn rerun_leaves_existing_user_and_account_rows_alone() {
        let conn = get_test_connection();
        let mut rng = StdRng::seed_from_u64(42);
        run_seed(&mut rng, date!(2026 - 08 - 06), &conn).unwrap();
        let user_before = get_user_by_email(DEMO_USER_EMAIL, &conn).unwrap();

        run_seed(&mut rng, date!(2026 - 08 - 06), &conn).unwrap();

        assert_eq!(1, count_users(&conn).unwrap());
        assert_eq!(user_before, get_user_by_email(DEMO_USER_EMAIL, &conn).unwrap());
    }
}
