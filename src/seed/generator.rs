//! Generates the random transaction history for the demo account.
//!
//! The shape of the output is fixed (61 days, one to three transactions
//! per day, income roughly 40% of the time) while the values are drawn
//! from whatever [Rng] the caller passes in, so tests can drive it with a
//! seeded generator and assert on the exact output.

use rand::Rng;
use time::{Date, Duration};
use uuid::Uuid;

use crate::{
    database_id::UserId,
    seed::categories::categories_for,
    transaction::{Transaction, TransactionStatus, TransactionType},
};

/// How far back the generated history reaches, in days before today.
///
/// The window is inclusive on both ends: today plus the 60 preceding days,
/// 61 calendar days in total.
pub const HISTORY_DAYS: i64 = 60;

/// The probability that a generated transaction is income rather than an
/// expense.
const INCOME_PROBABILITY: f64 = 0.4;

/// The result of one generator run.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedBatch {
    /// The generated transactions, oldest day first.
    pub transactions: Vec<Transaction>,
    /// The signed sum of the generated amounts, rounded to cents.
    pub balance: f64,
}

/// Generate the demo account's transaction history.
///
/// Produces one to three transactions for each of the 61 days ending at
/// `today`, oldest first, and accumulates the balance they imply. The
/// returned balance is exactly the signed sum of the returned amounts,
/// rounded to cents.
pub fn generate_demo_transactions(
    rng: &mut impl Rng,
    today: Date,
    user_id: UserId,
    account_id: &str,
) -> GeneratedBatch {
    let mut transactions = Vec::new();
    let mut balance = 0.0;

    for days_ago in (0..=HISTORY_DAYS).rev() {
        let date = today - Duration::days(days_ago);
        let count = rng.gen_range(1..=3);

        for _ in 0..count {
            let transaction = generate_transaction(rng, date, user_id, account_id);
            balance += transaction.signed_amount();
            transactions.push(transaction);
        }
    }

    GeneratedBatch {
        transactions,
        balance: round_to_cents(balance),
    }
}

fn generate_transaction(
    rng: &mut impl Rng,
    date: Date,
    user_id: UserId,
    account_id: &str,
) -> Transaction {
    let transaction_type = if rng.r#gen::<f64>() < INCOME_PROBABILITY {
        TransactionType::Income
    } else {
        TransactionType::Expense
    };

    let categories = categories_for(transaction_type);
    let category = &categories[rng.gen_range(0..categories.len())];
    let amount = round_to_cents(rng.gen_range(category.min..=category.max));

    let description = match transaction_type {
        TransactionType::Income => format!("Received {}", category.name),
        TransactionType::Expense => format!("Paid for {}", category.name),
    };

    let stamp = date.midnight().assume_utc();

    Transaction {
        id: Uuid::new_v4().to_string(),
        transaction_type,
        amount,
        description,
        date,
        category: category.name.to_owned(),
        status: TransactionStatus::Completed,
        user_id,
        account_id: account_id.to_owned(),
        created_at: stamp,
        updated_at: stamp,
    }
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
