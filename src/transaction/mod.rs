mod core;
mod replace;

pub use core::{
    Transaction, TransactionStatus, TransactionType, count_transactions_for_account,
    create_transaction_table, get_transactions_for_account, map_transaction_row,
};
pub use replace::replace_account_transactions;
