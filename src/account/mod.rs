mod core;

pub use core::{
    Account, AccountType, create_account_table, get_account, map_row_to_account, upsert_account,
};
