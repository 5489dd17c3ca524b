mod core;
mod sync_endpoint;

pub use core::{
    User, count_users, create_user_table, get_user_by_clerk_id, get_user_by_email,
    insert_user_if_absent, insert_user_if_email_absent, map_row_to_user,
};
pub use sync_endpoint::{SyncUserResponse, sync_user, sync_user_endpoint};
