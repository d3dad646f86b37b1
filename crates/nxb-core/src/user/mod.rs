//! User domain module.
//!
//! - `row`: observable reviewer row
//! - `filter`: reviewer search

mod filter;
mod row;

pub use filter::{UserQuery, filter_users};
pub use row::UserRow;
