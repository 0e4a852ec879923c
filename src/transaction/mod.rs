//! The transaction ledger.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and its lenient deserialization
//! - Database functions for recording and querying transactions
//! - JSON handlers for listing and recording transactions

mod core;
mod handlers;
mod query;

pub use core::{
    NewTransaction, Transaction, TransactionStatus, TransactionType, UserRef, count_transactions,
    create_transaction, create_transaction_table, map_transaction_row,
};
pub use handlers::{create_transaction_endpoint, get_transactions_endpoint};
pub use query::query_transactions;

pub(crate) use core::TRANSACTION_COLUMNS;
