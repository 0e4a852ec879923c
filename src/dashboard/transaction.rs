//! Database queries for retrieving dashboard transaction data.

use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    Error,
    transaction::{TRANSACTION_COLUMNS, Transaction, map_transaction_row},
};

/// Gets every transaction at or after `since` and before `until`, oldest
/// first. `None` for `until` leaves the window open-ended.
///
/// This is the pre-filtered list the dashboard charts are built from.
/// Transactions without a timestamp are left out.
///
/// # Errors
/// Returns [Error::SqlError] if:
/// - SQL query preparation or execution fails
/// - Transaction row mapping fails
pub(super) fn get_transactions_in_window(
    since: OffsetDateTime,
    until: Option<OffsetDateTime>,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let query = format!(
        "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" \
        WHERE created_at >= ?1 AND created_at < ?2 \
        ORDER BY created_at ASC, id ASC"
    );
    let until = until.map_or(i64::MAX, OffsetDateTime::unix_timestamp);

    connection
        .prepare(&query)?
        .query_map([since.unix_timestamp(), until], map_transaction_row)?
        .collect::<Result<Vec<Transaction>, rusqlite::Error>>()
        .map_err(|error| error.into())
}
