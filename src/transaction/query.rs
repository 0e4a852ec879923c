//! Filtered, paged queries over the transaction ledger.

use rusqlite::{Connection, params_from_iter, types::Value};

use crate::{
    Error,
    calendar::{DayAlignment, DayKey},
    pagination::{Paginated, clamp_page, total_pages},
    view_state::TransactionFilters,
};

use super::core::{TRANSACTION_COLUMNS, Transaction, map_transaction_row};

/// A SQL `WHERE` clause and the values bound to its placeholders.
#[derive(Debug, Default)]
struct WhereClause {
    conditions: Vec<&'static str>,
    params: Vec<Value>,
}

impl WhereClause {
    fn push(&mut self, condition: &'static str, param: Value) {
        self.conditions.push(condition);
        self.params.push(param);
    }

    fn to_sql(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        }
    }
}

/// The first instant of `day` as UTC Unix seconds.
fn day_start(day: DayKey) -> i64 {
    DayAlignment::Utc.start_of_day(day).unix_timestamp()
}

fn build_where_clause(filters: &TransactionFilters) -> WhereClause {
    let mut clause = WhereClause::default();

    if let Some(transaction_type) = &filters.transaction_type {
        clause.push(
            "type = ?",
            Value::Text(transaction_type.as_str().to_owned()),
        );
    }

    if let Some(status) = filters.status {
        clause.push("status = ?", Value::Text(status.as_str().to_owned()));
    }

    if let Some(date_from) = filters.date_from {
        clause.push("created_at >= ?", Value::Integer(day_start(date_from)));
    }

    // Inclusive of the whole end day.
    if let Some(next_day) = filters.date_to.and_then(DayKey::next) {
        clause.push("created_at < ?", Value::Integer(day_start(next_day)));
    }

    if let Some(user_id) = filters
        .user_id
        .as_deref()
        .map(str::trim)
        .filter(|user_id| !user_id.is_empty())
    {
        clause.conditions.push("(sender_id = ? OR receiver_id = ?)");
        clause.params.push(Value::Text(user_id.to_owned()));
        clause.params.push(Value::Text(user_id.to_owned()));
    }

    if let Some(min_amount) = filters.min_amount {
        clause.push("amount >= ?", Value::Real(min_amount));
    }

    if let Some(max_amount) = filters.max_amount {
        clause.push("amount <= ?", Value::Real(max_amount));
    }

    clause
}

/// Get one page of the transactions matching `filters`, newest first.
///
/// Date filters are whole UTC days and both ends are inclusive. Rows with the
/// same timestamp are ordered by ID, newest first, so paging is stable.
/// A `page` past the last page is clamped to the last page.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn query_transactions(
    filters: &TransactionFilters,
    page: u64,
    limit: u64,
    connection: &Connection,
) -> Result<Paginated<Transaction>, Error> {
    let clause = build_where_clause(filters);
    let where_sql = clause.to_sql();
    let limit = limit.clamp(1, i64::MAX as u64);

    let total: i64 = connection.query_row(
        &format!("SELECT COUNT(id) FROM \"transaction\" {where_sql}"),
        params_from_iter(clause.params.iter()),
        |row| row.get(0),
    )?;
    let total = u64::try_from(total).unwrap_or_default();

    let page = clamp_page(page, total_pages(total, limit));
    let offset = (page - 1).saturating_mul(limit);

    let mut params = clause.params;
    params.push(Value::Integer(i64::try_from(limit).unwrap_or(i64::MAX)));
    params.push(Value::Integer(i64::try_from(offset).unwrap_or(i64::MAX)));

    let query = format!(
        "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" {where_sql} \
        ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?"
    );

    let data = connection
        .prepare(&query)?
        .query_map(params_from_iter(params), map_transaction_row)?
        .collect::<Result<Vec<Transaction>, rusqlite::Error>>()?;

    Ok(Paginated::new(data, page, limit, total))
}
