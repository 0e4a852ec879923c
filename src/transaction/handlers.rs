//! Defines the endpoints for listing and recording transactions.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{
        FromRef, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use rusqlite::Connection;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    calendar::DayKey,
    pagination::{Paginated, PaginationConfig},
    view_state::TransactionFilters,
};

use super::{
    NewTransaction, Transaction, TransactionStatus, TransactionType, create_transaction,
    query_transactions,
};

/// The state needed to list or record transactions.
#[derive(Debug, Clone)]
pub struct TransactionsState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The config that controls page sizes.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for TransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The query parameters of the transaction list.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionListQuery {
    /// The 1-based page number.
    pub page: Option<u64>,
    /// The page size.
    pub limit: Option<u64>,
    /// Only list this type of transaction.
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
    /// Only list transactions with this status.
    pub status: Option<TransactionStatus>,
    /// Only list transactions on or after this day.
    pub date_from: Option<DayKey>,
    /// Only list transactions on or before this day.
    pub date_to: Option<DayKey>,
    /// Only list transactions sent or received by this user.
    pub user_id: Option<String>,
    /// Only list transactions of at least this amount.
    pub min_amount: Option<f64>,
    /// Only list transactions of at most this amount.
    pub max_amount: Option<f64>,
}

impl From<TransactionListQuery> for TransactionFilters {
    fn from(query: TransactionListQuery) -> Self {
        Self {
            transaction_type: query.transaction_type,
            status: query.status,
            date_from: query.date_from,
            date_to: query.date_to,
            user_id: query.user_id,
            min_amount: query.min_amount,
            max_amount: query.max_amount,
        }
    }
}

/// A route handler that returns one page of transactions, newest first.
pub async fn get_transactions_endpoint(
    State(state): State<TransactionsState>,
    query: Result<Query<TransactionListQuery>, QueryRejection>,
) -> Result<Json<Paginated<Transaction>>, Error> {
    let Query(query) = query
        .inspect_err(|rejection| tracing::debug!("invalid transaction query: {rejection}"))
        .map_err(|rejection| Error::InvalidRequest(rejection.body_text()))?;

    let (page, limit) = state.pagination_config.resolve(query.page, query.limit);
    let filters = TransactionFilters::from(query);

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    query_transactions(&filters, page, limit, &connection)
        .inspect_err(|error| tracing::error!("could not query transactions: {error}"))
        .map(Json)
}

/// A route handler for recording a new transaction, responds with the stored
/// transaction and `201 Created`.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionsState>,
    body: Result<Json<NewTransaction>, JsonRejection>,
) -> Result<impl IntoResponse, Error> {
    let Json(new_transaction) = body
        .inspect_err(|rejection| tracing::debug!("invalid transaction body: {rejection}"))
        .map_err(|rejection| Error::InvalidRequest(rejection.body_text()))?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = create_transaction(new_transaction, OffsetDateTime::now_utc(), &connection)
        .inspect_err(|error| tracing::debug!("could not record transaction: {error}"))?;

    Ok((StatusCode::CREATED, Json(transaction)))
}
