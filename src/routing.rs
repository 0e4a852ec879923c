//! Application router configuration.

use axum::{
    Router, middleware,
    response::{IntoResponse, Response},
    routing::get,
};

use crate::{
    AppState, Error,
    dashboard::{get_dashboard_charts, get_dashboard_series, get_dashboard_totals},
    endpoints,
    logging::logging_middleware,
    transaction::{create_transaction_endpoint, get_transactions_endpoint},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::TRANSACTIONS_API,
            get(get_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(endpoints::DASHBOARD_SERIES_API, get(get_dashboard_series))
        .route(endpoints::DASHBOARD_TOTALS_API, get(get_dashboard_totals))
        .route(endpoints::DASHBOARD_CHARTS_API, get(get_dashboard_charts))
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

async fn get_404_not_found() -> Response {
    Error::NotFound.into_response()
}
