//! Reporting endpoints. GET-only, always 200 with an array of rows; the
//! aggregation engine recomputes from committed state on every request.

use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};

use crate::errors::ApiError;
use crate::services::statistics;
use crate::AppState;

async fn products_by_category(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(statistics::products_by_category(&state.db).await?))
}

async fn customers_by_country(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(statistics::customers_by_country(&state.db).await?))
}

async fn orders_by_status(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(statistics::orders_by_status(&state.db).await?))
}

async fn sells_by_product(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(statistics::sells_by_product(&state.db).await?))
}

async fn units_delivered_by_product_by_country(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(
        statistics::units_delivered_by_product_by_country(&state.db).await?,
    ))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products_by_category", get(products_by_category))
        .route("/customers_by_country", get(customers_by_country))
        .route("/orders_by_status", get(orders_by_status))
        .route("/sells_by_product", get(sells_by_product))
        .route(
            "/units_delivered_by_product_by_country",
            get(units_delivered_by_product_by_country),
        )
}
