//! Order routes. Orders share the generic dispatcher for get/create/update
//! but override the list query (per-row totals from the aggregate form) and
//! expose no delete; DELETE falls through to 405.

use axum::{
    extract::rejection::QueryRejection,
    extract::{OriginalUri, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::contracts::order::OrderCustomer;
use crate::contracts::Orders;
use crate::entities::OrderStatus;
use crate::errors::ApiError;
use crate::handlers::crud::{self, next_header, Operations};
use crate::pagination::ListArgs;
use crate::services::orders::{list_with_totals, OrderListRow};
use crate::AppState;

/// One row of the order list: no line detail, total included.
#[derive(Debug, Serialize)]
pub struct OrderListItem {
    pub id: i32,
    pub created_at: DateTime<Utc>,
    pub status: OrderStatus,
    pub customer: OrderCustomer,
    #[serde(with = "crate::wire::decimal_2dp")]
    pub total: Decimal,
}

impl From<OrderListRow> for OrderListItem {
    fn from(row: OrderListRow) -> Self {
        OrderListItem {
            id: row.id,
            created_at: row.created_at,
            status: row.status,
            customer: OrderCustomer {
                id: row.customer_id,
                email: row.email,
                firstname: row.firstname,
                lastname: row.lastname,
            },
            total: row.total,
        }
    }
}

async fn list_orders(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    args: Result<Query<ListArgs>, QueryRejection>,
) -> Result<Response, ApiError> {
    let args = crud::list_args(args)?;
    let rows = list_with_totals(&state.db, &args).await?;
    let items: Vec<OrderListItem> = rows.into_iter().map(Into::into).collect();
    Ok((StatusCode::OK, next_header(&args, uri.path()), Json(items)).into_response())
}

pub fn routes() -> Router<AppState> {
    crud::routes::<Orders>(Operations {
        list: false,
        get: true,
        create: true,
        replace: true,
        delete: false,
    })
    .route("/", get(list_orders))
}
