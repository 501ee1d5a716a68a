//! The order aggregate: creation, line appending, and the dual-computed
//! total.
//!
//! The total is defined once as a pure fold over the line collection and
//! once as an equivalent SQL aggregate. Both produce the same decimal value
//! for the same data; list endpoints use the SQL form so totals never
//! require loading lines into memory.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, FromQueryResult, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    Set,
};
use tracing::instrument;

use crate::entities::{customer, order, order_detail, product, OrderStatus};
use crate::errors::ApiError;
use crate::pagination::ListArgs;
use crate::resource::resolve_fk;

/// One (product, quantity) pair of an order-creation request.
#[derive(Debug, Clone, Copy)]
pub struct NewLine {
    pub product: i32,
    pub quantity: i32,
}

/// Create an order with its initial lines in the caller's transaction.
///
/// Resolves the customer, sets status to `PENDING`, stamps the server
/// clock, then appends one line per pair. A failure on any line aborts the
/// whole creation; no partial order is ever committed.
#[instrument(skip(txn, lines), fields(lines = lines.len()))]
pub async fn create_order(
    txn: &DatabaseTransaction,
    customer_id: i32,
    lines: &[NewLine],
) -> Result<i32, ApiError> {
    let customer = resolve_fk::<customer::Entity, _>(txn, "customer", customer_id).await?;
    let order = order::ActiveModel {
        customer_id: Set(customer.id),
        status: Set(OrderStatus::Pending),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(txn)
    .await?;
    for line in lines {
        append_line(txn, order.id, line.product, line.quantity).await?;
    }
    Ok(order.id)
}

/// Append one line to an order, snapshotting the product's current price
/// as the line's unit price.
#[instrument(skip(txn))]
pub async fn append_line(
    txn: &DatabaseTransaction,
    order_id: i32,
    product_id: i32,
    quantity: i32,
) -> Result<i32, ApiError> {
    if quantity < 1 {
        return Err(ApiError::Validation(
            "quantity: must be a positive integer".to_string(),
        ));
    }
    let product = resolve_fk::<product::Entity, _>(txn, "product", product_id).await?;
    let line = order_detail::ActiveModel {
        order_id: Set(order_id),
        product_id: Set(product.id),
        quantity: Set(quantity),
        unit_price: Set(product.price),
        ..Default::default()
    }
    .insert(txn)
    .await?;
    Ok(line.id)
}

/// In-memory form of the total: fold over loaded lines.
pub fn total_in_memory(lines: &[order_detail::Model]) -> Decimal {
    lines
        .iter()
        .map(|line| line.unit_price * Decimal::from(line.quantity))
        .sum()
}

/// SQL form of the total: one aggregate over the line table. Contractually
/// equal to [`total_in_memory`] for the same data.
pub async fn total_query<C>(db: &C, order_id: i32) -> Result<Decimal, ApiError>
where
    C: ConnectionTrait,
{
    #[derive(FromQueryResult)]
    struct TotalRow {
        total: Decimal,
    }

    let row = order_detail::Entity::find()
        .select_only()
        .column_as(
            Expr::cust("COALESCE(SUM(unit_price * quantity), 0)"),
            "total",
        )
        .filter(order_detail::Column::OrderId.eq(order_id))
        .into_model::<TotalRow>()
        .one(db)
        .await?;
    Ok(row.map(|r| r.total).unwrap_or_default())
}

/// One row of the order list query: order fields, the owning customer, and
/// the total pushed into the query as a correlated aggregate.
#[derive(Debug, FromQueryResult)]
pub struct OrderListRow {
    pub id: i32,
    pub created_at: DateTime<Utc>,
    pub status: OrderStatus,
    pub customer_id: i32,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub total: Decimal,
}

/// Order list page with per-row totals, no per-row round trips.
#[instrument(skip(db, args))]
pub async fn list_with_totals(
    db: &DatabaseConnection,
    args: &ListArgs,
) -> Result<Vec<OrderListRow>, ApiError> {
    let rows = order::Entity::find()
        .select_only()
        .column(order::Column::Id)
        .column(order::Column::CreatedAt)
        .column(order::Column::Status)
        .column_as(customer::Column::Id, "customer_id")
        .column(customer::Column::Email)
        .column(customer::Column::Firstname)
        .column(customer::Column::Lastname)
        .column_as(
            Expr::cust(
                "(SELECT COALESCE(SUM(od.unit_price * od.quantity), 0) \
                 FROM order_details AS od WHERE od.order_id = orders.id)",
            ),
            "total",
        )
        .join(JoinType::InnerJoin, order::Relation::Customer.def())
        .order_by_asc(order::Column::Id)
        .offset(args.offset())
        .limit(args.limit())
        .into_model::<OrderListRow>()
        .all(db)
        .await?;
    Ok(rows)
}
