//! The aggregation engine: read-only group-by views over the entity graph.
//!
//! Every view recomputes from the current committed state on each call;
//! nothing is cached or incrementally maintained.

use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait,
};
use serde::Serialize;
use tracing::instrument;

use crate::contracts::NamedRef;
use crate::entities::{category, country, customer, order, order_detail, product, OrderStatus};
use crate::errors::ApiError;

#[derive(Debug, FromQueryResult)]
struct IdNameCount {
    id: i32,
    name: String,
    count: i64,
}

#[derive(Debug, Serialize)]
pub struct CategoryCountRow {
    pub category: NamedRef,
    pub count: i64,
}

/// Products count by category. Outer join: categories with zero products
/// still appear with count 0. Ordered by category id.
#[instrument(skip(db))]
pub async fn products_by_category(
    db: &DatabaseConnection,
) -> Result<Vec<CategoryCountRow>, ApiError> {
    let rows = category::Entity::find()
        .select_only()
        .column(category::Column::Id)
        .column(category::Column::Name)
        .column_as(product::Column::Id.count(), "count")
        .join(JoinType::LeftJoin, category::Relation::Product.def())
        .group_by(category::Column::Id)
        .group_by(category::Column::Name)
        .order_by_asc(category::Column::Id)
        .into_model::<IdNameCount>()
        .all(db)
        .await?;
    Ok(rows
        .into_iter()
        .map(|r| CategoryCountRow {
            category: NamedRef {
                id: r.id,
                name: r.name,
            },
            count: r.count,
        })
        .collect())
}

#[derive(Debug, Serialize)]
pub struct CountryCountRow {
    pub country: NamedRef,
    pub count: i64,
}

/// Customers count by country. Zero-count countries included, ordered by
/// country id.
#[instrument(skip(db))]
pub async fn customers_by_country(
    db: &DatabaseConnection,
) -> Result<Vec<CountryCountRow>, ApiError> {
    let rows = country::Entity::find()
        .select_only()
        .column(country::Column::Id)
        .column(country::Column::Name)
        .column_as(customer::Column::Id.count(), "count")
        .join(JoinType::LeftJoin, country::Relation::Customer.def())
        .group_by(country::Column::Id)
        .group_by(country::Column::Name)
        .order_by_asc(country::Column::Id)
        .into_model::<IdNameCount>()
        .all(db)
        .await?;
    Ok(rows
        .into_iter()
        .map(|r| CountryCountRow {
            country: NamedRef {
                id: r.id,
                name: r.name,
            },
            count: r.count,
        })
        .collect())
}

/// One row per status value present in the data; no zero-fill.
#[derive(Debug, Serialize, FromQueryResult)]
pub struct OrdersByStatusRow {
    pub status: OrderStatus,
    pub count: i64,
}

#[instrument(skip(db))]
pub async fn orders_by_status(db: &DatabaseConnection) -> Result<Vec<OrdersByStatusRow>, ApiError> {
    let rows = order::Entity::find()
        .select_only()
        .column(order::Column::Status)
        .column_as(order::Column::Id.count(), "count")
        .group_by(order::Column::Status)
        .order_by_asc(order::Column::Status)
        .into_model::<OrdersByStatusRow>()
        .all(db)
        .await?;
    Ok(rows)
}

#[derive(Debug, FromQueryResult)]
struct ProductSells {
    id: i32,
    name: String,
    sells: i64,
}

#[derive(Debug, Serialize)]
pub struct SellsByProductRow {
    pub product: NamedRef,
    pub sells: i64,
}

/// Total quantity sold per product; only products with at least one order
/// line appear.
#[instrument(skip(db))]
pub async fn sells_by_product(db: &DatabaseConnection) -> Result<Vec<SellsByProductRow>, ApiError> {
    let rows = order_detail::Entity::find()
        .select_only()
        .column_as(product::Column::Id, "id")
        .column_as(product::Column::Name, "name")
        .column_as(order_detail::Column::Quantity.sum(), "sells")
        .join(JoinType::InnerJoin, order_detail::Relation::Product.def())
        .group_by(product::Column::Id)
        .group_by(product::Column::Name)
        .order_by_asc(product::Column::Id)
        .into_model::<ProductSells>()
        .all(db)
        .await?;
    Ok(rows
        .into_iter()
        .map(|r| SellsByProductRow {
            product: NamedRef {
                id: r.id,
                name: r.name,
            },
            sells: r.sells,
        })
        .collect())
}

/// Units delivered to each country for each product. Only lines on orders
/// whose status is `DELIVERED` contribute.
#[derive(Debug, Serialize, FromQueryResult)]
pub struct UnitsDeliveredRow {
    pub product_id: i32,
    pub product_name: String,
    pub country_id: i32,
    pub country_name: String,
    pub units: i64,
}

#[instrument(skip(db))]
pub async fn units_delivered_by_product_by_country(
    db: &DatabaseConnection,
) -> Result<Vec<UnitsDeliveredRow>, ApiError> {
    let rows = order_detail::Entity::find()
        .select_only()
        .column_as(product::Column::Id, "product_id")
        .column_as(product::Column::Name, "product_name")
        .column_as(country::Column::Id, "country_id")
        .column_as(country::Column::Name, "country_name")
        .column_as(order_detail::Column::Quantity.sum(), "units")
        .join(JoinType::InnerJoin, order_detail::Relation::Product.def())
        .join(JoinType::InnerJoin, order_detail::Relation::Order.def())
        .join(JoinType::InnerJoin, order::Relation::Customer.def())
        .join(JoinType::InnerJoin, customer::Relation::Country.def())
        .filter(order::Column::Status.eq(OrderStatus::Delivered))
        .group_by(product::Column::Id)
        .group_by(product::Column::Name)
        .group_by(country::Column::Id)
        .group_by(country::Column::Name)
        .order_by_asc(product::Column::Id)
        .order_by_asc(country::Column::Id)
        .into_model::<UnitsDeliveredRow>()
        .all(db)
        .await?;
    Ok(rows)
}
