use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    ModelTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::contracts::{missing_row, NamedRef};
use crate::entities::{customer, order, order_detail, product, OrderStatus};
use crate::errors::ApiError;
use crate::resource::ResourceContract;
use crate::services::orders::{self, NewLine};

/// Customer sub-object embedded in order reads (no country nesting here).
#[derive(Debug, Serialize)]
pub struct OrderCustomer {
    pub id: i32,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
}

#[derive(Debug, Serialize)]
pub struct OrderLineRead {
    pub id: i32,
    pub quantity: i32,
    #[serde(with = "crate::wire::decimal_2dp")]
    pub unit_price: Decimal,
    pub product: NamedRef,
}

#[derive(Debug, Serialize)]
pub struct OrderRead {
    pub id: i32,
    pub created_at: DateTime<Utc>,
    pub status: OrderStatus,
    #[serde(with = "crate::wire::decimal_2dp")]
    pub total: Decimal,
    pub customer: OrderCustomer,
    pub detail: Vec<OrderLineRead>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct OrderLineCreate {
    pub product: i32,
    #[validate(range(min = 1, message = "must be a positive integer"))]
    pub quantity: i32,
}

/// Create contract: the owning customer plus the initial lines. The
/// customer reference is immutable afterwards, and lines can never be
/// added, replaced or removed through the public surface.
#[derive(Debug, Deserialize, Validate)]
pub struct OrderCreate {
    pub customer: i32,
    #[serde(default)]
    #[validate]
    pub detail: Vec<OrderLineCreate>,
}

/// Update contract: only the status may change. Any enumerated target
/// value is accepted; no transition graph is enforced.
#[derive(Debug, Deserialize)]
pub struct OrderUpdate {
    pub status: OrderStatus,
}

pub struct Orders;

#[async_trait]
impl ResourceContract for Orders {
    type Entity = order::Entity;
    type Read = OrderRead;
    type Create = OrderCreate;
    type Update = OrderUpdate;

    const NAME: &'static str = "order";

    fn id_column() -> order::Column {
        order::Column::Id
    }

    async fn read(db: &DatabaseConnection, model: order::Model) -> Result<OrderRead, ApiError> {
        let customer = customer::Entity::find_by_id(model.customer_id)
            .one(db)
            .await?
            .ok_or_else(|| missing_row("customer", model.customer_id))?;
        let lines = model
            .find_related(order_detail::Entity)
            .order_by_asc(order_detail::Column::Id)
            .all(db)
            .await?;

        let product_ids: Vec<i32> = lines.iter().map(|l| l.product_id).collect();
        let products: HashMap<i32, String> = product::Entity::find()
            .filter(product::Column::Id.is_in(product_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|p| (p.id, p.name))
            .collect();

        let total = orders::total_in_memory(&lines);
        let detail = lines
            .into_iter()
            .map(|line| {
                let name = products
                    .get(&line.product_id)
                    .cloned()
                    .ok_or_else(|| missing_row("product", line.product_id))?;
                Ok(OrderLineRead {
                    id: line.id,
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                    product: NamedRef {
                        id: line.product_id,
                        name,
                    },
                })
            })
            .collect::<Result<Vec<_>, ApiError>>()?;

        Ok(OrderRead {
            id: model.id,
            created_at: model.created_at,
            status: model.status,
            total,
            customer: OrderCustomer {
                id: customer.id,
                email: customer.email,
                firstname: customer.firstname,
                lastname: customer.lastname,
            },
            detail,
        })
    }

    async fn insert(txn: &DatabaseTransaction, payload: OrderCreate) -> Result<i32, ApiError> {
        payload.validate()?;
        let lines: Vec<NewLine> = payload
            .detail
            .iter()
            .map(|l| NewLine {
                product: l.product,
                quantity: l.quantity,
            })
            .collect();
        orders::create_order(txn, payload.customer, &lines).await
    }

    async fn update(
        txn: &DatabaseTransaction,
        model: order::Model,
        payload: OrderUpdate,
    ) -> Result<(), ApiError> {
        let mut row: order::ActiveModel = model.into();
        row.status = Set(payload.status);
        row.update(txn).await?;
        Ok(())
    }
}
