use std::collections::BTreeSet;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    ModelTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::contracts::{missing_row, NamedRef};
use crate::entities::{category, product, product_tag, tag, ProductStatus};
use crate::errors::ApiError;
use crate::resource::{resolve_fk, ResourceContract};

#[derive(Debug, Serialize)]
pub struct ProductRead {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "crate::wire::decimal_2dp")]
    pub price: Decimal,
    pub category: NamedRef,
    pub status: ProductStatus,
    pub tags: Vec<String>,
}

/// Create/update contract. `category` is the referenced category's id;
/// `tags` is a set of names, each auto-created when absent.
#[derive(Debug, Deserialize, Validate)]
pub struct ProductPayload {
    #[validate(length(min = 1, max = 50, message = "must be 1 to 50 characters"))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(with = "crate::wire::decimal_2dp")]
    pub price: Decimal,
    pub category: i32,
    pub status: ProductStatus,
    #[serde(default)]
    pub tags: Vec<String>,
}

pub struct Products;

#[async_trait]
impl ResourceContract for Products {
    type Entity = product::Entity;
    type Read = ProductRead;
    type Create = ProductPayload;
    type Update = ProductPayload;

    const NAME: &'static str = "product";

    fn id_column() -> product::Column {
        product::Column::Id
    }

    async fn read(db: &DatabaseConnection, model: product::Model) -> Result<ProductRead, ApiError> {
        let category = category::Entity::find_by_id(model.category_id)
            .one(db)
            .await?
            .ok_or_else(|| missing_row("category", model.category_id))?;
        let tags = model
            .find_related(tag::Entity)
            .order_by_asc(tag::Column::Id)
            .all(db)
            .await?
            .into_iter()
            .map(|t| t.name)
            .collect();
        Ok(ProductRead {
            id: model.id,
            name: model.name,
            description: model.description,
            price: model.price,
            category: NamedRef {
                id: category.id,
                name: category.name,
            },
            status: model.status,
            tags,
        })
    }

    async fn insert(txn: &DatabaseTransaction, payload: ProductPayload) -> Result<i32, ApiError> {
        payload.validate()?;
        let category = resolve_fk::<category::Entity, _>(txn, "category", payload.category).await?;
        let row = product::ActiveModel {
            name: Set(payload.name),
            description: Set(payload.description),
            price: Set(payload.price),
            category_id: Set(category.id),
            status: Set(payload.status),
            ..Default::default()
        }
        .insert(txn)
        .await?;
        link_tags(txn, row.id, &payload.tags).await?;
        Ok(row.id)
    }

    async fn update(
        txn: &DatabaseTransaction,
        model: product::Model,
        payload: ProductPayload,
    ) -> Result<(), ApiError> {
        payload.validate()?;
        let category = resolve_fk::<category::Entity, _>(txn, "category", payload.category).await?;
        let id = model.id;
        let mut row: product::ActiveModel = model.into();
        row.name = Set(payload.name);
        row.description = Set(payload.description);
        row.price = Set(payload.price);
        row.category_id = Set(category.id);
        row.status = Set(payload.status);
        row.update(txn).await?;

        // The payload carries the full tag set; drop old links and relink.
        product_tag::Entity::delete_many()
            .filter(product_tag::Column::ProductId.eq(id))
            .exec(txn)
            .await?;
        link_tags(txn, id, &payload.tags).await?;
        Ok(())
    }
}

/// Look a tag up by name, creating it when absent.
async fn get_or_create_tag(txn: &DatabaseTransaction, name: &str) -> Result<tag::Model, ApiError> {
    if let Some(existing) = tag::Entity::find()
        .filter(tag::Column::Name.eq(name))
        .one(txn)
        .await?
    {
        return Ok(existing);
    }
    let created = tag::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(txn)
    .await?;
    Ok(created)
}

async fn link_tags(
    txn: &DatabaseTransaction,
    product_id: i32,
    names: &[String],
) -> Result<(), ApiError> {
    // Tag names form a set; duplicates in the payload collapse.
    let names: BTreeSet<&str> = names.iter().map(String::as_str).collect();
    for name in names {
        let tag = get_or_create_tag(txn, name).await?;
        product_tag::ActiveModel {
            product_id: Set(product_id),
            tag_id: Set(tag.id),
        }
        .insert(txn)
        .await?;
    }
    Ok(())
}
