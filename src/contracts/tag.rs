use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DatabaseTransaction, Set};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entities::tag;
use crate::errors::ApiError;
use crate::resource::ResourceContract;

#[derive(Debug, Serialize)]
pub struct TagRead {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TagPayload {
    #[validate(length(min = 1, max = 50, message = "must be 1 to 50 characters"))]
    pub name: String,
}

pub struct Tags;

#[async_trait]
impl ResourceContract for Tags {
    type Entity = tag::Entity;
    type Read = TagRead;
    type Create = TagPayload;
    type Update = TagPayload;

    const NAME: &'static str = "tag";

    fn id_column() -> tag::Column {
        tag::Column::Id
    }

    async fn read(_db: &DatabaseConnection, model: tag::Model) -> Result<TagRead, ApiError> {
        Ok(TagRead {
            id: model.id,
            name: model.name,
        })
    }

    async fn insert(txn: &DatabaseTransaction, payload: TagPayload) -> Result<i32, ApiError> {
        payload.validate()?;
        let row = tag::ActiveModel {
            name: Set(payload.name),
            ..Default::default()
        }
        .insert(txn)
        .await?;
        Ok(row.id)
    }

    async fn update(
        txn: &DatabaseTransaction,
        model: tag::Model,
        payload: TagPayload,
    ) -> Result<(), ApiError> {
        payload.validate()?;
        let mut row: tag::ActiveModel = model.into();
        row.name = Set(payload.name);
        row.update(txn).await?;
        Ok(())
    }
}
