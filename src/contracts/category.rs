use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DatabaseTransaction, Set};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entities::category;
use crate::errors::ApiError;
use crate::resource::ResourceContract;

#[derive(Debug, Serialize)]
pub struct CategoryRead {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CategoryPayload {
    #[validate(length(min = 1, max = 50, message = "must be 1 to 50 characters"))]
    pub name: String,
}

pub struct Categories;

#[async_trait]
impl ResourceContract for Categories {
    type Entity = category::Entity;
    type Read = CategoryRead;
    type Create = CategoryPayload;
    type Update = CategoryPayload;

    const NAME: &'static str = "category";

    fn id_column() -> category::Column {
        category::Column::Id
    }

    async fn read(
        _db: &DatabaseConnection,
        model: category::Model,
    ) -> Result<CategoryRead, ApiError> {
        Ok(CategoryRead {
            id: model.id,
            name: model.name,
        })
    }

    async fn insert(txn: &DatabaseTransaction, payload: CategoryPayload) -> Result<i32, ApiError> {
        payload.validate()?;
        let row = category::ActiveModel {
            name: Set(payload.name),
            ..Default::default()
        }
        .insert(txn)
        .await?;
        Ok(row.id)
    }

    async fn update(
        txn: &DatabaseTransaction,
        model: category::Model,
        payload: CategoryPayload,
    ) -> Result<(), ApiError> {
        payload.validate()?;
        let mut row: category::ActiveModel = model.into();
        row.name = Set(payload.name);
        row.update(txn).await?;
        Ok(())
    }
}
