use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DatabaseTransaction, Set};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entities::country;
use crate::errors::ApiError;
use crate::resource::ResourceContract;

#[derive(Debug, Serialize)]
pub struct CountryRead {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CountryPayload {
    #[validate(length(min = 1, max = 50, message = "must be 1 to 50 characters"))]
    pub name: String,
}

pub struct Countries;

#[async_trait]
impl ResourceContract for Countries {
    type Entity = country::Entity;
    type Read = CountryRead;
    type Create = CountryPayload;
    type Update = CountryPayload;

    const NAME: &'static str = "country";

    fn id_column() -> country::Column {
        country::Column::Id
    }

    async fn read(
        _db: &DatabaseConnection,
        model: country::Model,
    ) -> Result<CountryRead, ApiError> {
        Ok(CountryRead {
            id: model.id,
            name: model.name,
        })
    }

    async fn insert(txn: &DatabaseTransaction, payload: CountryPayload) -> Result<i32, ApiError> {
        payload.validate()?;
        let row = country::ActiveModel {
            name: Set(payload.name),
            ..Default::default()
        }
        .insert(txn)
        .await?;
        Ok(row.id)
    }

    async fn update(
        txn: &DatabaseTransaction,
        model: country::Model,
        payload: CountryPayload,
    ) -> Result<(), ApiError> {
        payload.validate()?;
        let mut row: country::ActiveModel = model.into();
        row.name = Set(payload.name);
        row.update(txn).await?;
        Ok(())
    }
}
