use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::contracts::{missing_row, NamedRef};
use crate::entities::{country, customer};
use crate::errors::ApiError;
use crate::resource::{resolve_fk, ResourceContract};

#[derive(Debug, Serialize)]
pub struct CustomerRead {
    pub id: i32,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub country: NamedRef,
}

/// Create/update contract. `country` is the referenced country's id and is
/// resolved at load time.
#[derive(Debug, Deserialize, Validate)]
pub struct CustomerPayload {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, max = 30, message = "must be 1 to 30 characters"))]
    pub firstname: String,
    #[validate(length(min = 1, max = 30, message = "must be 1 to 30 characters"))]
    pub lastname: String,
    pub country: i32,
}

pub struct Customers;

#[async_trait]
impl ResourceContract for Customers {
    type Entity = customer::Entity;
    type Read = CustomerRead;
    type Create = CustomerPayload;
    type Update = CustomerPayload;

    const NAME: &'static str = "customer";

    fn id_column() -> customer::Column {
        customer::Column::Id
    }

    async fn read(
        db: &DatabaseConnection,
        model: customer::Model,
    ) -> Result<CustomerRead, ApiError> {
        let country = country::Entity::find_by_id(model.country_id)
            .one(db)
            .await?
            .ok_or_else(|| missing_row("country", model.country_id))?;
        Ok(CustomerRead {
            id: model.id,
            email: model.email,
            firstname: model.firstname,
            lastname: model.lastname,
            country: NamedRef {
                id: country.id,
                name: country.name,
            },
        })
    }

    async fn insert(txn: &DatabaseTransaction, payload: CustomerPayload) -> Result<i32, ApiError> {
        payload.validate()?;
        let country = resolve_fk::<country::Entity, _>(txn, "country", payload.country).await?;
        let row = customer::ActiveModel {
            email: Set(payload.email),
            firstname: Set(payload.firstname),
            lastname: Set(payload.lastname),
            country_id: Set(country.id),
            ..Default::default()
        }
        .insert(txn)
        .await?;
        Ok(row.id)
    }

    async fn update(
        txn: &DatabaseTransaction,
        model: customer::Model,
        payload: CustomerPayload,
    ) -> Result<(), ApiError> {
        payload.validate()?;
        let country = resolve_fk::<country::Entity, _>(txn, "country", payload.country).await?;
        let mut row: customer::ActiveModel = model.into();
        row.email = Set(payload.email);
        row.firstname = Set(payload.firstname);
        row.lastname = Set(payload.lastname);
        row.country_id = Set(country.id);
        row.update(txn).await?;
        Ok(())
    }
}
