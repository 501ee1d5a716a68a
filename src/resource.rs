//! The entity catalog and the generic CRUD dispatcher.
//!
//! Each resource registers one [`ResourceContract`]: a declarative binding
//! from a storage entity to its read, create and update contracts. The
//! dispatcher functions below execute list/get/create/replace/delete
//! uniformly against any catalog entry, wrapping every mutation in a
//! transaction so failures roll back and successes are durably committed
//! before returning.

use async_trait::async_trait;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, PrimaryKeyTrait,
    QueryOrder, QuerySelect, TransactionTrait,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::instrument;

use crate::errors::ApiError;
use crate::pagination::ListArgs;

/// One entry of the entity catalog.
///
/// The contract is pure data shaping: `read` exposes a stored model (nesting
/// foreign-key relations as sub-objects), `insert` resolves and persists a
/// create payload, `update` applies an update payload to an existing row.
/// Identity and immutable fields never appear in the update contract.
#[async_trait]
pub trait ResourceContract: Send + Sync + 'static {
    type Entity: EntityTrait;
    type Read: Serialize + Send;
    type Create: DeserializeOwned + Send;
    type Update: DeserializeOwned + Send;

    /// Singular name, used in log messages.
    const NAME: &'static str;

    /// Column providing the stable list order (insertion/identifier order).
    fn id_column() -> <Self::Entity as EntityTrait>::Column;

    /// Shape a stored model for the read contract.
    async fn read(
        db: &DatabaseConnection,
        model: <Self::Entity as EntityTrait>::Model,
    ) -> Result<Self::Read, ApiError>;

    /// Validate a create payload and insert it, returning the new id.
    async fn insert(txn: &DatabaseTransaction, payload: Self::Create) -> Result<i32, ApiError>;

    /// Validate an update payload and apply it to an existing row in place.
    async fn update(
        txn: &DatabaseTransaction,
        model: <Self::Entity as EntityTrait>::Model,
        payload: Self::Update,
    ) -> Result<(), ApiError>;
}

/// Resolve a foreign-key reference supplied as a numeric id in a payload.
/// A missing target is a validation error naming the field, not an
/// integrity error: the store never saw the write.
pub async fn resolve_fk<E, C>(conn: &C, field: &str, id: i32) -> Result<E::Model, ApiError>
where
    E: EntityTrait,
    C: ConnectionTrait,
    i32: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType>,
{
    E::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| ApiError::Validation(format!("{field}: referenced entity {id} not found")))
}

#[instrument(skip(db, args), fields(resource = R::NAME))]
pub async fn list<R>(db: &DatabaseConnection, args: &ListArgs) -> Result<Vec<R::Read>, ApiError>
where
    R: ResourceContract,
{
    let rows = R::Entity::find()
        .order_by_asc(R::id_column())
        .offset(args.offset())
        .limit(args.limit())
        .all(db)
        .await?;

    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        out.push(R::read(db, row).await?);
    }
    Ok(out)
}

#[instrument(skip(db), fields(resource = R::NAME))]
pub async fn get<R>(db: &DatabaseConnection, id: i32) -> Result<R::Read, ApiError>
where
    R: ResourceContract,
    i32: Into<<<R::Entity as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType>,
{
    let model = R::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(ApiError::NotFound)?;
    R::read(db, model).await
}

#[instrument(skip(db, payload), fields(resource = R::NAME))]
pub async fn create<R>(db: &DatabaseConnection, payload: R::Create) -> Result<i32, ApiError>
where
    R: ResourceContract,
{
    let txn = db.begin().await?;
    let id = R::insert(&txn, payload).await?;
    txn.commit().await?;
    Ok(id)
}

#[instrument(skip(db, payload), fields(resource = R::NAME))]
pub async fn replace<R>(db: &DatabaseConnection, id: i32, payload: R::Update) -> Result<(), ApiError>
where
    R: ResourceContract,
    i32: Into<<<R::Entity as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType>,
{
    let txn = db.begin().await?;
    let model = R::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(ApiError::NotFound)?;
    R::update(&txn, model, payload).await?;
    txn.commit().await?;
    Ok(())
}

#[instrument(skip(db), fields(resource = R::NAME))]
pub async fn delete<R>(db: &DatabaseConnection, id: i32) -> Result<(), ApiError>
where
    R: ResourceContract,
    i32: Into<<<R::Entity as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType>,
{
    let txn = db.begin().await?;
    R::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(ApiError::NotFound)?;
    R::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;
    Ok(())
}
