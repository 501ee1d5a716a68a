//! Catalog entries: one module per resource, each declaring the read,
//! create and update contracts and implementing [`ResourceContract`].

pub mod category;
pub mod country;
pub mod customer;
pub mod order;
pub mod product;
pub mod tag;

use serde::Serialize;

pub use category::Categories;
pub use country::Countries;
pub use customer::Customers;
pub use order::Orders;
pub use product::Products;
pub use tag::Tags;

/// Nested `{id, name}` sub-object used wherever a read contract embeds a
/// foreign-key relation.
#[derive(Debug, Clone, Serialize)]
pub struct NamedRef {
    pub id: i32,
    pub name: String,
}

/// A row the current model references must exist; if it does not, the
/// store lost referential integrity and this is an internal error, not a
/// client-facing one.
pub(crate) fn missing_row(entity: &str, id: i32) -> crate::errors::ApiError {
    crate::errors::ApiError::Database(sea_orm::DbErr::RecordNotFound(format!(
        "{entity} {id} is referenced but missing"
    )))
}
