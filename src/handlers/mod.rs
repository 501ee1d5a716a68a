//! HTTP surface: one router per resource built from its catalog entry,
//! plus the order-specific routes and the reporting endpoints.

pub mod crud;
pub mod orders;
pub mod statistics;

use axum::Router;

use crate::contracts::{Categories, Countries, Customers, Products, Tags};
use crate::handlers::crud::Operations;
use crate::AppState;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/categories", crud::routes::<Categories>(Operations::ALL))
        .nest("/countries", crud::routes::<Countries>(Operations::ALL))
        .nest("/tags", crud::routes::<Tags>(Operations::ALL))
        .nest("/customers", crud::routes::<Customers>(Operations::ALL))
        .nest("/products", crud::routes::<Products>(Operations::ALL))
        .nest("/orders", orders::routes())
        .nest("/statistics", statistics::routes())
}
