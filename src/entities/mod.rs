//! sea-orm entity definitions for the relational graph:
//! categories, countries, tags, customers, products (with a tag join
//! table), orders and their line items.

pub mod category;
pub mod country;
pub mod customer;
pub mod order;
pub mod order_detail;
pub mod product;
pub mod product_tag;
pub mod tag;

pub use order::OrderStatus;
pub use product::ProductStatus;
