//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the catalog and sales ledger tables.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod product;
pub mod sale;

// Re-export specific types to avoid conflicts
pub use product::{
    Column as ProductColumn, Entity as Product, Model as ProductModel, Priority,
};
pub use sale::{Column as SaleColumn, Entity as Sale, Model as SaleModel};
