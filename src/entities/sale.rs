//! Sale entity - One ingested unit-sales observation.
//!
//! Rows are append-only: created by ingestion and never updated or deleted.
//! Several rows may share a `(code, load_date)` pair when more than one file
//! was loaded for the same day; consumers sum them.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sale database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sales")]
pub struct Model {
    /// Unique identifier for the sale row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Product code as it appeared in the sales file
    pub code: String,
    /// Product name as it appeared in the sales file
    pub name: String,
    /// Units sold, never negative
    pub quantity: i64,
    /// Calendar day the sales file belongs to
    pub load_date: Date,
}

/// Sales reference products by code only
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
