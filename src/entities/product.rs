//! Product entity - The catalog of purchasable products.
//!
//! Each product is identified by its supplier code and carries the number of sale
//! units contained in one purchasing box, plus a business-assigned priority tier
//! that biases reorder recommendations.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::errors::Error;

/// Business priority of a product. Higher tiers reorder earlier.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// No buffer on top of the reorder point
    #[default]
    #[sea_orm(string_value = "low")]
    Low,
    /// Moderate buffer
    #[sea_orm(string_value = "medium")]
    Medium,
    /// Largest buffer
    #[sea_orm(string_value = "high")]
    High,
}

impl Priority {
    /// Lowercase name as stored and displayed.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(Error::InvalidPriority {
                value: s.to_string(),
            }),
        }
    }
}

/// Product database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Supplier product code (e.g., "FB007"), unique across the catalog
    #[sea_orm(unique)]
    pub code: String,
    /// Display name (e.g., "DXN Morinzhi")
    pub name: String,
    /// Sale units contained in one purchasing box, always greater than zero
    pub units_per_box: i32,
    /// Priority tier used to buffer the reorder point
    pub priority: Priority,
    /// When the product was added to the catalog
    pub created_at: DateTime,
    /// When the product was last modified
    pub updated_at: DateTime,
}

/// Products are matched to sales by code, not by foreign key
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_priority_parses_case_and_whitespace_insensitively() {
        assert_eq!(" High ".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!("MEDIUM".parse::<Priority>().unwrap(), Priority::Medium);
        assert_eq!("low".parse::<Priority>().unwrap(), Priority::Low);
    }

    #[test]
    fn test_priority_rejects_unknown_tier() {
        let result = "urgent".parse::<Priority>();
        assert!(matches!(result, Err(Error::InvalidPriority { value }) if value == "urgent"));
    }

    #[test]
    fn test_priority_defaults_to_low() {
        assert_eq!(Priority::default(), Priority::Low);
        assert_eq!(Priority::default().to_string(), "low");
    }
}
