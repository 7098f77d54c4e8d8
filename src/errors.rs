//! Unified error types and result handling.
//!
//! Per-product skips during a recommendation run are not errors; see
//! [`crate::core::recommend::SkipReason`]. Everything in this enum aborts the
//! operation that produced it.

use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read, parsed or validated
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Any failure reported by the store
    #[error("Database error: {0}")]
    Database(String),

    /// File system failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader/writer failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// No catalog entry exists for the product code
    #[error("Product not found: {code}")]
    ProductNotFound {
        /// Product code that was looked up
        code: String,
    },

    /// A product with this code already exists in the catalog
    #[error("Product already exists: {code}")]
    DuplicateProduct {
        /// Conflicting product code
        code: String,
    },

    /// Priority text outside of low/medium/high
    #[error("Invalid priority '{value}': expected low, medium or high")]
    InvalidPriority {
        /// Rejected input
        value: String,
    },

    /// Box size must be strictly positive
    #[error("Invalid box size {units_per_box}: must be greater than zero")]
    InvalidBoxSize {
        /// Rejected box size
        units_per_box: i64,
    },

    /// Unit quantities cannot be negative
    #[error("Invalid quantity {quantity}: must not be negative")]
    InvalidQuantity {
        /// Rejected quantity
        quantity: i64,
    },

    /// A sales file could not be ingested
    #[error("Invalid sales file {file}: {message}")]
    Ingest {
        /// File or folder being ingested
        file: String,
        /// What went wrong
        message: String,
    },

    /// The inventory snapshot is missing a required column or field
    #[error("Inventory snapshot is malformed: {details}")]
    MalformedSnapshot {
        /// Which structure is missing
        details: String,
    },

    /// The configured sheet does not exist in the order template
    #[error("Order template has no sheet named '{sheet}'")]
    TemplateSheetMissing {
        /// Configured sheet name
        sheet: String,
    },

    /// Input rejected by a business rule
    #[error("Validation error: {message}")]
    Validation {
        /// What went wrong
        message: String,
    },
}

impl From<sea_orm::DbErr> for Error {
    fn from(value: sea_orm::DbErr) -> Self {
        Self::Database(value.to_string())
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
