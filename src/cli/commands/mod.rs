//! Command handlers. Each returns the text to print on success.

/// `restock catalog ...`
pub mod catalog;
/// `restock recommend ...`
pub mod recommend;
/// `restock sales ...`
pub mod sales;
