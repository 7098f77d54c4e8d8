//! Core business logic - framework-agnostic catalog, ledger and replenishment operations.
//!
//! `catalog` and `ledger` talk to the store. `demand`, `policy`, `recommend` and
//! `reconcile` work on in-memory snapshots only.

/// Product catalog: box sizes and priority tiers
pub mod catalog;
/// Mean daily demand from the sales history
pub mod demand;
/// Append-only sales ledger and its queries
pub mod ledger;
/// Reorder point, EOQ and box count calculation
pub mod policy;
/// Filling an order template from recommendations
pub mod reconcile;
/// Text rendering of recommendation runs
pub mod report;
/// Running the policy over an inventory snapshot
pub mod recommend;
