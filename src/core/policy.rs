//! Reorder policy - turns mean daily demand into a box count to purchase.
//!
//! The policy combines a reorder point (`demand × lead time`) with the classic
//! economic order quantity computed on annualized demand (`demand × 365`). The
//! reorder point is then scaled by the product's priority buffer to decide
//! whether anything is ordered at all.
//!
//! When ordering, the box count is one less than the ceiling of
//! `shortfall / units_per_box`, clamped at zero. The EOQ target is treated as an
//! upper bound and the policy rounds toward under-ordering.

use crate::entities::Priority;
use serde::Serialize;
use std::num::NonZeroU32;

const DAYS_PER_YEAR: f64 = 365.0;

/// Reorder point multipliers per priority tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriorityBuffer {
    /// Multiplier for [`Priority::Low`]
    pub low: f64,
    /// Multiplier for [`Priority::Medium`]
    pub medium: f64,
    /// Multiplier for [`Priority::High`]
    pub high: f64,
}

impl Default for PriorityBuffer {
    fn default() -> Self {
        Self {
            low: 1.0,
            medium: 1.1,
            high: 1.2,
        }
    }
}

impl PriorityBuffer {
    /// Multiplier applied to the reorder point for `priority`.
    #[must_use]
    pub const fn factor(&self, priority: Priority) -> f64 {
        match priority {
            Priority::Low => self.low,
            Priority::Medium => self.medium,
            Priority::High => self.high,
        }
    }
}

/// Tunable constants of the reorder policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReorderPolicy {
    /// Supplier delivery lead time in days
    pub lead_time_days: f64,
    /// Fixed cost of placing one purchase order
    pub order_cost: f64,
    /// Holding cost per unit per year
    pub holding_cost: f64,
    /// Reorder point multipliers per priority
    pub priority_buffer: PriorityBuffer,
}

impl Default for ReorderPolicy {
    fn default() -> Self {
        Self {
            lead_time_days: 5.0,
            order_cost: 30.0,
            holding_cost: 69.0,
            priority_buffer: PriorityBuffer::default(),
        }
    }
}

/// What the policy knows about one product for one run.
#[derive(Debug, Clone, Copy)]
pub struct StockPosition<'a> {
    /// Product code
    pub code: &'a str,
    /// Product name shown to the purchaser
    pub name: &'a str,
    /// Units currently in stock
    pub on_hand: u32,
    /// Sale units per purchasing box
    pub units_per_box: NonZeroU32,
    /// Priority tier from the catalog
    pub priority: Priority,
}

/// Derived purchase suggestion for one product. Lives for a single run.
///
/// Demand, reorder point and EOQ are rounded to two decimals for display;
/// `boxes_to_order` is computed from the unrounded values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    /// Product code
    pub code: String,
    /// Product name
    pub product_name: String,
    /// Units in stock when the run started
    pub on_hand: u32,
    /// Mean units sold per observed sale day
    pub avg_daily_demand: f64,
    /// Stock level that should trigger an order
    pub reorder_point: f64,
    /// Economic order quantity in units
    pub eoq: f64,
    /// Boxes to purchase
    pub boxes_to_order: u32,
}

/// Rounds to two decimal places.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl ReorderPolicy {
    /// `avg_daily_demand × lead_time_days`
    #[must_use]
    pub fn reorder_point(&self, avg_daily_demand: f64) -> f64 {
        avg_daily_demand * self.lead_time_days
    }

    /// `sqrt(2 × annual demand × order cost / holding cost)` with annual demand
    /// taken as `avg_daily_demand × 365`.
    #[must_use]
    pub fn eoq(&self, avg_daily_demand: f64) -> f64 {
        ((2.0 * avg_daily_demand * DAYS_PER_YEAR * self.order_cost) / self.holding_cost).sqrt()
    }

    /// Reorder point scaled by the priority buffer.
    #[must_use]
    pub fn effective_threshold(&self, avg_daily_demand: f64, priority: Priority) -> f64 {
        self.reorder_point(avg_daily_demand) * self.priority_buffer.factor(priority)
    }

    /// Boxes to purchase for the given stock position and demand.
    ///
    /// Zero whenever stock sits at or above the priority-adjusted reorder point.
    /// Below the plain reorder point the gap is added on top of the EOQ; between
    /// the two thresholds only the EOQ is ordered.
    #[must_use]
    pub fn boxes_to_order(
        &self,
        on_hand: u32,
        units_per_box: NonZeroU32,
        priority: Priority,
        avg_daily_demand: f64,
    ) -> u32 {
        let on_hand = f64::from(on_hand);
        let reorder_point = self.reorder_point(avg_daily_demand);
        if on_hand >= self.effective_threshold(avg_daily_demand, priority) {
            return 0;
        }

        let eoq = self.eoq(avg_daily_demand);
        let shortfall = if on_hand < reorder_point {
            reorder_point - on_hand + eoq
        } else {
            eoq
        };

        let boxes = (shortfall / f64::from(units_per_box.get())).ceil() - 1.0;

        // Cast safety: clamped to [0, u32::MAX] before the conversion
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let boxes = boxes.clamp(0.0, f64::from(u32::MAX)) as u32;
        boxes
    }

    /// Full recommendation for one product.
    #[must_use]
    pub fn recommend(&self, position: &StockPosition<'_>, avg_daily_demand: f64) -> Recommendation {
        Recommendation {
            code: position.code.to_string(),
            product_name: position.name.to_string(),
            on_hand: position.on_hand,
            avg_daily_demand: round2(avg_daily_demand),
            reorder_point: round2(self.reorder_point(avg_daily_demand)),
            eoq: round2(self.eoq(avg_daily_demand)),
            boxes_to_order: self.boxes_to_order(
                position.on_hand,
                position.units_per_box,
                position.priority,
                avg_daily_demand,
            ),
        }
    }
}
