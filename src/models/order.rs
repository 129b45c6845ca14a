//! Normalized order records
//!
//! Orders live in the document store as loosely-typed JSON; nothing about
//! their shape is guaranteed. [`crate::stats::normalize`] maps each raw
//! document to the fully-defaulted types below before any aggregation runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Default bag weight in kilograms when a line item carries none.
pub const DEFAULT_BAG_KG: f64 = 24.0;

/// Placeholder variety name for line items with no variety.
pub const UNKNOWN_VARIETY: &str = "Unknown variety";

/// Canonical order status, derived from the free-text status label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// In-flight orders: labels containing "active", "pending" or "dispatched"
    Active,
    Completed,
    Cancelled,
    /// Unrecognized labels; counted in totals but reported in no named bucket
    Unknown,
}

impl OrderStatus {
    /// Canonicalize a free-text status label by case-insensitive substring
    /// match. `active`, `pending` and `dispatched` all fold into the active
    /// bucket.
    pub fn canonicalize(label: &str) -> Self {
        let label = label.to_lowercase();
        if label.contains("active") || label.contains("pending") || label.contains("dispatched") {
            OrderStatus::Active
        } else if label.contains("completed") {
            OrderStatus::Completed
        } else if label.contains("cancelled") {
            OrderStatus::Cancelled
        } else {
            OrderStatus::Unknown
        }
    }
}

/// One variety/quantity entry within an order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub variety_name: String,
    pub bags: i64,
    pub bag_kg: f64,
    /// Effective weight of the line. Resolved at normalization time: the
    /// document's explicit `lineKg` when numeric (an explicit zero is
    /// trusted), otherwise `bags * bag_kg`.
    pub line_kg: f64,
    pub line_subtotal_gbp: f64,
}

/// Monetary and volume totals of one order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrderTotals {
    pub total_gbp: f64,
    pub subtotal_gbp: f64,
    pub delivery_fee_gbp: f64,
    pub total_bags: i64,
}

/// A fully-defaulted order record, read-only to the stats engine.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub status: OrderStatus,
    /// Absent when the document carried no usable timestamp; such orders are
    /// excluded from time-based aggregates but still count toward totals.
    pub created_at: Option<DateTime<Utc>>,
    /// Normalized but not consumed by any report yet (reserved).
    pub preferred_delivery_date: Option<DateTime<Utc>>,
    pub totals: OrderTotals,
    pub delivery_method: String,
    pub items: Vec<OrderLine>,
}

impl OrderRecord {
    /// Order-level weight: the sum of each line item's effective kg.
    pub fn total_kg(&self) -> f64 {
        self.items.iter().map(|line| line.line_kg).sum()
    }
}
