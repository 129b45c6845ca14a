//! Aggregator
//!
//! Folds a normalized order sequence into five independent running
//! accumulators: status counts, volume, financial totals, time series and
//! shipping method. All combining operations are commutative, so partial
//! accumulators over shards of the input can be [`merge`](OrderAccumulator::merge)d
//! elementwise and the result does not depend on iteration order.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};

use crate::models::order::{OrderRecord, OrderStatus};

/// Per-variety running totals (kg, bags, spend).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VarietyTotals {
    pub total_kg: f64,
    pub total_bags: i64,
    pub total_spend_gbp: f64,
}

/// Per-delivery-method running totals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MethodTotals {
    pub count: i64,
    pub total_kg: f64,
    pub total_amount_gbp: f64,
}

/// Zero-padded `YYYY-MM` bucket key from UTC calendar fields. Always seven
/// characters, so lexicographic order is chronological order.
pub fn month_key(at: &DateTime<Utc>) -> String {
    format!("{:04}-{:02}", at.year(), at.month())
}

/// Running accumulator state, local to one aggregation call.
#[derive(Debug, Clone, Default)]
pub struct OrderAccumulator {
    pub(crate) total_orders: i64,
    pub(crate) active_orders: i64,
    pub(crate) completed_orders: i64,
    pub(crate) cancelled_orders: i64,

    pub(crate) total_kg: f64,
    pub(crate) total_bags: i64,
    pub(crate) by_variety: BTreeMap<String, VarietyTotals>,

    pub(crate) total_amount_gbp: f64,
    pub(crate) total_subtotal_gbp: f64,
    pub(crate) total_delivery_fees_gbp: f64,
    pub(crate) spend_by_month: BTreeMap<String, f64>,

    pub(crate) order_count_by_month: BTreeMap<String, i64>,
    pub(crate) timestamps_ms: Vec<i64>,
    pub(crate) first_order_at: Option<DateTime<Utc>>,
    pub(crate) last_order_at: Option<DateTime<Utc>>,

    pub(crate) by_method: BTreeMap<String, MethodTotals>,
}

impl OrderAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one order into the accumulators.
    ///
    /// An order without `created_at` is fully counted in the basic, volume,
    /// financial and shipping dimensions; it contributes to no month-keyed
    /// map and does not move the first/last timestamps.
    pub fn add(&mut self, order: &OrderRecord) {
        self.total_orders += 1;
        match order.status {
            OrderStatus::Active => self.active_orders += 1,
            OrderStatus::Completed => self.completed_orders += 1,
            OrderStatus::Cancelled => self.cancelled_orders += 1,
            OrderStatus::Unknown => {}
        }

        let order_kg = order.total_kg();
        self.total_kg += order_kg;
        self.total_bags += order.totals.total_bags;
        for line in &order.items {
            let variety = self.by_variety.entry(line.variety_name.clone()).or_default();
            variety.total_kg += line.line_kg;
            variety.total_bags += line.bags;
            variety.total_spend_gbp += line.line_subtotal_gbp;
        }

        self.total_amount_gbp += order.totals.total_gbp;
        self.total_subtotal_gbp += order.totals.subtotal_gbp;
        self.total_delivery_fees_gbp += order.totals.delivery_fee_gbp;

        if let Some(created_at) = order.created_at {
            self.timestamps_ms.push(created_at.timestamp_millis());
            self.first_order_at = Some(match self.first_order_at {
                Some(first) => first.min(created_at),
                None => created_at,
            });
            self.last_order_at = Some(match self.last_order_at {
                Some(last) => last.max(created_at),
                None => created_at,
            });
            let key = month_key(&created_at);
            *self.order_count_by_month.entry(key.clone()).or_insert(0) += 1;
            *self.spend_by_month.entry(key).or_insert(0.0) += order.totals.total_gbp;
        }

        let method = self.by_method.entry(order.delivery_method.clone()).or_default();
        method.count += 1;
        method.total_kg += order_kg;
        method.total_amount_gbp += order.totals.total_gbp;
    }

    /// Merge a partial accumulator built over another shard of the input:
    /// elementwise sum of counters and maps, min/max of timestamps.
    pub fn merge(&mut self, other: OrderAccumulator) {
        self.total_orders += other.total_orders;
        self.active_orders += other.active_orders;
        self.completed_orders += other.completed_orders;
        self.cancelled_orders += other.cancelled_orders;

        self.total_kg += other.total_kg;
        self.total_bags += other.total_bags;
        for (name, totals) in other.by_variety {
            let variety = self.by_variety.entry(name).or_default();
            variety.total_kg += totals.total_kg;
            variety.total_bags += totals.total_bags;
            variety.total_spend_gbp += totals.total_spend_gbp;
        }

        self.total_amount_gbp += other.total_amount_gbp;
        self.total_subtotal_gbp += other.total_subtotal_gbp;
        self.total_delivery_fees_gbp += other.total_delivery_fees_gbp;
        for (key, spend) in other.spend_by_month {
            *self.spend_by_month.entry(key).or_insert(0.0) += spend;
        }

        for (key, count) in other.order_count_by_month {
            *self.order_count_by_month.entry(key).or_insert(0) += count;
        }
        self.timestamps_ms.extend(other.timestamps_ms);
        self.first_order_at = match (self.first_order_at, other.first_order_at) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.last_order_at = match (self.last_order_at, other.last_order_at) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };

        for (name, totals) in other.by_method {
            let method = self.by_method.entry(name).or_default();
            method.count += totals.count;
            method.total_kg += totals.total_kg;
            method.total_amount_gbp += totals.total_amount_gbp;
        }
    }
}
