//! Derived metrics and report assembly
//!
//! Pure function of the final accumulator state: computes zero-guarded
//! averages and date-interval statistics, converts the month-keyed maps to
//! sorted arrays, and composes everything into one immutable
//! [`OrderStatsResponse`]. The empty input set yields a complete report with
//! every numeric field zero, every array empty and every interval `null`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::aggregate::OrderAccumulator;

const MS_PER_DAY: f64 = 86_400_000.0;

/// Order statistics response
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OrderStatsResponse {
    /// Order counts by canonical status
    pub basic: BasicStats,
    /// Weight and bag volumes
    pub volume: VolumeStats,
    /// Monetary totals and averages
    pub financial: FinancialStats,
    /// Time-series and interval statistics
    pub time: TimeStats,
    /// Per-delivery-method breakdown
    pub shipping: ShippingStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BasicStats {
    /// Total number of orders, including those with unrecognized status
    pub total_orders: i64,
    /// Orders labelled active, pending or dispatched
    pub active_orders: i64,
    pub completed_orders: i64,
    pub cancelled_orders: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct VolumeStats {
    /// Total effective weight across all orders
    pub total_kg: f64,
    pub total_bags: i64,
    /// 0 when there are no orders
    pub avg_kg_per_order: f64,
    /// 0 when there are no orders
    pub avg_bags_per_order: f64,
    /// Per-variety breakdown; no mandated order
    pub kg_by_variety: Vec<VarietyBreakdown>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct VarietyBreakdown {
    pub variety: String,
    pub total_kg: f64,
    pub total_bags: i64,
    pub total_spend_gbp: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FinancialStats {
    pub total_amount_gbp: f64,
    pub total_subtotal_gbp: f64,
    pub total_delivery_fees_gbp: f64,
    /// 0 when there are no orders
    pub avg_order_value_gbp: f64,
    /// 0 when there are no orders
    pub avg_delivery_fee_gbp: f64,
    /// Per-variety line-item spend; no mandated order
    pub spend_by_variety: Vec<VarietySpend>,
    /// Order totals bucketed by month, sorted ascending by month key
    pub spend_by_month: Vec<MonthlySpend>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct VarietySpend {
    pub variety: String,
    pub total_spend_gbp: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MonthlySpend {
    /// Zero-padded `YYYY-MM` key
    pub month: String,
    pub total_amount_gbp: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MonthlyCount {
    /// Zero-padded `YYYY-MM` key
    pub month: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TimeStats {
    /// Null when no order carries a timestamp
    pub first_order_at: Option<DateTime<Utc>>,
    /// Null when no order carries a timestamp
    pub last_order_at: Option<DateTime<Utc>>,
    /// Orders per month, sorted ascending by month key; only timestamped
    /// orders contribute
    pub order_count_by_month: Vec<MonthlyCount>,
    /// Null unless at least two timestamped orders exist
    pub days_between_first_and_last: Option<f64>,
    /// Mean gap between consecutive orders in days; null unless at least two
    /// timestamped orders exist
    pub avg_days_between_orders: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ShippingStats {
    /// Per-delivery-method breakdown; no mandated order
    pub by_method: Vec<MethodBreakdown>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MethodBreakdown {
    pub method: String,
    pub count: i64,
    pub total_kg: f64,
    pub total_amount_gbp: f64,
}

impl OrderAccumulator {
    /// Derive averages and interval statistics from the final accumulator
    /// state and assemble the immutable report.
    pub fn finish(self) -> OrderStatsResponse {
        let order_count = self.total_orders;
        let per_order = |sum: f64| {
            if order_count > 0 {
                sum / order_count as f64
            } else {
                0.0
            }
        };

        let mut stamps = self.timestamps_ms;
        stamps.sort_unstable();
        let (days_between_first_and_last, avg_days_between_orders) = if stamps.len() >= 2 {
            let span = (stamps[stamps.len() - 1] - stamps[0]) as f64 / MS_PER_DAY;
            let gap_sum: f64 = stamps
                .windows(2)
                .map(|pair| (pair[1] - pair[0]) as f64 / MS_PER_DAY)
                .sum();
            (Some(span), Some(gap_sum / (stamps.len() - 1) as f64))
        } else {
            (None, None)
        };

        OrderStatsResponse {
            basic: BasicStats {
                total_orders: order_count,
                active_orders: self.active_orders,
                completed_orders: self.completed_orders,
                cancelled_orders: self.cancelled_orders,
            },
            volume: VolumeStats {
                total_kg: self.total_kg,
                total_bags: self.total_bags,
                avg_kg_per_order: per_order(self.total_kg),
                avg_bags_per_order: per_order(self.total_bags as f64),
                kg_by_variety: self
                    .by_variety
                    .iter()
                    .map(|(variety, totals)| VarietyBreakdown {
                        variety: variety.clone(),
                        total_kg: totals.total_kg,
                        total_bags: totals.total_bags,
                        total_spend_gbp: totals.total_spend_gbp,
                    })
                    .collect(),
            },
            financial: FinancialStats {
                total_amount_gbp: self.total_amount_gbp,
                total_subtotal_gbp: self.total_subtotal_gbp,
                total_delivery_fees_gbp: self.total_delivery_fees_gbp,
                avg_order_value_gbp: per_order(self.total_amount_gbp),
                avg_delivery_fee_gbp: per_order(self.total_delivery_fees_gbp),
                spend_by_variety: self
                    .by_variety
                    .into_iter()
                    .map(|(variety, totals)| VarietySpend {
                        variety,
                        total_spend_gbp: totals.total_spend_gbp,
                    })
                    .collect(),
                // BTreeMap iterates in key order; zero-padded keys sort
                // chronologically
                spend_by_month: self
                    .spend_by_month
                    .into_iter()
                    .map(|(month, total_amount_gbp)| MonthlySpend {
                        month,
                        total_amount_gbp,
                    })
                    .collect(),
            },
            time: TimeStats {
                first_order_at: self.first_order_at,
                last_order_at: self.last_order_at,
                order_count_by_month: self
                    .order_count_by_month
                    .into_iter()
                    .map(|(month, count)| MonthlyCount { month, count })
                    .collect(),
                days_between_first_and_last,
                avg_days_between_orders,
            },
            shipping: ShippingStats {
                by_method: self
                    .by_method
                    .into_iter()
                    .map(|(method, totals)| MethodBreakdown {
                        method,
                        count: totals.count,
                        total_kg: totals.total_kg,
                        total_amount_gbp: totals.total_amount_gbp,
                    })
                    .collect(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{compute_order_stats, normalize_order};
    use serde_json::json;

    #[test]
    fn test_empty_input_yields_full_zero_report() {
        let orders: Vec<crate::models::OrderRecord> = Vec::new();
        let report = compute_order_stats(&orders);

        assert_eq!(report.basic.total_orders, 0);
        assert_eq!(report.basic.active_orders, 0);
        assert_eq!(report.basic.completed_orders, 0);
        assert_eq!(report.basic.cancelled_orders, 0);

        assert_eq!(report.volume.total_kg, 0.0);
        assert_eq!(report.volume.total_bags, 0);
        assert_eq!(report.volume.avg_kg_per_order, 0.0);
        assert_eq!(report.volume.avg_bags_per_order, 0.0);
        assert!(report.volume.kg_by_variety.is_empty());

        assert_eq!(report.financial.total_amount_gbp, 0.0);
        assert_eq!(report.financial.avg_order_value_gbp, 0.0);
        assert_eq!(report.financial.avg_delivery_fee_gbp, 0.0);
        assert!(report.financial.spend_by_variety.is_empty());
        assert!(report.financial.spend_by_month.is_empty());

        assert!(report.time.first_order_at.is_none());
        assert!(report.time.last_order_at.is_none());
        assert!(report.time.order_count_by_month.is_empty());
        assert!(report.time.days_between_first_and_last.is_none());
        assert!(report.time.avg_days_between_orders.is_none());

        assert!(report.shipping.by_method.is_empty());
    }

    #[test]
    fn test_single_untimestamped_pickup_order() {
        // One order: no createdAt, total 150, items of 2x24kg bags and one
        // explicit 10kg line, picked up at the warehouse.
        let doc = json!({
            "status": "completed",
            "totals": { "total": 150.0, "totalBags": 3 },
            "deliveryMethod": "pickup",
            "items": [
                { "varietyName": "Bourbon", "bags": 2, "bagKg": 24 },
                { "varietyName": "Geisha", "bags": 1, "lineKg": 10 }
            ]
        });
        let orders = vec![normalize_order(&doc)];
        let report = compute_order_stats(&orders);

        assert_eq!(report.basic.total_orders, 1);
        assert_eq!(report.volume.total_kg, 58.0);
        assert_eq!(report.financial.total_amount_gbp, 150.0);
        assert!(report.time.first_order_at.is_none());
        assert_eq!(report.shipping.by_method.len(), 1);
        assert_eq!(report.shipping.by_method[0].method, "pickup");
        assert_eq!(report.shipping.by_method[0].count, 1);
        assert_eq!(report.shipping.by_method[0].total_kg, 58.0);
    }

    #[test]
    fn test_same_month_orders_share_one_bucket() {
        let docs = vec![
            json!({
                "status": "completed",
                "createdAt": "2025-01-03T08:00:00Z",
                "totals": { "total": 100.0 }
            }),
            json!({
                "status": "completed",
                "createdAt": "2025-01-28T17:00:00Z",
                "totals": { "total": 200.0 }
            }),
        ];
        let orders: Vec<_> = docs.iter().map(normalize_order).collect();
        let report = compute_order_stats(&orders);

        assert_eq!(
            report.financial.spend_by_month,
            vec![MonthlySpend {
                month: "2025-01".into(),
                total_amount_gbp: 300.0
            }]
        );
        assert_eq!(
            report.time.order_count_by_month,
            vec![MonthlyCount {
                month: "2025-01".into(),
                count: 2
            }]
        );
    }

    #[test]
    fn test_ten_day_span_single_gap() {
        let docs = vec![
            json!({ "status": "completed", "createdAt": "1970-01-01T00:00:00Z" }),
            json!({ "status": "completed", "createdAt": "1970-01-11T00:00:00Z" }),
        ];
        let orders: Vec<_> = docs.iter().map(normalize_order).collect();
        let report = compute_order_stats(&orders);

        assert_eq!(report.time.days_between_first_and_last, Some(10.0));
        assert_eq!(report.time.avg_days_between_orders, Some(10.0));
    }

    #[test]
    fn test_interval_metrics_need_two_timestamps() {
        let docs = vec![
            json!({ "status": "completed", "createdAt": "2025-05-01T00:00:00Z" }),
            json!({ "status": "completed" }),
        ];
        let orders: Vec<_> = docs.iter().map(normalize_order).collect();
        let report = compute_order_stats(&orders);

        assert_eq!(report.basic.total_orders, 2);
        assert!(report.time.first_order_at.is_some());
        assert!(report.time.days_between_first_and_last.is_none());
        assert!(report.time.avg_days_between_orders.is_none());
    }

    #[test]
    fn test_avg_days_over_uneven_gaps() {
        let docs = vec![
            json!({ "createdAt": "1970-01-01T00:00:00Z" }),
            json!({ "createdAt": "1970-01-03T00:00:00Z" }),
            json!({ "createdAt": "1970-01-13T00:00:00Z" }),
        ];
        let orders: Vec<_> = docs.iter().map(normalize_order).collect();
        let report = compute_order_stats(&orders);

        // gaps of 2 and 10 days over two intervals
        assert_eq!(report.time.days_between_first_and_last, Some(12.0));
        assert_eq!(report.time.avg_days_between_orders, Some(6.0));
    }

    #[test]
    fn test_variety_partition_of_total_kg() {
        let docs = vec![
            json!({
                "items": [
                    { "varietyName": "Bourbon", "bags": 2 },
                    { "varietyName": "Geisha", "bags": 1, "lineKg": 10 }
                ]
            }),
            json!({
                "items": [
                    { "varietyName": "Bourbon", "bags": 1, "bagKg": 30 },
                    { "bags": 1 }
                ]
            }),
        ];
        let orders: Vec<_> = docs.iter().map(normalize_order).collect();
        let report = compute_order_stats(&orders);

        let variety_kg: f64 = report.volume.kg_by_variety.iter().map(|v| v.total_kg).sum();
        assert_eq!(variety_kg, report.volume.total_kg);
        assert_eq!(report.volume.total_kg, 48.0 + 10.0 + 30.0 + 24.0);
    }

    #[test]
    fn test_average_order_value() {
        let docs = vec![
            json!({ "totals": { "total": 120.0, "deliveryFee": 8.0 } }),
            json!({ "totals": { "total": 60.0, "deliveryFee": 4.0 } }),
            json!({ "totals": { "total": "free" } }),
        ];
        let orders: Vec<_> = docs.iter().map(normalize_order).collect();
        let report = compute_order_stats(&orders);

        assert_eq!(report.financial.total_amount_gbp, 180.0);
        assert_eq!(report.financial.avg_order_value_gbp, 60.0);
        assert_eq!(report.financial.avg_delivery_fee_gbp, 4.0);
    }

    #[test]
    fn test_month_buckets_sorted_ascending() {
        let docs = vec![
            json!({ "createdAt": "2025-11-01T00:00:00Z", "totals": { "total": 1.0 } }),
            json!({ "createdAt": "2024-02-01T00:00:00Z", "totals": { "total": 2.0 } }),
            json!({ "createdAt": "2025-02-01T00:00:00Z", "totals": { "total": 3.0 } }),
        ];
        let orders: Vec<_> = docs.iter().map(normalize_order).collect();
        let report = compute_order_stats(&orders);

        let months: Vec<&str> = report
            .time
            .order_count_by_month
            .iter()
            .map(|m| m.month.as_str())
            .collect();
        assert_eq!(months, vec!["2024-02", "2025-02", "2025-11"]);
        let spend_months: Vec<&str> = report
            .financial
            .spend_by_month
            .iter()
            .map(|m| m.month.as_str())
            .collect();
        assert_eq!(spend_months, months);
    }
}
