//! Record normalizer
//!
//! Maps one raw order document to a fully-defaulted [`OrderRecord`]. Total
//! and side-effect-free: any missing field or type mismatch resolves to the
//! documented default, never an error. Data quality problems in a single
//! order must never abort a whole tenant's report.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::models::order::{
    OrderLine, OrderRecord, OrderStatus, OrderTotals, DEFAULT_BAG_KG, UNKNOWN_VARIETY,
};

/// Finite number or nothing. Strings holding digits are not parsed.
fn finite_f64(value: Option<&Value>) -> Option<f64> {
    value.and_then(Value::as_f64).filter(|n| n.is_finite())
}

fn f64_or_zero(value: Option<&Value>) -> f64 {
    finite_f64(value).unwrap_or(0.0)
}

fn i64_or_zero(value: Option<&Value>) -> i64 {
    value
        .and_then(Value::as_i64)
        .or_else(|| finite_f64(value).map(|n| n as i64))
        .unwrap_or(0)
}

fn str_or<'a>(value: Option<&'a Value>, default: &'a str) -> &'a str {
    value.and_then(Value::as_str).unwrap_or(default)
}

/// Parse a document timestamp: an RFC 3339 string or an epoch-millisecond
/// number. Anything else normalizes to "absent".
fn parse_timestamp(value: Option<&Value>) -> Option<DateTime<Utc>> {
    match value? {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(_) => {
            let millis = finite_f64(value)?;
            DateTime::from_timestamp_millis(millis as i64)
        }
        _ => None,
    }
}

fn normalize_line(raw: &Value) -> OrderLine {
    let bags = i64_or_zero(raw.get("bags"));
    let bag_kg = finite_f64(raw.get("bagKg")).unwrap_or(DEFAULT_BAG_KG);
    // An explicit lineKg (even zero) is trusted as-is; the bags * bagKg
    // fallback applies only when it is absent or non-numeric.
    let line_kg = finite_f64(raw.get("lineKg")).unwrap_or(bags as f64 * bag_kg);

    OrderLine {
        variety_name: str_or(raw.get("varietyName"), UNKNOWN_VARIETY).to_string(),
        bags,
        bag_kg,
        line_kg,
        line_subtotal_gbp: f64_or_zero(raw.get("lineSubtotal")),
    }
}

/// Normalize one raw order document into a fully-defaulted [`OrderRecord`].
pub fn normalize_order(raw: &Value) -> OrderRecord {
    let totals = raw.get("totals");

    OrderRecord {
        status: OrderStatus::canonicalize(str_or(raw.get("status"), "")),
        created_at: parse_timestamp(raw.get("createdAt")),
        preferred_delivery_date: parse_timestamp(raw.get("preferredDeliveryDate")),
        totals: OrderTotals {
            total_gbp: f64_or_zero(totals.and_then(|t| t.get("total"))),
            subtotal_gbp: f64_or_zero(totals.and_then(|t| t.get("subtotal"))),
            delivery_fee_gbp: f64_or_zero(totals.and_then(|t| t.get("deliveryFee"))),
            total_bags: i64_or_zero(totals.and_then(|t| t.get("totalBags"))),
        },
        delivery_method: str_or(raw.get("deliveryMethod"), "unknown").to_string(),
        items: raw
            .get("items")
            .and_then(Value::as_array)
            .map(|lines| lines.iter().map(normalize_line).collect())
            .unwrap_or_default(),
    }
}
