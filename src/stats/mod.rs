//! Order statistics aggregation engine
//!
//! A pure, synchronous pipeline over an already-fetched sequence of order
//! documents: [`normalize`] turns each loosely-typed document into an
//! [`OrderRecord`](crate::models::OrderRecord), [`aggregate`] folds the
//! sequence into running accumulators across five independent dimensions,
//! and [`report`] derives averages and interval metrics into the final
//! response shape. No I/O, no shared state between invocations.

pub mod aggregate;
pub mod normalize;
pub mod report;

pub use aggregate::OrderAccumulator;
pub use normalize::normalize_order;
pub use report::OrderStatsResponse;

use crate::models::OrderRecord;

/// Fold a sequence of normalized orders into a complete stats report.
///
/// Iteration order does not affect the result; all combining operations are
/// commutative sums, counts and min/max. An empty sequence yields the
/// fully-shaped all-zero report.
pub fn compute_order_stats<'a, I>(orders: I) -> OrderStatsResponse
where
    I: IntoIterator<Item = &'a OrderRecord>,
{
    let mut acc = OrderAccumulator::new();
    for order in orders {
        acc.add(order);
    }
    acc.finish()
}
