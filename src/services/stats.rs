//! Order statistics service
//!
//! Thin orchestration over the pure engine in [`crate::stats`]: fetch the
//! owner's raw order documents through the injected [`OrderSource`],
//! normalize, aggregate, assemble. The service performs no authorization;
//! the request-handling layer decides which owner id may be queried.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::OrderRecord,
    stats::{compute_order_stats, normalize_order, OrderStatsResponse},
};

/// Collaborator interface to the order document store.
///
/// A fetch failure propagates untouched: no retry, no partial report.
#[async_trait]
pub trait OrderSource: Send + Sync {
    /// All order documents belonging to the given owner identity, in no
    /// particular order.
    async fn fetch_orders_by_owner(&self, owner_id: &str) -> AppResult<Vec<serde_json::Value>>;
}

#[derive(Clone)]
pub struct StatsService {
    orders: Arc<dyn OrderSource>,
}

impl StatsService {
    pub fn new(orders: Arc<dyn OrderSource>) -> Self {
        Self { orders }
    }

    /// Compute the full stats report for one owner from the current state of
    /// the order store. Built fresh on every call, never cached.
    pub async fn order_stats_for_owner(&self, owner_id: &str) -> AppResult<OrderStatsResponse> {
        let documents = self.orders.fetch_orders_by_owner(owner_id).await?;
        let records: Vec<OrderRecord> = documents.iter().map(normalize_order).collect();
        tracing::debug!(owner_id, orders = records.len(), "aggregating order stats");
        Ok(compute_order_stats(&records))
    }
}
