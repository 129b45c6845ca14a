//! Order document store access
//!
//! Orders are kept as JSONB documents in the `orders` table, keyed by owner.
//! Documents come back as raw `serde_json::Value`; the stats engine's
//! normalizer owns all defaulting, so no typed decoding happens here.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{error::AppResult, services::stats::OrderSource};

#[derive(Clone)]
pub struct OrdersRepository {
    pool: Pool<Postgres>,
}

impl OrdersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Fetch every order document owned by the given account.
    pub async fn fetch_by_owner(&self, owner_id: &str) -> AppResult<Vec<serde_json::Value>> {
        let documents = sqlx::query_scalar::<_, serde_json::Value>(
            "SELECT document FROM orders WHERE owner_id = $1",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(documents)
    }
}

#[async_trait]
impl OrderSource for OrdersRepository {
    async fn fetch_orders_by_owner(&self, owner_id: &str) -> AppResult<Vec<serde_json::Value>> {
        self.fetch_by_owner(owner_id).await
    }
}
