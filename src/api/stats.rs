//! Order statistics endpoints
//!
//! The engine itself is authorization-agnostic: these handlers decide which
//! owner identity may be queried before invoking it. Both endpoints are
//! read-only and idempotent.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{error::AppResult, stats::OrderStatsResponse};

use super::AuthenticatedUser;

/// Get order statistics for the authenticated account
#[utoipa::path(
    get,
    path = "/orders/stats",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Order statistics for the caller's own account", body = OrderStatsResponse),
        (status = 500, description = "Statistics temporarily unavailable")
    )
)]
pub async fn get_my_order_stats(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<OrderStatsResponse>> {
    let stats = state.services.stats.order_stats_for_owner(&claims.sub).await?;
    Ok(Json(stats))
}

/// Get order statistics for an arbitrary account (administrators only)
#[utoipa::path(
    get,
    path = "/users/{user_id}/orders/stats",
    tag = "stats",
    security(("bearer_auth" = [])),
    params(
        ("user_id" = String, Path, description = "Owner identity to compute statistics for")
    ),
    responses(
        (status = 200, description = "Order statistics for the given account", body = OrderStatsResponse),
        (status = 403, description = "Insufficient permissions"),
        (status = 500, description = "Statistics temporarily unavailable")
    )
)]
pub async fn get_order_stats_for_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(user_id): Path<String>,
) -> AppResult<Json<OrderStatsResponse>> {
    // Querying another account requires the admin role; own account is fine
    if user_id != claims.sub {
        claims.require_admin()?;
    }

    let stats = state.services.stats.order_stats_for_owner(&user_id).await?;
    Ok(Json(stats))
}
