//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{health, stats};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Cascara API",
        version = "1.0.0",
        description = "Coffee Trading Portal REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html"),
        contact(name = "Cascara Team", email = "dev@cascara.coffee")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Stats
        stats::get_my_order_stats,
        stats::get_order_stats_for_user,
    ),
    components(
        schemas(
            crate::stats::report::OrderStatsResponse,
            crate::stats::report::BasicStats,
            crate::stats::report::VolumeStats,
            crate::stats::report::VarietyBreakdown,
            crate::stats::report::FinancialStats,
            crate::stats::report::VarietySpend,
            crate::stats::report::MonthlySpend,
            crate::stats::report::MonthlyCount,
            crate::stats::report::TimeStats,
            crate::stats::report::ShippingStats,
            crate::stats::report::MethodBreakdown,
            crate::error::ErrorResponse,
            health::HealthResponse,
        )
    ),
    tags(
        (name = "health", description = "Service health"),
        (name = "stats", description = "Order statistics")
    )
)]
pub struct ApiDoc;

/// Create a router serving the Swagger UI and the raw OpenAPI document
pub fn create_openapi_router() -> Router {
    Router::new().merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
