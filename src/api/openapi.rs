//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{export, health, reports, tokens};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tokendesk API",
        version = "1.0.0",
        description = "Service token tracking REST API"
    ),
    servers(
        (url = "/api", description = "API root")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Tokens
        tokens::list_tokens,
        tokens::create_token,
        tokens::update_token,
        tokens::delete_token,
        tokens::list_agents,
        tokens::list_executives,
        tokens::bulk_operations,
        // Reports
        reports::agent_report,
        reports::executive_report,
        // Export
        export::export_tokens,
    ),
    components(
        schemas(
            crate::models::token::Token,
            crate::models::token::TokenInput,
            crate::models::token::TokenFilter,
            crate::models::token::TokenStatus,
            crate::models::token::BulkRequest,
            tokens::CreateResponse,
            tokens::MutationResponse,
            tokens::BulkResponse,
            reports::AgentReportQuery,
            reports::ExecutiveReportQuery,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "tokens", description = "Token record management"),
        (name = "reports", description = "Agent and executive payment reports"),
        (name = "export", description = "CSV export")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
