//! Payment report endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::token::Token,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct AgentReportQuery {
    pub agent: Option<String>,
    pub status: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ExecutiveReportQuery {
    pub executive: Option<String>,
    pub status: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
}

/// Per-agent payment report
#[utoipa::path(
    get,
    path = "/reports/agent",
    tag = "reports",
    params(
        ("agent" = String, Query, description = "Agent name (required)"),
        ("status" = Option<String>, Query, description = "'Completed', 'Incomplete' or 'All'"),
        ("from_date" = Option<String>, Query, description = "Completion range start, YYYY-MM-DD"),
        ("to_date" = Option<String>, Query, description = "Completion range end, YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Completed work for the agent, oldest first", body = Vec<Token>),
        (status = 400, description = "Agent parameter missing")
    )
)]
pub async fn agent_report(
    State(state): State<crate::AppState>,
    Query(query): Query<AgentReportQuery>,
) -> AppResult<Json<Vec<Token>>> {
    let agent = query
        .agent
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("Agent parameter required".to_string()))?;

    let tokens = state
        .services
        .reports
        .agent_report(
            agent,
            query.status.as_deref(),
            query.from_date.as_deref(),
            query.to_date.as_deref(),
        )
        .await?;
    Ok(Json(tokens))
}

/// Per-executive payment report
#[utoipa::path(
    get,
    path = "/reports/executive",
    tag = "reports",
    params(
        ("executive" = String, Query, description = "Executive name (required)"),
        ("status" = Option<String>, Query, description = "'Completed', 'Incomplete' or 'All'"),
        ("from_date" = Option<String>, Query, description = "Completion range start, YYYY-MM-DD"),
        ("to_date" = Option<String>, Query, description = "Completion range end, YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Completed work for the executive, newest first", body = Vec<Token>),
        (status = 400, description = "Executive parameter missing")
    )
)]
pub async fn executive_report(
    State(state): State<crate::AppState>,
    Query(query): Query<ExecutiveReportQuery>,
) -> AppResult<Json<Vec<Token>>> {
    let executive = query
        .executive
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("Executive parameter required".to_string()))?;

    let tokens = state
        .services
        .reports
        .executive_report(
            executive,
            query.status.as_deref(),
            query.from_date.as_deref(),
            query.to_date.as_deref(),
        )
        .await?;
    Ok(Json(tokens))
}
