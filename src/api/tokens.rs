//! Token CRUD, distinct-name lookups and bulk operation endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::token::{BulkRequest, Token, TokenFilter, TokenInput},
};

/// Response for a successful create
#[derive(Serialize, ToSchema)]
pub struct CreateResponse {
    pub success: bool,
    /// Id assigned by the store
    pub id: i64,
}

/// Response for a successful update or delete
#[derive(Serialize, ToSchema)]
pub struct MutationResponse {
    pub success: bool,
}

/// Response for a bulk operation
#[derive(Serialize, ToSchema)]
pub struct BulkResponse {
    pub success: bool,
    /// Number of ids submitted (not necessarily mutated)
    pub processed: usize,
}

/// List tokens with optional filters
#[utoipa::path(
    get,
    path = "/tokens",
    tag = "tokens",
    params(
        ("location" = Option<String>, Query, description = "Exact location, case-insensitive ('All' = no filter)"),
        ("status" = Option<String>, Query, description = "Exact status, case-insensitive ('All' = no filter)"),
        ("search" = Option<String>, Query, description = "Substring over token, client name, contact, sub-location"),
        ("agent" = Option<String>, Query, description = "Exact agent name ('All' = no filter)"),
        ("executive" = Option<String>, Query, description = "Exact executive name ('All' = no filter)"),
        ("from_date" = Option<String>, Query, description = "Range start, YYYY-MM-DD (needs to_date)"),
        ("to_date" = Option<String>, Query, description = "Range end, YYYY-MM-DD (needs from_date)")
    ),
    responses(
        (status = 200, description = "Matching tokens, most recent first", body = Vec<Token>)
    )
)]
pub async fn list_tokens(
    State(state): State<crate::AppState>,
    Query(filter): Query<TokenFilter>,
) -> AppResult<Json<Vec<Token>>> {
    let tokens = state.services.tokens.list(&filter).await?;
    Ok(Json(tokens))
}

/// Create a token
#[utoipa::path(
    post,
    path = "/tokens",
    tag = "tokens",
    request_body = TokenInput,
    responses(
        (status = 200, description = "Token created", body = CreateResponse),
        (status = 400, description = "Invalid field value")
    )
)]
pub async fn create_token(
    State(state): State<crate::AppState>,
    Json(input): Json<TokenInput>,
) -> AppResult<Json<CreateResponse>> {
    let id = state.services.tokens.create(&input).await?;
    Ok(Json(CreateResponse { success: true, id }))
}

/// Update a token (full-record replace)
#[utoipa::path(
    put,
    path = "/tokens/{id}",
    tag = "tokens",
    params(("id" = i64, Path, description = "Token ID")),
    request_body = TokenInput,
    responses(
        (status = 200, description = "Token updated", body = MutationResponse),
        (status = 404, description = "Token not found")
    )
)]
pub async fn update_token(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
    Json(input): Json<TokenInput>,
) -> AppResult<Json<MutationResponse>> {
    state.services.tokens.update(id, &input).await?;
    Ok(Json(MutationResponse { success: true }))
}

/// Delete a token (idempotent)
#[utoipa::path(
    delete,
    path = "/tokens/{id}",
    tag = "tokens",
    params(("id" = i64, Path, description = "Token ID")),
    responses(
        (status = 200, description = "Token deleted", body = MutationResponse)
    )
)]
pub async fn delete_token(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MutationResponse>> {
    state.services.tokens.delete(id).await?;
    Ok(Json(MutationResponse { success: true }))
}

/// Distinct agent names
#[utoipa::path(
    get,
    path = "/agents",
    tag = "tokens",
    responses(
        (status = 200, description = "Sorted distinct agent names", body = Vec<String>)
    )
)]
pub async fn list_agents(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<String>>> {
    let agents = state.services.tokens.agents().await?;
    Ok(Json(agents))
}

/// Distinct executive names
#[utoipa::path(
    get,
    path = "/executives",
    tag = "tokens",
    responses(
        (status = 200, description = "Sorted distinct executive names", body = Vec<String>)
    )
)]
pub async fn list_executives(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<String>>> {
    let executives = state.services.tokens.executives().await?;
    Ok(Json(executives))
}

/// Apply a bulk status/payment operation to a set of ids
#[utoipa::path(
    post,
    path = "/bulk-operations",
    tag = "tokens",
    request_body = BulkRequest,
    responses(
        (status = 200, description = "Operation applied", body = BulkResponse),
        (status = 400, description = "Missing or unknown operation, or empty id list")
    )
)]
pub async fn bulk_operations(
    State(state): State<crate::AppState>,
    Json(request): Json<BulkRequest>,
) -> AppResult<Json<BulkResponse>> {
    let processed = state
        .services
        .tokens
        .bulk_apply(&request.operation, &request.ids)
        .await?;
    Ok(Json(BulkResponse {
        success: true,
        processed,
    }))
}
