//! CSV export endpoint

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
};

use crate::error::AppResult;

/// Download the full token table as CSV
#[utoipa::path(
    get,
    path = "/export",
    tag = "export",
    responses(
        (status = 200, description = "CSV attachment, UTF-8 with BOM", content_type = "text/csv")
    )
)]
pub async fn export_tokens(
    State(state): State<crate::AppState>,
) -> AppResult<impl IntoResponse> {
    let (filename, body) = state.services.export.export_csv().await?;

    let headers = [
        (
            header::CONTENT_TYPE,
            "text/csv; charset=utf-8".to_string(),
        ),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ),
    ];

    Ok((headers, body))
}
