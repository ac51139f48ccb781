//! Agent and executive payment reports.

use crate::{
    error::AppResult,
    models::token::{Token, TokenStatus},
    repository::{tokens::ReportOwner, Repository},
};

/// Map the report `status` query parameter to a status filter.
/// "All", absence, and unknown values disable the filter.
fn map_status(param: Option<&str>) -> Option<TokenStatus> {
    match param {
        Some("Completed") => Some(TokenStatus::Completed),
        Some("Incomplete") => Some(TokenStatus::NotCompleted),
        _ => None,
    }
}

#[derive(Clone)]
pub struct ReportService {
    repository: Repository,
}

impl ReportService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Completed-or-dated work for one agent, oldest first.
    pub async fn agent_report(
        &self,
        agent: &str,
        status: Option<&str>,
        from_date: Option<&str>,
        to_date: Option<&str>,
    ) -> AppResult<Vec<Token>> {
        self.repository
            .tokens
            .report(ReportOwner::Agent, agent, map_status(status), from_date, to_date)
            .await
    }

    /// Completed-or-dated work for one executive, newest first.
    pub async fn executive_report(
        &self,
        executive: &str,
        status: Option<&str>,
        from_date: Option<&str>,
        to_date: Option<&str>,
    ) -> AppResult<Vec<Token>> {
        self.repository
            .tokens
            .report(
                ReportOwner::Executive,
                executive,
                map_status(status),
                from_date,
                to_date,
            )
            .await
    }
}
