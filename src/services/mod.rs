//! Business logic services

pub mod export;
pub mod reports;
pub mod tokens;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub tokens: tokens::TokenService,
    pub reports: reports::ReportService,
    pub export: export::ExportService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            tokens: tokens::TokenService::new(repository.clone()),
            reports: reports::ReportService::new(repository.clone()),
            export: export::ExportService::new(repository),
        }
    }
}
