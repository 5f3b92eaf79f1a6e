//! Business logic services

pub mod auth;
pub mod catalog;
pub mod loans;
pub mod stats;

use crate::{config::AuthConfig, repository::Repository};

/// Row offset for a 1-based page number. Page numbers below 1 are clamped
/// to the first page; pages past the end simply select no rows. The page
/// number comes straight from the query string, so the multiplication
/// saturates instead of overflowing on absurd values.
pub(crate) fn page_offset(page: i64, per_page: i64) -> i64 {
    (page.max(1) - 1).saturating_mul(per_page)
}

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    pub loans: loans::LoansService,
    pub stats: stats::StatsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        Self {
            auth: auth::AuthService::new(repository.clone(), auth_config),
            catalog: catalog::CatalogService::new(repository.clone()),
            loans: loans::LoansService::new(repository.clone()),
            stats: stats::StatsService::new(repository),
        }
    }
}
