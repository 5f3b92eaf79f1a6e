//! Catalog summary service (the site's landing-page counters)

use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, models::book_instance::LoanStatus, repository::Repository};

/// Counts shown on the catalog home page
#[derive(Debug, Serialize, ToSchema)]
pub struct CatalogSummary {
    pub num_books: i64,
    pub num_instances: i64,
    pub num_instances_available: i64,
    pub num_authors: i64,
    pub num_genres: i64,
    /// Total visits to the summary page, persisted across restarts
    pub num_visits: i64,
}

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Gather the home-page counters, bumping the visit counter as a side
    /// effect of viewing them.
    pub async fn summary(&self) -> AppResult<CatalogSummary> {
        let num_books = self.repository.books.count().await?;
        let num_instances = self.repository.book_instances.count().await?;
        let num_instances_available = self
            .repository
            .book_instances
            .count_by_status(LoanStatus::Available)
            .await?;
        let num_authors = self.repository.authors.count().await?;
        let num_genres = self.repository.genres.count().await?;
        let num_visits = self.repository.stats.record_visit().await?;

        Ok(CatalogSummary {
            num_books,
            num_instances,
            num_instances_available,
            num_authors,
            num_genres,
            num_visits,
        })
    }
}
