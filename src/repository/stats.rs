//! Site visit counter repository

use sqlx::{Pool, Postgres};

use crate::error::AppResult;

#[derive(Clone)]
pub struct StatsRepository {
    pool: Pool<Postgres>,
}

impl StatsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Increment the site visit counter and return the new total
    pub async fn record_visit(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO site_visits (id, count) VALUES (1, 1)
            ON CONFLICT (id) DO UPDATE SET count = site_visits.count + 1
            RETURNING count
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
