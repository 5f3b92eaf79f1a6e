//! Genres repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::genre::{CreateGenre, Genre},
};

#[derive(Clone)]
pub struct GenresRepository {
    pool: Pool<Postgres>,
}

impl GenresRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all genres ordered by name
    pub async fn list(&self) -> AppResult<Vec<Genre>> {
        let genres = sqlx::query_as::<_, Genre>("SELECT * FROM genres ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(genres)
    }

    /// Create a new genre
    pub async fn create(&self, genre: &CreateGenre) -> AppResult<Genre> {
        let created =
            sqlx::query_as::<_, Genre>("INSERT INTO genres (name) VALUES ($1) RETURNING *")
                .bind(&genre.name)
                .fetch_one(&self.pool)
                .await?;
        Ok(created)
    }

    /// Count all genres
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM genres")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
