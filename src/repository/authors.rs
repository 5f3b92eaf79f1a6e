//! Authors repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, CreateAuthor, UpdateAuthor},
        book::Book,
    },
};

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get author by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Author> {
        sqlx::query_as::<_, Author>("SELECT * FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author with id {} not found", id)))
    }

    /// List authors ordered by last name, one page at a time
    pub async fn list(&self, offset: i64, limit: i64) -> AppResult<(Vec<Author>, i64)> {
        let authors = sqlx::query_as::<_, Author>(
            "SELECT * FROM authors ORDER BY last_name, first_name, id OFFSET $1 LIMIT $2",
        )
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(&self.pool)
            .await?;

        Ok((authors, total))
    }

    /// Books written by an author, ordered by title
    pub async fn books_by_author(&self, author_id: i32) -> AppResult<Vec<Book>> {
        let books =
            sqlx::query_as::<_, Book>("SELECT * FROM books WHERE author_id = $1 ORDER BY title")
                .bind(author_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(books)
    }

    /// Create a new author
    pub async fn create(&self, author: &CreateAuthor) -> AppResult<Author> {
        let created = sqlx::query_as::<_, Author>(
            r#"
            INSERT INTO authors (first_name, last_name, language, date_of_birth, date_of_death)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&author.first_name)
        .bind(&author.last_name)
        .bind(&author.language)
        .bind(author.date_of_birth)
        .bind(author.date_of_death)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Update an existing author
    pub async fn update(&self, id: i32, update: &UpdateAuthor) -> AppResult<Author> {
        let updated = sqlx::query_as::<_, Author>(
            r#"
            UPDATE authors
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                language = COALESCE($4, language),
                date_of_birth = COALESCE($5, date_of_birth),
                date_of_death = COALESCE($6, date_of_death)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&update.first_name)
        .bind(&update.last_name)
        .bind(&update.language)
        .bind(update.date_of_birth)
        .bind(update.date_of_death)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Author with id {} not found", id)))?;

        Ok(updated)
    }

    /// Delete an author. Dependent books keep existing with a null author
    /// reference (ON DELETE SET NULL in the schema).
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Author with id {} not found",
                id
            )));
        }
        Ok(())
    }

    /// Count all authors
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
