//! Book instances (physical copies) repository for database operations

use chrono::{NaiveDate, Utc};
use sqlx::{postgres::PgRow, Pool, Postgres, Row};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        book_instance::{BookInstance, BookInstanceDetails, CreateBookInstance, LoanStatus},
        user::UserShort,
    },
};

#[derive(Clone)]
pub struct BookInstancesRepository {
    pool: Pool<Postgres>,
}

fn details_from_row(row: &PgRow, today: NaiveDate) -> Result<BookInstanceDetails, sqlx::Error> {
    let due_back: Option<NaiveDate> = row.try_get("due_back")?;
    let borrower_id: Option<i32> = row.try_get("borrower_id")?;

    let borrower = match borrower_id {
        Some(id) => Some(UserShort {
            id,
            username: row.try_get("borrower_username")?,
            first_name: row.try_get("borrower_first_name")?,
            last_name: row.try_get("borrower_last_name")?,
        }),
        None => None,
    };

    Ok(BookInstanceDetails {
        id: row.try_get("id")?,
        book_id: row.try_get("book_id")?,
        book_title: row.try_get("book_title")?,
        imprint: row.try_get("imprint")?,
        due_back,
        status: row.try_get("status")?,
        borrower,
        // Derived on every read. An absent due date is excluded from the
        // comparison entirely.
        is_overdue: due_back.map(|d| d < today).unwrap_or(false),
    })
}

const DETAILS_SELECT: &str = r#"
    SELECT bi.id, bi.book_id, bi.imprint, bi.due_back, bi.status, bi.borrower_id,
           b.title as book_title,
           u.username as borrower_username,
           u.first_name as borrower_first_name,
           u.last_name as borrower_last_name
    FROM book_instances bi
    JOIN books b ON bi.book_id = b.id
    LEFT JOIN users u ON bi.borrower_id = u.id
"#;

impl BookInstancesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book instance by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<BookInstance> {
        sqlx::query_as::<_, BookInstance>("SELECT * FROM book_instances WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))
    }

    /// All copies of one book, for the book detail page
    pub async fn copies_of_book(&self, book_id: i32) -> AppResult<Vec<BookInstanceDetails>> {
        let query = format!(
            "{} WHERE bi.book_id = $1 ORDER BY bi.due_back ASC NULLS LAST, bi.id",
            DETAILS_SELECT
        );
        let rows = sqlx::query(&query).bind(book_id).fetch_all(&self.pool).await?;

        let today = Utc::now().date_naive();
        rows.iter()
            .map(|row| details_from_row(row, today))
            .collect::<Result<Vec<_>, _>>()
            .map_err(AppError::from)
    }

    /// Copies on loan to one borrower, ordered by due date
    pub async fn loans_for_borrower(
        &self,
        borrower_id: i32,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<BookInstanceDetails>, i64)> {
        let query = format!(
            r#"{} WHERE bi.borrower_id = $1 AND bi.status = 'o'
            ORDER BY bi.due_back ASC NULLS LAST, bi.id
            OFFSET $2 LIMIT $3"#,
            DETAILS_SELECT
        );
        let rows = sqlx::query(&query)
            .bind(borrower_id)
            .bind(offset)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM book_instances WHERE borrower_id = $1 AND status = 'o'",
        )
        .bind(borrower_id)
        .fetch_one(&self.pool)
        .await?;

        let today = Utc::now().date_naive();
        let details = rows
            .iter()
            .map(|row| details_from_row(row, today))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((details, total))
    }

    /// All copies on loan regardless of borrower, ordered by due date
    pub async fn all_loans(
        &self,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<BookInstanceDetails>, i64)> {
        let query = format!(
            r#"{} WHERE bi.status = 'o'
            ORDER BY bi.due_back ASC NULLS LAST, bi.id
            OFFSET $1 LIMIT $2"#,
            DETAILS_SELECT
        );
        let rows = sqlx::query(&query)
            .bind(offset)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM book_instances WHERE status = 'o'")
                .fetch_one(&self.pool)
                .await?;

        let today = Utc::now().date_naive();
        let details = rows
            .iter()
            .map(|row| details_from_row(row, today))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((details, total))
    }

    /// Create a new copy of a book. The id is generated here and never reused.
    pub async fn create(
        &self,
        book_id: i32,
        instance: &CreateBookInstance,
    ) -> AppResult<BookInstance> {
        let created = sqlx::query_as::<_, BookInstance>(
            r#"
            INSERT INTO book_instances (id, book_id, imprint, status)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(book_id)
        .bind(&instance.imprint)
        .bind(instance.status.unwrap_or_default())
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Write an accepted renewal date onto a copy
    pub async fn set_due_back(&self, id: Uuid, due_back: NaiveDate) -> AppResult<BookInstance> {
        sqlx::query_as::<_, BookInstance>(
            "UPDATE book_instances SET due_back = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(due_back)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))
    }

    /// Put a copy on loan to a borrower
    pub async fn checkout(
        &self,
        id: Uuid,
        borrower_id: i32,
        due_back: NaiveDate,
    ) -> AppResult<BookInstance> {
        sqlx::query_as::<_, BookInstance>(
            r#"
            UPDATE book_instances
            SET status = 'o', borrower_id = $2, due_back = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(borrower_id)
        .bind(due_back)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))
    }

    /// Mark a copy returned: back on the shelf, no borrower, no due date
    pub async fn mark_returned(&self, id: Uuid) -> AppResult<BookInstance> {
        sqlx::query_as::<_, BookInstance>(
            r#"
            UPDATE book_instances
            SET status = 'a', borrower_id = NULL, due_back = NULL
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))
    }

    /// Delete a copy
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM book_instances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book instance {} not found", id)));
        }
        Ok(())
    }

    /// Count all copies
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count copies currently available on the shelf
    pub async fn count_by_status(&self, status: LoanStatus) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM book_instances WHERE status = $1")
                .bind(status)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}
