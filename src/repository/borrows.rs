//! Borrow records repository for database operations.
//!
//! Borrow and return each pair a counter mutation with a record transition.
//! Both run inside a single transaction holding a row lock on the book, so
//! the availability check and the write cannot interleave across requests.

use chrono::Utc;
use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::borrow::{BorrowDetails, BorrowRecord, BorrowStatus},
};

#[derive(Clone)]
pub struct BorrowsRepository {
    pool: Pool<Postgres>,
}

impl BorrowsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get borrow record by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<BorrowRecord> {
        sqlx::query_as::<_, BorrowRecord>("SELECT * FROM borrow_records WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrow record with id {} not found", id)))
    }

    /// Borrow a book: create the record and take one copy off the shelf.
    pub async fn create(&self, user_id: i32, book_id: i32) -> AppResult<BorrowRecord> {
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        // Lock the book row so the availability check holds until commit
        let book_row = sqlx::query(
            "SELECT available_copies, total_copies FROM books WHERE id = $1 FOR UPDATE",
        )
        .bind(book_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", book_id)))?;

        let available_copies: i32 = book_row.get("available_copies");
        if available_copies <= 0 {
            return Err(AppError::NotAvailable(
                "No copies of this book are currently available".to_string(),
            ));
        }

        // One active loan per (user, book)
        let already_borrowed: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM borrow_records
                WHERE user_id = $1 AND book_id = $2 AND status = 'borrowed'
            )
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_one(&mut *tx)
        .await?;

        if already_borrowed {
            return Err(AppError::Conflict(
                "You have already borrowed this book".to_string(),
            ));
        }

        let record = sqlx::query_as::<_, BorrowRecord>(
            r#"
            INSERT INTO borrow_records (user_id, book_id, borrow_date, due_date, status)
            VALUES ($1, $2, $3, $4, 'borrowed')
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .bind(now)
        .bind(BorrowRecord::due_date_from(now))
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE books SET available_copies = available_copies - 1 WHERE id = $1")
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(record)
    }

    /// Return a borrowed book: close the record and put the copy back,
    /// never exceeding the book's total.
    pub async fn return_record(&self, borrow_id: i32, user_id: i32) -> AppResult<BorrowRecord> {
        let today = Utc::now().date_naive();

        let mut tx = self.pool.begin().await?;

        let record = sqlx::query_as::<_, BorrowRecord>(
            "SELECT * FROM borrow_records WHERE id = $1 FOR UPDATE",
        )
        .bind(borrow_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Borrow record with id {} not found", borrow_id))
        })?;

        if record.user_id != user_id {
            return Err(AppError::Authorization(
                "This borrow record belongs to another user".to_string(),
            ));
        }

        if record.status == BorrowStatus::Returned {
            return Err(AppError::Conflict("Book already returned".to_string()));
        }

        let updated = sqlx::query_as::<_, BorrowRecord>(
            r#"
            UPDATE borrow_records
            SET return_date = $1, status = 'returned'
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(today)
        .bind(borrow_id)
        .fetch_one(&mut *tx)
        .await?;

        // Clamp at total_copies so a stray double-increment can never overfill
        sqlx::query(
            r#"
            UPDATE books
            SET available_copies = LEAST(available_copies + 1, total_copies)
            WHERE id = $1
            "#,
        )
        .bind(record.book_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(updated)
    }

    /// Mark unreturned records past their due date as overdue.
    /// Idempotent; returns the number of records transitioned.
    pub async fn refresh_overdue(&self) -> AppResult<u64> {
        let today = Utc::now().date_naive();

        let result = sqlx::query(
            r#"
            UPDATE borrow_records
            SET status = 'overdue'
            WHERE status = 'borrowed' AND return_date IS NULL AND due_date < $1
            "#,
        )
        .bind(today)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// All borrow records for a user with book details, newest first
    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<BorrowDetails>> {
        let rows = sqlx::query(
            r#"
            SELECT r.id, r.book_id, r.borrow_date, r.due_date, r.return_date, r.status,
                   b.title, b.author, b.isbn, b.category
            FROM borrow_records r
            JOIN books b ON r.book_id = b.id
            WHERE r.user_id = $1
            ORDER BY r.borrow_date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let today = Utc::now().date_naive();

        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            let due_date: chrono::NaiveDate = row.get("due_date");
            let return_date: Option<chrono::NaiveDate> = row.get("return_date");
            result.push(BorrowDetails {
                id: row.get("id"),
                book_id: row.get("book_id"),
                title: row.get("title"),
                author: row.get("author"),
                isbn: row.get("isbn"),
                category: row.get("category"),
                borrow_date: row.get("borrow_date"),
                due_date,
                return_date,
                status: row.get("status"),
                is_overdue: return_date.is_none() && due_date < today,
            });
        }

        Ok(result)
    }

    /// Count records currently marked borrowed
    pub async fn count_borrowed(&self) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM borrow_records WHERE status = 'borrowed'")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Count loans still out, overdue or not
    pub async fn count_active(&self) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM borrow_records WHERE return_date IS NULL")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Count unreturned loans past their due date
    pub async fn count_overdue(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM borrow_records WHERE return_date IS NULL AND due_date < $1",
        )
        .bind(Utc::now().date_naive())
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Count loans returned today
    pub async fn count_returned_today(&self) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM borrow_records WHERE return_date = $1")
                .bind(Utc::now().date_naive())
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}
