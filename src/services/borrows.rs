//! Borrowing rule engine.
//!
//! The only entry point for copy-counter mutations: handlers call into this
//! service, which delegates to the transactional repository operations. No
//! other layer touches `available_copies`.

use crate::{
    error::AppResult,
    models::borrow::{BorrowDetails, BorrowRecord},
    repository::Repository,
};

#[derive(Clone)]
pub struct BorrowsService {
    repository: Repository,
}

impl BorrowsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Borrow a book for a user
    pub async fn borrow_book(&self, user_id: i32, book_id: i32) -> AppResult<BorrowRecord> {
        // Verify user exists
        self.repository.users.get_by_id(user_id).await?;
        let record = self.repository.borrows.create(user_id, book_id).await?;
        tracing::info!(
            "Borrow: user={} book={} due={}",
            user_id,
            book_id,
            record.due_date
        );
        Ok(record)
    }

    /// Return a borrowed book
    pub async fn return_book(&self, user_id: i32, borrow_id: i32) -> AppResult<BorrowRecord> {
        let record = self
            .repository
            .borrows
            .return_record(borrow_id, user_id)
            .await?;
        tracing::info!("Return: user={} record={}", user_id, borrow_id);
        Ok(record)
    }

    /// A user's full borrow history for the dashboard.
    /// Overdue statuses are refreshed first; the transition is lazy, there is
    /// no background scheduler.
    pub async fn dashboard(&self, user_id: i32) -> AppResult<Vec<BorrowDetails>> {
        let transitioned = self.repository.borrows.refresh_overdue().await?;
        if transitioned > 0 {
            tracing::info!("Marked {} borrow record(s) overdue", transitioned);
        }
        self.repository.borrows.list_for_user(user_id).await
    }
}
