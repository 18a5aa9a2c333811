//! Statistics service

use crate::{
    api::stats::{HomeStats, LibrarianStats},
    error::AppResult,
    repository::Repository,
};

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Homepage counters: catalog size, availability, members, loans out
    pub async fn home_stats(&self) -> AppResult<HomeStats> {
        Ok(HomeStats {
            total_books: self.repository.books.count_all().await?,
            available_books: self.repository.books.count_available().await?,
            total_users: self.repository.users.count_all().await?,
            total_borrowed: self.repository.borrows.count_borrowed().await?,
        })
    }

    /// Aggregate counts for the librarian dashboard
    pub async fn librarian_stats(&self) -> AppResult<LibrarianStats> {
        let (total_copies, available_copies) = self.repository.books.copy_totals().await?;

        Ok(LibrarianStats {
            total_books: self.repository.books.count_all().await?,
            total_copies,
            available_copies,
            total_users: self.repository.users.count_all().await?,
            librarians: self.repository.users.count_librarians().await?,
            active_borrows: self.repository.borrows.count_active().await?,
            overdue_borrows: self.repository.borrows.count_overdue().await?,
            returned_today: self.repository.borrows.count_returned_today().await?,
        })
    }
}
