//! Statistics endpoints

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppResult;

use super::AuthenticatedUser;

/// Homepage statistics
#[derive(Serialize, ToSchema)]
pub struct HomeStats {
    /// Number of books in the catalog
    pub total_books: i64,
    /// Books with at least one copy on the shelf
    pub available_books: i64,
    /// Registered users
    pub total_users: i64,
    /// Records currently marked borrowed
    pub total_borrowed: i64,
}

/// Librarian dashboard aggregates
#[derive(Serialize, ToSchema)]
pub struct LibrarianStats {
    /// Number of books in the catalog
    pub total_books: i64,
    /// Copies held across the catalog
    pub total_copies: i64,
    /// Copies currently on the shelf
    pub available_copies: i64,
    /// Registered users
    pub total_users: i64,
    /// Users with librarian privileges
    pub librarians: i64,
    /// Loans still out
    pub active_borrows: i64,
    /// Unreturned loans past their due date
    pub overdue_borrows: i64,
    /// Loans returned today
    pub returned_today: i64,
}

/// Get homepage statistics
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    responses(
        (status = 200, description = "Homepage statistics", body = HomeStats)
    )
)]
pub async fn get_stats(
    State(state): State<crate::AppState>,
) -> AppResult<Json<HomeStats>> {
    let stats = state.services.stats.home_stats().await?;
    Ok(Json(stats))
}

/// Get librarian dashboard aggregates
#[utoipa::path(
    get,
    path = "/librarian",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Aggregate counts", body = LibrarianStats),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Librarian privileges required")
    )
)]
pub async fn get_librarian_stats(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<LibrarianStats>> {
    claims.require_librarian()?;

    let stats = state.services.stats.librarian_stats().await?;
    Ok(Json(stats))
}
