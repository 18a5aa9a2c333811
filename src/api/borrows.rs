//! Borrow record endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::borrow::{BorrowDetails, BorrowRecord},
};

use super::AuthenticatedUser;

/// Return response with the closed record
#[derive(Serialize, ToSchema)]
pub struct ReturnResponse {
    /// Return status
    pub status: String,
    /// Closed borrow record
    pub record: BorrowRecord,
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/borrows/{id}/return",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Borrow record ID")
    ),
    responses(
        (status = 200, description = "Book returned", body = ReturnResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Record belongs to another user"),
        (status = 404, description = "Record not found"),
        (status = 409, description = "Already returned")
    )
)]
pub async fn return_borrow(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(borrow_id): Path<i32>,
) -> AppResult<Json<ReturnResponse>> {
    let record = state
        .services
        .borrows
        .return_book(claims.user_id, borrow_id)
        .await?;

    Ok(Json(ReturnResponse {
        status: "returned".to_string(),
        record,
    }))
}

/// The caller's borrow history. Overdue statuses are refreshed on read.
#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "borrows",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Borrowed and returned records", body = Vec<BorrowDetails>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn dashboard(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<BorrowDetails>>> {
    let records = state.services.borrows.dashboard(claims.user_id).await?;
    Ok(Json(records))
}
