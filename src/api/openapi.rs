//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, borrows, health, stats};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Libris API",
        version = "1.0.0",
        description = "Library Management System REST API",
        license(name = "MIT")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::register,
        auth::login,
        auth::logout,
        auth::me,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::borrow_book,
        // Borrows
        borrows::return_borrow,
        borrows::dashboard,
        // Stats
        stats::get_stats,
        stats::get_librarian_stats,
    ),
    components(
        schemas(
            // Auth
            crate::models::user::User,
            crate::models::user::UserProfile,
            crate::models::user::RegisterRequest,
            crate::models::user::LoginRequest,
            auth::RegisterResponse,
            auth::LoginResponse,
            auth::MeResponse,
            auth::LogoutResponse,
            // Books
            crate::models::book::Book,
            crate::models::book::Category,
            crate::models::book::BookQuery,
            crate::models::book::CreateBook,
            books::BookDetail,
            books::BorrowResponse,
            // Borrows
            crate::models::borrow::BorrowRecord,
            crate::models::borrow::BorrowStatus,
            crate::models::borrow::BorrowDetails,
            borrows::ReturnResponse,
            // Stats
            stats::HomeStats,
            stats::LibrarianStats,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration and authentication"),
        (name = "books", description = "Book catalog"),
        (name = "borrows", description = "Borrow and return lifecycle"),
        (name = "stats", description = "Statistics")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
