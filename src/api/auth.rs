//! Registration and authentication endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::user::{LoginRequest, RegisterRequest, User, UserProfile},
};

use super::AuthenticatedUser;

/// Registration response
#[derive(Serialize, ToSchema)]
pub struct RegisterResponse {
    /// Created account
    pub user: User,
    /// Membership profile with the generated card number
    pub profile: UserProfile,
    /// Status message
    pub message: String,
}

/// Login response with bearer token
#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    /// JWT bearer token
    pub token: String,
    /// Token type for the Authorization header
    pub token_type: String,
    /// Authenticated account
    pub user: User,
}

/// Current user response
#[derive(Serialize, ToSchema)]
pub struct MeResponse {
    pub user: User,
    pub profile: Option<UserProfile>,
}

/// Logout acknowledgement
#[derive(Serialize, ToSchema)]
pub struct LogoutResponse {
    pub message: String,
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Invalid input or password mismatch"),
        (status = 409, description = "Username or email already taken")
    )
)]
pub async fn register(
    State(state): State<crate::AppState>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let (user, profile) = state.services.users.register(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user,
            profile,
            message: "Account created! Please login.".to_string(),
        }),
    ))
}

/// Login with username and password
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let (token, user) = state
        .services
        .users
        .authenticate(&request.username, &request.password)
        .await?;

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        user,
    }))
}

/// End the session. Tokens are stateless; the client discards its copy.
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Logged out", body = LogoutResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn logout(
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<LogoutResponse>> {
    tracing::info!("Logout: user={}", claims.user_id);
    Ok(Json(LogoutResponse {
        message: "Logged out!".to_string(),
    }))
}

/// Get the current authenticated user
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = MeResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<MeResponse>> {
    let (user, profile) = state.services.users.current_user(claims.user_id).await?;
    Ok(Json(MeResponse { user, profile }))
}
