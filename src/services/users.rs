//! Registration and authentication service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{RegisterRequest, User, UserClaims, UserProfile},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Register a new patron account with its membership profile
    pub async fn register(&self, request: RegisterRequest) -> AppResult<(User, UserProfile)> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if request.password != request.confirm_password {
            return Err(AppError::Validation("Passwords do not match".to_string()));
        }

        if self.repository.users.username_exists(&request.username).await? {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }

        if self.repository.users.email_exists(&request.email).await? {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }

        let password_hash = self.hash_password(&request.password)?;

        let (user, profile) = self
            .repository
            .users
            .create_with_profile(
                &request.username,
                &request.email,
                &password_hash,
                request.phone_number.as_deref(),
                request.address.as_deref(),
                false,
            )
            .await?;

        tracing::info!(
            "Registered user id={} card={}",
            user.id,
            profile.library_card_number
        );

        Ok((user, profile))
    }

    /// Authenticate by username and password, returning a bearer token
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_username(username)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid username or password".to_string()))?;

        if !self.verify_password(&user, password)? {
            return Err(AppError::Authentication(
                "Invalid username or password".to_string(),
            ));
        }

        let is_librarian = self
            .repository
            .users
            .profile(user.id)
            .await?
            .map(|p| p.is_librarian)
            .unwrap_or(false);

        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = UserClaims {
            sub: user.username.clone(),
            user_id: user.id,
            is_librarian,
            exp,
            iat: now,
        };

        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        Ok((token, user))
    }

    /// Create the default librarian account on first run, if absent
    pub async fn ensure_default_librarian(
        &self,
        username: &str,
        password: &str,
    ) -> AppResult<()> {
        if self.repository.users.username_exists(username).await? {
            return Ok(());
        }

        let password_hash = self.hash_password(password)?;
        let (user, _) = self
            .repository
            .users
            .create_with_profile(
                username,
                &format!("{}@localhost", username),
                &password_hash,
                None,
                None,
                true,
            )
            .await?;

        tracing::warn!(
            "Created default librarian account '{}' (id={}) - change its password",
            username,
            user.id
        );

        Ok(())
    }

    /// Current user with optional membership profile
    pub async fn current_user(&self, user_id: i32) -> AppResult<(User, Option<UserProfile>)> {
        let user = self.repository.users.get_by_id(user_id).await?;
        let profile = self.repository.users.profile(user_id).await?;
        Ok((user, profile))
    }

    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    }

    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(&user.password_hash)
            .map_err(|e| AppError::Internal(format!("Stored password hash is invalid: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}
