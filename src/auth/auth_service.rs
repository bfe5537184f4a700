use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{
    auth::{create_session_token, hash_password, verify_password, verify_session_token},
    error::{AppError, Result},
    user::{user_models::User, user_repository::UserRepository},
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    jwt_secret: String,
    session_ttl_hours: i64,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        jwt_secret: String,
        session_ttl_hours: i64,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            user_repo,
            jwt_secret,
            session_ttl_hours,
            bcrypt_cost,
        }
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User> {
        let email = normalize_email(email);

        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("User already exists".into()));
        }

        let password_hash = hash_password(password, self.bcrypt_cost)?;
        let user = self.user_repo.create(name.trim(), &email, &password_hash).await?;

        info!("Registered user {}", user.id);
        Ok(user)
    }

    /// Returns the user and a fresh session token.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String)> {
        let user = self
            .user_repo
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or_else(|| AppError::InvalidCredentials("User does not exist".into()))?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::InvalidCredentials("Password is incorrect".into()));
        }

        let token = create_session_token(user.id, &self.jwt_secret, self.session_ttl_hours)?;

        Ok((user, token))
    }

    pub fn authenticate(&self, token: &str) -> Result<Uuid> {
        verify_session_token(token, &self.jwt_secret)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
