use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{
    error::{AppError, Result},
    middleware::auth::AuthUser,
    state::AppState,
};

/// Runs after `auth_middleware`. The role is read from storage on every request
/// so a revoked admin loses access immediately.
pub async fn admin_authorization(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    request: Request,
    next: Next,
) -> Result<Response> {
    let user = state
        .user_repository
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User does not exist".to_string()))?;

    if !user.is_admin {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    Ok(next.run(request).await)
}
