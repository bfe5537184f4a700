use axum::{extract::State, response::IntoResponse};

use crate::{
    dto::ApiResponse, error::Result, middleware::auth::AuthUser, state::AppState,
    user::user_models::UserResponse,
};

/// Get the signed-in user's record and notification inboxes
#[utoipa::path(
    get,
    path = "/api/user/me",
    tag = "users",
    responses(
        (status = 200, description = "User profile retrieved successfully", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User does not exist")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_current_user(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<impl IntoResponse> {
    let user = state.user_service.get_current_user(user_id).await?;

    Ok(ApiResponse::ok("User info fetched successfully", user))
}
