use axum::{extract::State, response::IntoResponse};

use crate::{
    dto::ApiResponse,
    error::Result,
    middleware::auth::AuthUser,
    state::AppState,
    user::user_models::UserResponse,
};

/// Move every unseen notification to the seen list
#[utoipa::path(
    post,
    path = "/api/user/notifications/mark-all-seen",
    tag = "notifications",
    responses(
        (status = 200, description = "All notifications marked as seen", body = UserResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn mark_all_notifications_seen(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<impl IntoResponse> {
    let user = state.notification_service.mark_all_seen(user_id).await?;

    Ok(ApiResponse::ok(
        "All notifications marked as seen",
        UserResponse::from(user),
    ))
}

/// Delete every notification, seen or not
#[utoipa::path(
    delete,
    path = "/api/user/notifications",
    tag = "notifications",
    responses(
        (status = 200, description = "All notifications cleared", body = UserResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn clear_all_notifications(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<impl IntoResponse> {
    let user = state.notification_service.clear_all(user_id).await?;

    Ok(ApiResponse::ok(
        "All notifications cleared",
        UserResponse::from(user),
    ))
}
