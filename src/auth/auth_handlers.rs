use axum::{extract::State, response::IntoResponse, Json};
use validator::Validate;

use super::auth_dto::{LoginRequest, RegisterRequest};
use crate::{dto::ApiResponse, error::Result, state::AppState};

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/user/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User created, or `success: false` when the email is taken"),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Internal server error")
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    state
        .auth_service
        .register(&payload.name, &payload.email, &payload.password)
        .await?;

    Ok(ApiResponse::message("User created successfully"))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/user/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session token in `data`, or `success: false` on bad credentials"),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Internal server error")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let (_user, token) = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok(ApiResponse::ok("Login successful", token))
}
