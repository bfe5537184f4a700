use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use super::{doctor_dto::DoctorProfileRequest, doctor_models::Doctor};
use crate::{dto::ApiResponse, error::Result, middleware::auth::AuthUser, state::AppState};

/// Apply for a doctor account
#[utoipa::path(
    post,
    path = "/api/user/apply-doctor-account",
    tag = "doctors",
    request_body = DoctorProfileRequest,
    responses(
        (status = 200, description = "Application filed, or `success: false` if one exists", body = Doctor),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn apply_doctor_account(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<DoctorProfileRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let doctor = state
        .doctor_service
        .apply(user_id, payload.into_profile()?)
        .await?;

    Ok(ApiResponse::ok("Doctor account applied successfully", doctor))
}

/// List doctors patients can book with
#[utoipa::path(
    get,
    path = "/api/user/approved-doctors",
    tag = "doctors",
    responses(
        (status = 200, description = "Approved doctors", body = [Doctor]),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_approved_doctors(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let doctors = state.doctor_service.list_approved().await?;

    Ok(ApiResponse::ok("Doctors fetched successfully", doctors))
}

/// Get the doctor profile owned by the signed-in user
#[utoipa::path(
    get,
    path = "/api/doctor/me",
    tag = "doctors",
    responses(
        (status = 200, description = "Doctor info fetched successfully", body = Doctor),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Doctor not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_own_doctor_info(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<impl IntoResponse> {
    let doctor = state.doctor_service.get_by_user(user_id).await?;

    Ok(ApiResponse::ok("Doctor info fetched successfully", doctor))
}

/// Get a doctor profile by id
#[utoipa::path(
    get,
    path = "/api/doctor/{doctor_id}",
    tag = "doctors",
    params(
        ("doctor_id" = Uuid, Path, description = "Doctor ID")
    ),
    responses(
        (status = 200, description = "Doctor info fetched successfully", body = Doctor),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Doctor not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_doctor_by_id(
    State(state): State<AppState>,
    Path(doctor_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let doctor = state.doctor_service.get_by_id(doctor_id).await?;

    Ok(ApiResponse::ok("Doctor info fetched successfully", doctor))
}

/// Update the signed-in doctor's profile
#[utoipa::path(
    put,
    path = "/api/doctor/me",
    tag = "doctors",
    request_body = DoctorProfileRequest,
    responses(
        (status = 200, description = "Doctor profile updated successfully", body = Doctor),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Doctor not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_doctor_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<DoctorProfileRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let doctor = state
        .doctor_service
        .update_profile(user_id, payload.into_profile()?)
        .await?;

    Ok(ApiResponse::ok("Doctor profile updated successfully", doctor))
}
