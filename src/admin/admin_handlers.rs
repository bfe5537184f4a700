use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use super::admin_dto::{StatsQuery, StatsReport};
use crate::{
    doctor::{doctor_dto::ChangeDoctorStatusRequest, doctor_models::Doctor},
    dto::ApiResponse,
    error::Result,
    state::AppState,
    user::user_models::UserResponse,
};

/// List every registered user
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "admin",
    responses(
        (status = 200, description = "Users fetched successfully", body = [UserResponse]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let users = state.admin_service.list_users().await?;

    Ok(ApiResponse::ok("Users fetched successfully", users))
}

/// List every doctor account, whatever its status
#[utoipa::path(
    get,
    path = "/api/admin/doctors",
    tag = "admin",
    responses(
        (status = 200, description = "Doctors fetched successfully", body = [Doctor]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_doctors(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let doctors = state.doctor_service.list_all().await?;

    Ok(ApiResponse::ok("Doctors fetched successfully", doctors))
}

/// Approve or reject a doctor account
#[utoipa::path(
    post,
    path = "/api/admin/doctors/{doctor_id}/status",
    tag = "admin",
    params(
        ("doctor_id" = Uuid, Path, description = "Doctor ID")
    ),
    request_body = ChangeDoctorStatusRequest,
    responses(
        (status = 200, description = "Doctor status updated successfully", body = Doctor),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Doctor not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn change_doctor_status(
    State(state): State<AppState>,
    Path(doctor_id): Path<Uuid>,
    Json(payload): Json<ChangeDoctorStatusRequest>,
) -> Result<impl IntoResponse> {
    let doctor = state
        .doctor_service
        .change_status(doctor_id, payload.status)
        .await?;

    Ok(ApiResponse::ok("Doctor status updated successfully", doctor))
}

/// Earnings and appointment counts per doctor over a date range
#[utoipa::path(
    get,
    path = "/api/admin/stats",
    tag = "admin",
    params(StatsQuery),
    responses(
        (status = 200, description = "Stats fetched successfully", body = StatsReport),
        (status = 400, description = "Invalid range")
    )
)]
pub async fn get_stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> Result<impl IntoResponse> {
    let report = state.admin_service.stats(query.start, query.end).await?;

    Ok(ApiResponse::ok("Stats fetched successfully", report))
}
