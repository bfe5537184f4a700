use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use super::{
    appointment_dto::{
        AvailabilityRequest, BookAppointmentRequest, ChangeAppointmentStatusRequest, NameFilter,
    },
    appointment_models::Appointment,
    availability::Availability,
};
use crate::{dto::ApiResponse, error::Result, middleware::auth::AuthUser, state::AppState};

/// Check whether a doctor can take an appointment at the given moment
#[utoipa::path(
    post,
    path = "/api/user/check-booking-availability",
    tag = "appointments",
    request_body = AvailabilityRequest,
    responses(
        (status = 200, description = "`success` mirrors `available`; `message` carries the reason", body = Availability),
        (status = 400, description = "Malformed date or time"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Doctor not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn check_booking_availability(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<AvailabilityRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let (date, time) = payload.moment()?;

    let availability = state
        .appointment_service
        .check_availability(user_id, payload.doctor_id, date, time)
        .await?;

    let reason = availability.reason.clone();
    if availability.available {
        Ok(ApiResponse::ok(reason, availability))
    } else {
        Ok(ApiResponse::failed(reason, availability))
    }
}

/// Pay for and book an appointment
#[utoipa::path(
    post,
    path = "/api/user/book-appointment",
    tag = "appointments",
    request_body = BookAppointmentRequest,
    responses(
        (status = 200, description = "Appointment booked, or `success: false` when the slot is taken", body = Appointment),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 402, description = "Payment failed"),
        (status = 404, description = "Doctor not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn book_appointment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<BookAppointmentRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let (date, time) = payload.moment()?;

    let appointment = state
        .appointment_service
        .book(user_id, payload.doctor_id, date, time, &payload.token)
        .await?;

    let message = format!(
        "Appointment booked successfully with Dr. {}",
        appointment.doctor_info.full_name()
    );
    Ok(ApiResponse::ok(message, appointment))
}

/// List the signed-in user's bookings
#[utoipa::path(
    get,
    path = "/api/user/appointments",
    tag = "appointments",
    params(NameFilter),
    responses(
        (status = 200, description = "Appointments fetched successfully", body = [Appointment]),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_user_appointments(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(filter): Query<NameFilter>,
) -> Result<impl IntoResponse> {
    let appointments = state
        .appointment_service
        .list_by_user(user_id, filter.name.as_deref())
        .await?;

    Ok(ApiResponse::ok("Appointments fetched successfully", appointments))
}

/// List appointments booked with the signed-in doctor
#[utoipa::path(
    get,
    path = "/api/doctor/appointments",
    tag = "appointments",
    params(NameFilter),
    responses(
        (status = 200, description = "Appointments fetched successfully", body = [Appointment]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Doctor not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_doctor_appointments(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(filter): Query<NameFilter>,
) -> Result<impl IntoResponse> {
    let appointments = state
        .appointment_service
        .list_by_doctor(user_id, filter.name.as_deref())
        .await?;

    Ok(ApiResponse::ok("Appointments fetched successfully", appointments))
}

/// Approve or reject a pending appointment
#[utoipa::path(
    post,
    path = "/api/doctor/appointments/{appointment_id}/status",
    tag = "appointments",
    params(
        ("appointment_id" = Uuid, Path, description = "Appointment ID")
    ),
    request_body = ChangeAppointmentStatusRequest,
    responses(
        (status = 200, description = "Status changed, or `success: false` if already decided", body = Appointment),
        (status = 400, description = "Status must be approved or rejected"),
        (status = 401, description = "Unauthorized"),
        (status = 402, description = "Refund failed"),
        (status = 403, description = "Not the appointment's doctor"),
        (status = 404, description = "Appointment not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn change_appointment_status(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(appointment_id): Path<Uuid>,
    Json(payload): Json<ChangeAppointmentStatusRequest>,
) -> Result<impl IntoResponse> {
    let appointment = state
        .appointment_service
        .change_status(user_id, appointment_id, payload.status)
        .await?;

    Ok(ApiResponse::ok(
        "Appointment status updated successfully",
        appointment,
    ))
}
