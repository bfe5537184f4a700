use axum::{extract::State, response::IntoResponse, Json};
use validator::Validate;

use super::contact_dto::ContactRequest;
use crate::{dto::ApiResponse, error::Result, state::AppState};

/// Forward a contact form submission to the site administrator
#[utoipa::path(
    post,
    path = "/api/send-email",
    tag = "contact",
    request_body = ContactRequest,
    responses(
        (status = 200, description = "Email sent successfully"),
        (status = 400, description = "Invalid input"),
        (status = 502, description = "Error sending email")
    )
)]
pub async fn send_contact_email(
    State(state): State<AppState>,
    Json(payload): Json<ContactRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let email = payload.into_email(&state.config.mail_from, &state.config.contact_recipient);
    state.mailer.send(&email).await?;

    Ok(ApiResponse::message("Email sent successfully"))
}
