use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::appointment_models::AppointmentStatus;
use crate::{
    error::Result,
    payment::PaymentToken,
    schedule::{parse_date, parse_time},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AvailabilityRequest {
    pub doctor_id: Uuid,
    /// `DD-MM-YYYY`
    #[validate(length(min = 1))]
    pub date: String,
    /// `HH:mm` or `hh:mm AM/PM`
    #[validate(length(min = 1))]
    pub time: String,
}

impl AvailabilityRequest {
    pub fn moment(&self) -> Result<(NaiveDate, NaiveTime)> {
        Ok((parse_date(&self.date)?, parse_time(&self.time)?))
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BookAppointmentRequest {
    pub doctor_id: Uuid,
    #[validate(length(min = 1))]
    pub date: String,
    #[validate(length(min = 1))]
    pub time: String,
    pub token: PaymentToken,
}

impl BookAppointmentRequest {
    pub fn moment(&self) -> Result<(NaiveDate, NaiveTime)> {
        Ok((parse_date(&self.date)?, parse_time(&self.time)?))
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangeAppointmentStatusRequest {
    pub status: AppointmentStatus,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NameFilter {
    /// Case-insensitive part of the counterpart's name.
    pub name: Option<String>,
}
