use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use super::doctor_models::{DoctorProfile, DoctorStatus};
use crate::{error::Result, schedule::parse_timings};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DoctorProfileRequest {
    #[validate(length(min = 1, max = 255))]
    pub first_name: String,
    #[validate(length(min = 1, max = 255))]
    pub last_name: String,
    #[validate(length(min = 1, max = 64))]
    pub phone_number: String,
    pub website: Option<String>,
    #[validate(length(min = 1))]
    pub address: String,
    #[validate(length(min = 1, max = 255))]
    pub specialization: String,
    #[validate(length(min = 1, max = 255))]
    pub experience: String,
    #[validate(range(min = 0))]
    pub fee_per_consultation: i64,
    /// Working hours as `[from, to]`, e.g. `["09:00", "17:00"]`.
    #[validate(length(equal = 2))]
    pub timings: Vec<String>,
}

impl DoctorProfileRequest {
    pub fn into_profile(self) -> Result<DoctorProfile> {
        let (timing_from, timing_to) = parse_timings(&self.timings)?;

        Ok(DoctorProfile {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            phone_number: self.phone_number,
            website: self.website.filter(|w| !w.trim().is_empty()),
            address: self.address,
            specialization: self.specialization,
            experience: self.experience,
            fee_per_consultation: self.fee_per_consultation,
            timing_from,
            timing_to,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangeDoctorStatusRequest {
    pub status: DoctorStatus,
}
