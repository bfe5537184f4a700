use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::appointment::appointment_models::DoctorSnapshot;

/// Inclusive range over the appointments' last update, as RFC 3339 timestamps.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatsQuery {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DoctorStats {
    pub doctor_id: Uuid,
    pub doctor_info: DoctorSnapshot,
    pub users: Vec<String>,
    pub dates: Vec<NaiveDate>,
    pub times: Vec<NaiveTime>,
    pub num_appointments: usize,
    pub total_earnings: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatsReport {
    /// Number of doctor groups.
    pub results: usize,
    pub doctors: Vec<DoctorStats>,
}
