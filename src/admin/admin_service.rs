use chrono::{DateTime, Utc};
use std::{collections::BTreeMap, sync::Arc};
use tracing::debug;
use uuid::Uuid;

use super::admin_dto::{DoctorStats, StatsReport};
use crate::{
    appointment::{appointment_models::Appointment, appointment_repository::AppointmentRepository},
    error::{AppError, Result},
    user::{user_models::UserResponse, user_repository::UserRepository},
};

#[derive(Clone)]
pub struct AdminService {
    appointments: Arc<dyn AppointmentRepository>,
    users: Arc<dyn UserRepository>,
}

impl AdminService {
    pub fn new(appointments: Arc<dyn AppointmentRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self {
            appointments,
            users,
        }
    }

    pub async fn list_users(&self) -> Result<Vec<UserResponse>> {
        let users = self.users.find_all().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    /// Per-doctor totals over approved appointments last updated in `[start, end]`.
    pub async fn stats(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<StatsReport> {
        if start > end {
            return Err(AppError::Validation(
                "Start of the range must not be after its end".to_string(),
            ));
        }

        let appointments = self
            .appointments
            .find_approved_updated_between(start, end)
            .await?;
        debug!(
            "Summarizing {} approved appointments between {} and {}",
            appointments.len(),
            start,
            end
        );

        Ok(summarize(appointments))
    }
}

/// Groups by doctor id. The first appointment seen supplies the doctor snapshot and
/// earnings come from each appointment's own snapshot fee.
pub fn summarize(appointments: Vec<Appointment>) -> StatsReport {
    let mut groups: BTreeMap<Uuid, DoctorStats> = BTreeMap::new();

    for appointment in appointments {
        let entry = groups
            .entry(appointment.doctor_id)
            .or_insert_with(|| DoctorStats {
                doctor_id: appointment.doctor_id,
                doctor_info: appointment.doctor_info.clone(),
                users: Vec::new(),
                dates: Vec::new(),
                times: Vec::new(),
                num_appointments: 0,
                total_earnings: 0,
            });

        entry.users.push(appointment.user_info.name);
        entry.dates.push(appointment.date);
        entry.times.push(appointment.time);
        entry.num_appointments += 1;
        entry.total_earnings += appointment.doctor_info.fee_per_consultation;
    }

    let doctors: Vec<DoctorStats> = groups.into_values().collect();
    StatsReport {
        results: doctors.len(),
        doctors,
    }
}
