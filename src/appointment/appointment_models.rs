use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{doctor::doctor_models::Doctor, user::user_models::User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Approved,
    Rejected,
}

impl AppointmentStatus {
    /// `pending` moves once to `approved` or `rejected`; both are terminal.
    pub fn can_transition_to(self, next: AppointmentStatus) -> bool {
        self == AppointmentStatus::Pending && next != AppointmentStatus::Pending
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Approved => write!(f, "approved"),
            AppointmentStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Doctor fields as they were at booking time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DoctorSnapshot {
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub specialization: String,
    pub fee_per_consultation: i64,
}

impl DoctorSnapshot {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl From<&Doctor> for DoctorSnapshot {
    fn from(doctor: &Doctor) -> Self {
        Self {
            user_id: doctor.user_id,
            first_name: doctor.first_name.clone(),
            last_name: doctor.last_name.clone(),
            specialization: doctor.specialization.clone(),
            fee_per_consultation: doctor.fee_per_consultation,
        }
    }
}

/// Patient fields as they were at booking time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PatientSnapshot {
    pub name: String,
    pub email: String,
}

impl From<&User> for PatientSnapshot {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Appointment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub doctor_id: Uuid,
    #[sqlx(json)]
    pub doctor_info: DoctorSnapshot,
    #[sqlx(json)]
    pub user_info: PatientSnapshot,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub status: AppointmentStatus,
    pub payment_id: String,
    pub refunded: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    /// A freshly captured booking, always `pending` and not refunded.
    pub fn pending(
        patient: &User,
        doctor: &Doctor,
        date: NaiveDate,
        time: NaiveTime,
        payment_id: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: patient.id,
            doctor_id: doctor.id,
            doctor_info: DoctorSnapshot::from(doctor),
            user_info: PatientSnapshot::from(patient),
            date,
            time,
            status: AppointmentStatus::Pending,
            payment_id,
            refunded: false,
            created_at: now,
            updated_at: now,
        }
    }
}
