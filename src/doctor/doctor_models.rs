use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DoctorStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for DoctorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DoctorStatus::Pending => write!(f, "pending"),
            DoctorStatus::Approved => write!(f, "approved"),
            DoctorStatus::Rejected => write!(f, "rejected"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Doctor {
    pub id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub website: Option<String>,
    pub address: String,
    pub specialization: String,
    pub experience: String,
    pub fee_per_consultation: i64,
    pub timing_from: NaiveTime,
    pub timing_to: NaiveTime,
    pub status: DoctorStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Doctor {
    pub fn new(user_id: Uuid, profile: &DoctorProfile) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            phone_number: profile.phone_number.clone(),
            website: profile.website.clone(),
            address: profile.address.clone(),
            specialization: profile.specialization.clone(),
            experience: profile.experience.clone(),
            fee_per_consultation: profile.fee_per_consultation,
            timing_from: profile.timing_from,
            timing_to: profile.timing_to,
            status: DoctorStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Inclusive on both ends.
    pub fn works_at(&self, time: NaiveTime) -> bool {
        time >= self.timing_from && time <= self.timing_to
    }

    pub fn apply_profile(&mut self, profile: &DoctorProfile) {
        self.first_name = profile.first_name.clone();
        self.last_name = profile.last_name.clone();
        self.phone_number = profile.phone_number.clone();
        self.website = profile.website.clone();
        self.address = profile.address.clone();
        self.specialization = profile.specialization.clone();
        self.experience = profile.experience.clone();
        self.fee_per_consultation = profile.fee_per_consultation;
        self.timing_from = profile.timing_from;
        self.timing_to = profile.timing_to;
        self.updated_at = Utc::now();
    }
}

/// The editable part of a doctor record, already parsed and validated.
#[derive(Debug, Clone)]
pub struct DoctorProfile {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub website: Option<String>,
    pub address: String,
    pub specialization: String,
    pub experience: String,
    pub fee_per_consultation: i64,
    pub timing_from: NaiveTime,
    pub timing_to: NaiveTime,
}
