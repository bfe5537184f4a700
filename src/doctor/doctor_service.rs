use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    doctor_models::{Doctor, DoctorProfile, DoctorStatus},
    doctor_repository::DoctorRepository,
};
use crate::{
    error::{AppError, Result},
    notification::{
        notification_models::{Notification, NotificationKind},
        notification_service::NotificationService,
    },
    user::user_repository::UserRepository,
};

#[derive(Clone)]
pub struct DoctorService {
    doctors: Arc<dyn DoctorRepository>,
    users: Arc<dyn UserRepository>,
    notifications: NotificationService,
}

impl DoctorService {
    pub fn new(
        doctors: Arc<dyn DoctorRepository>,
        users: Arc<dyn UserRepository>,
        notifications: NotificationService,
    ) -> Self {
        Self {
            doctors,
            users,
            notifications,
        }
    }

    /// Files a pending doctor application and tells every admin about it.
    pub async fn apply(&self, user_id: Uuid, profile: DoctorProfile) -> Result<Doctor> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(AppError::NotFound("User does not exist".into()));
        }
        if self.doctors.find_by_user_id(user_id).await?.is_some() {
            return Err(AppError::Conflict("Doctor account already applied".into()));
        }

        let doctor = self.doctors.create(&Doctor::new(user_id, &profile)).await?;
        info!("User {} applied for doctor account {}", user_id, doctor.id);

        let admins = self.users.find_admins().await?;
        if admins.is_empty() {
            warn!("No admin user to review doctor application {}", doctor.id);
        }
        for admin in admins {
            let notification = Notification::new(
                NotificationKind::NewDoctorRequest,
                format!("{} has applied for a doctor account", doctor.full_name()),
            )
            .on_click("/admin/doctorslist")
            .with_data(json!({
                "doctor_id": doctor.id,
                "name": doctor.full_name(),
            }));
            self.notifications.deliver(admin.id, notification).await;
        }

        Ok(doctor)
    }

    pub async fn get_by_id(&self, doctor_id: Uuid) -> Result<Doctor> {
        self.doctors
            .find_by_id(doctor_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Doctor not found".into()))
    }

    pub async fn get_by_user(&self, user_id: Uuid) -> Result<Doctor> {
        self.doctors
            .find_by_user_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Doctor not found".into()))
    }

    /// Booked appointments keep the snapshot taken when they were made.
    pub async fn update_profile(&self, user_id: Uuid, profile: DoctorProfile) -> Result<Doctor> {
        let mut doctor = self.get_by_user(user_id).await?;
        doctor.apply_profile(&profile);
        self.doctors.update_profile(&doctor).await
    }

    pub async fn list_approved(&self) -> Result<Vec<Doctor>> {
        self.doctors.find_by_status(DoctorStatus::Approved).await
    }

    pub async fn list_all(&self) -> Result<Vec<Doctor>> {
        self.doctors.find_all().await
    }

    /// Admin decision on a doctor account. The owner's `is_doctor` flag follows the
    /// status, and the owner is notified in the same write.
    pub async fn change_status(&self, doctor_id: Uuid, status: DoctorStatus) -> Result<Doctor> {
        let notification = Notification::new(
            NotificationKind::NewDoctorRequestChanged,
            format!("Your doctor account has been {}", status),
        )
        .on_click("/notifications");

        let doctor = self
            .doctors
            .update_status(doctor_id, status, &notification)
            .await?
            .ok_or_else(|| AppError::NotFound("Doctor not found".into()))?;

        info!("Doctor {} is now {}", doctor.id, status);
        Ok(doctor)
    }
}
