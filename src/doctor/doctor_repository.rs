use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::doctor_models::{Doctor, DoctorStatus};
use crate::{
    db::is_unique_violation,
    error::{AppError, Result},
    notification::notification_models::Notification,
    user::user_repository::PgUserRepository,
};

#[async_trait]
pub trait DoctorRepository: Send + Sync {
    /// Inserts a new doctor profile. A user may own only one.
    async fn create(&self, doctor: &Doctor) -> Result<Doctor>;

    async fn find_by_id(&self, doctor_id: Uuid) -> Result<Option<Doctor>>;

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<Doctor>>;

    async fn find_all(&self) -> Result<Vec<Doctor>>;

    async fn find_by_status(&self, status: DoctorStatus) -> Result<Vec<Doctor>>;

    /// Writes back the editable profile fields. Status and owner are left alone.
    async fn update_profile(&self, doctor: &Doctor) -> Result<Doctor>;

    /// Sets the status, sets the owner's `is_doctor` to `status == approved` and pushes
    /// `notification` to the owner, all in one transaction.
    async fn update_status(
        &self,
        doctor_id: Uuid,
        status: DoctorStatus,
        notification: &Notification,
    ) -> Result<Option<Doctor>>;
}

#[derive(Clone)]
pub struct PgDoctorRepository {
    pool: PgPool,
}

impl PgDoctorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DoctorRepository for PgDoctorRepository {
    async fn create(&self, doctor: &Doctor) -> Result<Doctor> {
        sqlx::query_as::<_, Doctor>(
            "INSERT INTO doctors (
                id, user_id, first_name, last_name, phone_number, website, address,
                specialization, experience, fee_per_consultation, timing_from, timing_to, status
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING *",
        )
        .bind(doctor.id)
        .bind(doctor.user_id)
        .bind(&doctor.first_name)
        .bind(&doctor.last_name)
        .bind(&doctor.phone_number)
        .bind(&doctor.website)
        .bind(&doctor.address)
        .bind(&doctor.specialization)
        .bind(&doctor.experience)
        .bind(doctor.fee_per_consultation)
        .bind(doctor.timing_from)
        .bind(doctor.timing_to)
        .bind(doctor.status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("Doctor account already applied".to_string())
            } else {
                AppError::Database(e)
            }
        })
    }

    async fn find_by_id(&self, doctor_id: Uuid) -> Result<Option<Doctor>> {
        let doctor = sqlx::query_as::<_, Doctor>("SELECT * FROM doctors WHERE id = $1")
            .bind(doctor_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(doctor)
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<Doctor>> {
        let doctor = sqlx::query_as::<_, Doctor>("SELECT * FROM doctors WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(doctor)
    }

    async fn find_all(&self) -> Result<Vec<Doctor>> {
        let doctors = sqlx::query_as::<_, Doctor>("SELECT * FROM doctors ORDER BY created_at")
            .fetch_all(&self.pool)
            .await?;

        Ok(doctors)
    }

    async fn find_by_status(&self, status: DoctorStatus) -> Result<Vec<Doctor>> {
        let doctors = sqlx::query_as::<_, Doctor>(
            "SELECT * FROM doctors WHERE status = $1 ORDER BY created_at",
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(doctors)
    }

    async fn update_profile(&self, doctor: &Doctor) -> Result<Doctor> {
        let doctor = sqlx::query_as::<_, Doctor>(
            "UPDATE doctors
             SET first_name = $2,
                 last_name = $3,
                 phone_number = $4,
                 website = $5,
                 address = $6,
                 specialization = $7,
                 experience = $8,
                 fee_per_consultation = $9,
                 timing_from = $10,
                 timing_to = $11,
                 updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(doctor.id)
        .bind(&doctor.first_name)
        .bind(&doctor.last_name)
        .bind(&doctor.phone_number)
        .bind(&doctor.website)
        .bind(&doctor.address)
        .bind(&doctor.specialization)
        .bind(&doctor.experience)
        .bind(doctor.fee_per_consultation)
        .bind(doctor.timing_from)
        .bind(doctor.timing_to)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Doctor not found".to_string()))?;

        Ok(doctor)
    }

    async fn update_status(
        &self,
        doctor_id: Uuid,
        status: DoctorStatus,
        notification: &Notification,
    ) -> Result<Option<Doctor>> {
        let mut tx = self.pool.begin().await?;

        let doctor = sqlx::query_as::<_, Doctor>(
            "UPDATE doctors SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(doctor_id)
        .bind(status)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(doctor) = &doctor {
            PgUserRepository::set_doctor_role_with_tx(
                &mut tx,
                doctor.user_id,
                status == DoctorStatus::Approved,
                notification,
            )
            .await?;
        }

        tx.commit().await?;

        Ok(doctor)
    }
}
