use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use super::appointment_models::{Appointment, AppointmentStatus};
use crate::error::Result;

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn create(&self, appointment: &Appointment) -> Result<Appointment>;

    async fn find_by_id(&self, appointment_id: Uuid) -> Result<Option<Appointment>>;

    /// Every appointment of the doctor on `date`, whatever its status.
    async fn find_by_doctor_on(&self, doctor_id: Uuid, date: NaiveDate) -> Result<Vec<Appointment>>;

    async fn find_by_doctor(&self, doctor_id: Uuid) -> Result<Vec<Appointment>>;

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Appointment>>;

    /// Moves a `pending` appointment to `status`. Returns `None` when the appointment
    /// is missing or no longer pending.
    async fn update_status(
        &self,
        appointment_id: Uuid,
        status: AppointmentStatus,
        refunded: bool,
    ) -> Result<Option<Appointment>>;

    /// Approved appointments whose last update falls in `[start, end]`.
    async fn find_approved_updated_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>>;
}

#[derive(Clone)]
pub struct PgAppointmentRepository {
    pool: PgPool,
}

impl PgAppointmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentRepository for PgAppointmentRepository {
    async fn create(&self, appointment: &Appointment) -> Result<Appointment> {
        let appointment = sqlx::query_as::<_, Appointment>(
            "INSERT INTO appointments (
                id, user_id, doctor_id, doctor_info, user_info, date, time, status, payment_id, refunded
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING *",
        )
        .bind(appointment.id)
        .bind(appointment.user_id)
        .bind(appointment.doctor_id)
        .bind(Json(&appointment.doctor_info))
        .bind(Json(&appointment.user_info))
        .bind(appointment.date)
        .bind(appointment.time)
        .bind(appointment.status)
        .bind(&appointment.payment_id)
        .bind(appointment.refunded)
        .fetch_one(&self.pool)
        .await?;

        Ok(appointment)
    }

    async fn find_by_id(&self, appointment_id: Uuid) -> Result<Option<Appointment>> {
        let appointment =
            sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = $1")
                .bind(appointment_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(appointment)
    }

    async fn find_by_doctor_on(&self, doctor_id: Uuid, date: NaiveDate) -> Result<Vec<Appointment>> {
        let appointments = sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE doctor_id = $1 AND date = $2 ORDER BY time",
        )
        .bind(doctor_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(appointments)
    }

    async fn find_by_doctor(&self, doctor_id: Uuid) -> Result<Vec<Appointment>> {
        let appointments = sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE doctor_id = $1 ORDER BY date DESC, time DESC",
        )
        .bind(doctor_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(appointments)
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Appointment>> {
        let appointments = sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE user_id = $1 ORDER BY date DESC, time DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(appointments)
    }

    async fn update_status(
        &self,
        appointment_id: Uuid,
        status: AppointmentStatus,
        refunded: bool,
    ) -> Result<Option<Appointment>> {
        let appointment = sqlx::query_as::<_, Appointment>(
            "UPDATE appointments
             SET status = $2, refunded = $3, updated_at = NOW()
             WHERE id = $1 AND status = 'pending'
             RETURNING *",
        )
        .bind(appointment_id)
        .bind(status)
        .bind(refunded)
        .fetch_optional(&self.pool)
        .await?;

        Ok(appointment)
    }

    async fn find_approved_updated_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>> {
        let appointments = sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments
             WHERE status = 'approved' AND updated_at >= $1 AND updated_at <= $2
             ORDER BY updated_at",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(appointments)
    }
}
