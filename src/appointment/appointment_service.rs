use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use super::{
    appointment_models::{Appointment, AppointmentStatus},
    appointment_repository::AppointmentRepository,
    availability::{check_doctor_slot, check_requested_moment, Availability, SlotRejection},
};
use crate::{
    doctor::{doctor_models::Doctor, doctor_repository::DoctorRepository},
    error::{AppError, Result},
    notification::{
        notification_models::{Notification, NotificationKind},
        notification_service::NotificationService,
    },
    payment::{PaymentGateway, PaymentToken},
    user::{user_models::User, user_repository::UserRepository},
};

/// Fees are stored in whole currency units; the processor takes minor units.
const MINOR_UNITS: i64 = 100;

#[derive(Clone)]
pub struct AppointmentService {
    appointments: Arc<dyn AppointmentRepository>,
    doctors: Arc<dyn DoctorRepository>,
    users: Arc<dyn UserRepository>,
    payments: Arc<dyn PaymentGateway>,
    notifications: NotificationService,
    currency: String,
}

impl AppointmentService {
    pub fn new(
        appointments: Arc<dyn AppointmentRepository>,
        doctors: Arc<dyn DoctorRepository>,
        users: Arc<dyn UserRepository>,
        payments: Arc<dyn PaymentGateway>,
        notifications: NotificationService,
        currency: String,
    ) -> Self {
        Self {
            appointments,
            doctors,
            users,
            payments,
            notifications,
            currency,
        }
    }

    pub async fn check_availability(
        &self,
        requester: Uuid,
        doctor_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<Availability> {
        let outcome = self
            .evaluate(requester, doctor_id, date, time, Utc::now().naive_utc())
            .await?;

        Ok(Availability::from_check(outcome.map(|_| ())))
    }

    /// Charges the doctor's fee and files a pending appointment. Nothing is written
    /// when the slot is refused or the charge fails.
    pub async fn book(
        &self,
        patient_id: Uuid,
        doctor_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
        token: &PaymentToken,
    ) -> Result<Appointment> {
        let patient = self.load_user(patient_id).await?;
        let doctor = self
            .evaluate(patient_id, doctor_id, date, time, Utc::now().naive_utc())
            .await?
            .map_err(|rejection| AppError::Conflict(rejection.message().to_string()))?;

        let amount = doctor
            .fee_per_consultation
            .checked_mul(MINOR_UNITS)
            .ok_or_else(|| AppError::Validation("Consultation fee is too large".to_string()))?;
        let idempotency_key = Uuid::new_v4().to_string();
        let payment_id = self
            .payments
            .charge(amount, &self.currency, token, &idempotency_key)
            .await?;

        let appointment = Appointment::pending(&patient, &doctor, date, time, payment_id);
        let appointment = self.appointments.create(&appointment).await.map_err(|e| {
            error!(
                "Charge {} captured but appointment was not stored: {}",
                appointment.payment_id, e
            );
            e
        })?;
        info!(
            "Appointment {} booked by user {} with doctor {}",
            appointment.id, patient_id, doctor_id
        );

        let notification = Notification::new(
            NotificationKind::NewAppointmentRequest,
            format!("A new appointment request has been made by {}", patient.name),
        )
        .on_click("/doctor/appointments")
        .with_data(json!({ "appointment_id": appointment.id }));
        self.notifications.deliver(doctor.user_id, notification).await;

        Ok(appointment)
    }

    /// Approves or rejects a pending appointment. A rejection refunds the payment
    /// before anything is written, keyed by the appointment so a retry after a failed
    /// write cannot refund twice.
    pub async fn change_status(
        &self,
        actor_id: Uuid,
        appointment_id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Appointment> {
        if status == AppointmentStatus::Pending {
            return Err(AppError::Validation(
                "Status must be approved or rejected".to_string(),
            ));
        }

        let appointment = self
            .appointments
            .find_by_id(appointment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Appointment not found".to_string()))?;

        let actor = self.load_user(actor_id).await?;
        if !actor.is_admin && appointment.doctor_info.user_id != actor.id {
            return Err(AppError::Forbidden(
                "Only the appointment's doctor can change its status".to_string(),
            ));
        }
        if !appointment.status.can_transition_to(status) {
            return Err(AppError::Conflict(format!(
                "Appointment has already been {}",
                appointment.status
            )));
        }

        let refunded = status == AppointmentStatus::Rejected;
        if refunded {
            self.payments
                .refund(&appointment.payment_id, &refund_key(appointment.id))
                .await?;
            info!("Refunded charge {} for appointment {}", appointment.payment_id, appointment.id);
        }

        let updated = self
            .appointments
            .update_status(appointment_id, status, refunded)
            .await?
            .ok_or_else(|| {
                error!(
                    "Appointment {} changed concurrently after refund={}",
                    appointment_id, refunded
                );
                AppError::Conflict("Appointment status has already changed".to_string())
            })?;
        info!("Appointment {} is now {}", updated.id, status);

        let mut message = format!(
            "Your appointment status has been {} with Dr. {}",
            status,
            updated.doctor_info.full_name()
        );
        if refunded {
            message.push_str(" and your payment has been refunded");
        }
        let notification = Notification::new(NotificationKind::AppointmentStatusChanged, message)
            .on_click("/appointments")
            .with_data(json!({ "appointment_id": updated.id }));
        self.notifications.deliver(updated.user_id, notification).await;

        Ok(updated)
    }

    /// The caller's bookings, optionally filtered by doctor name.
    pub async fn list_by_user(&self, user_id: Uuid, name: Option<&str>) -> Result<Vec<Appointment>> {
        let appointments = self.appointments.find_by_user(user_id).await?;

        Ok(appointments
            .into_iter()
            .filter(|a| name_matches(&a.doctor_info.full_name(), name))
            .collect())
    }

    /// Appointments of the caller's doctor profile, optionally filtered by patient name.
    pub async fn list_by_doctor(&self, user_id: Uuid, name: Option<&str>) -> Result<Vec<Appointment>> {
        let doctor = self
            .doctors
            .find_by_user_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Doctor not found".to_string()))?;
        let appointments = self.appointments.find_by_doctor(doctor.id).await?;

        Ok(appointments
            .into_iter()
            .filter(|a| name_matches(&a.user_info.name, name))
            .collect())
    }

    /// Runs the slot rules in order. Only a missing doctor is an error; every other
    /// refusal comes back as the inner `Err`.
    async fn evaluate(
        &self,
        requester: Uuid,
        doctor_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
        now: NaiveDateTime,
    ) -> Result<std::result::Result<Doctor, SlotRejection>> {
        if let Err(rejection) = check_requested_moment(date, time, now) {
            return Ok(Err(rejection));
        }

        let doctor = self
            .doctors
            .find_by_id(doctor_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Doctor not found".to_string()))?;

        let booked: Vec<NaiveTime> = self
            .appointments
            .find_by_doctor_on(doctor.id, date)
            .await?
            .iter()
            .map(|a| a.time)
            .collect();

        Ok(check_doctor_slot(&doctor, requester, time, &booked).map(|()| doctor))
    }

    async fn load_user(&self, user_id: Uuid) -> Result<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User does not exist".to_string()))
    }
}

fn refund_key(appointment_id: Uuid) -> String {
    format!("refund-{}", appointment_id)
}

fn name_matches(name: &str, filter: Option<&str>) -> bool {
    match filter.map(str::trim).filter(|f| !f.is_empty()) {
        Some(filter) => name.to_lowercase().contains(&filter.to_lowercase()),
        None => true,
    }
}
