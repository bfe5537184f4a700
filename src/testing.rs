//! In-memory collaborators shared by the unit and router tests.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::{
    appointment::{
        appointment_models::{Appointment, AppointmentStatus},
        appointment_repository::AppointmentRepository,
    },
    contact::mailer::{EmailMessage, EmailSender},
    doctor::{
        doctor_models::{Doctor, DoctorProfile, DoctorStatus},
        doctor_repository::DoctorRepository,
    },
    error::{AppError, Result},
    notification::notification_models::Notification,
    payment::{PaymentGateway, PaymentToken},
    state::{AppState, Config},
    user::{user_models::User, user_repository::UserRepository},
};

/// Lowest cost bcrypt accepts; keeps hashing fast in tests.
pub const TEST_BCRYPT_COST: u32 = 4;

pub fn sample_profile() -> DoctorProfile {
    DoctorProfile {
        first_name: "Sara".into(),
        last_name: "Khan".into(),
        phone_number: "0300-1234567".into(),
        website: None,
        address: "12 Mall Road, Lahore".into(),
        specialization: "Cardiology".into(),
        experience: "7 years".into(),
        fee_per_consultation: 1500,
        timing_from: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        timing_to: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
    }
}

/// An approved doctor working 09:00-17:00 for 1500 per consultation.
pub fn sample_doctor(owner: Uuid) -> Doctor {
    let mut doctor = Doctor::new(owner, &sample_profile());
    doctor.status = DoctorStatus::Approved;
    doctor
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    doctors: Vec<Doctor>,
    appointments: Vec<Appointment>,
    fail_next_appointment_update: bool,
}

/// One shared set of tables behind every repository trait.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> Arc<dyn UserRepository> {
        Arc::new(self.clone())
    }

    pub fn doctors(&self) -> Arc<dyn DoctorRepository> {
        Arc::new(self.clone())
    }

    pub fn appointments(&self) -> Arc<dyn AppointmentRepository> {
        Arc::new(self.clone())
    }

    pub fn insert_user(&self, name: &str, email: &str) -> User {
        let user = User::new(name, email, "not-a-real-hash");
        self.tables.lock().unwrap().users.push(user.clone());
        user
    }

    pub fn insert_admin(&self, name: &str, email: &str) -> User {
        let mut user = User::new(name, email, "not-a-real-hash");
        user.is_admin = true;
        self.tables.lock().unwrap().users.push(user.clone());
        user
    }

    /// Adds an approved `sample_doctor` owned by `owner`.
    pub fn insert_doctor(&self, owner: Uuid) -> Doctor {
        self.insert_doctor_with(sample_doctor(owner))
    }

    /// Adds `doctor` as stored; the owner's role flag follows its status.
    pub fn insert_doctor_with(&self, doctor: Doctor) -> Doctor {
        let mut tables = self.tables.lock().unwrap();
        if let Some(user) = tables.users.iter_mut().find(|u| u.id == doctor.user_id) {
            user.is_doctor = doctor.status == DoctorStatus::Approved;
        }
        tables.doctors.push(doctor.clone());
        doctor
    }

    /// Makes the next appointment status update fail as if the database were down.
    pub fn fail_next_appointment_update(&self) {
        self.tables.lock().unwrap().fail_next_appointment_update = true;
    }

    pub fn insert_appointment(&self, appointment: Appointment) -> Appointment {
        self.tables
            .lock()
            .unwrap()
            .appointments
            .push(appointment.clone());
        appointment
    }

    pub fn user(&self, user_id: Uuid) -> User {
        self.tables
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
            .expect("user exists")
    }

    pub fn appointment(&self, appointment_id: Uuid) -> Appointment {
        self.tables
            .lock()
            .unwrap()
            .appointments
            .iter()
            .find(|a| a.id == appointment_id)
            .cloned()
            .expect("appointment exists")
    }

    pub fn user_count(&self) -> usize {
        self.tables.lock().unwrap().users.len()
    }

    pub fn appointment_count(&self) -> usize {
        self.tables.lock().unwrap().appointments.len()
    }

    fn edit_user(&self, user_id: Uuid, edit: impl FnOnce(&mut User)) -> Option<User> {
        let mut tables = self.tables.lock().unwrap();
        let stored = tables.users.iter_mut().find(|u| u.id == user_id)?;
        edit(stored);
        stored.updated_at = Utc::now();
        Some(stored.clone())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, name: &str, email: &str, password_hash: &str) -> Result<User> {
        let mut tables = self.tables.lock().unwrap();
        if tables.users.iter().any(|u| u.email == email) {
            return Err(AppError::Conflict("User already exists".to_string()));
        }
        let user = User::new(name, email, password_hash);
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.id == user_id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_all(&self) -> Result<Vec<User>> {
        Ok(self.tables.lock().unwrap().users.clone())
    }

    async fn find_admins(&self) -> Result<Vec<User>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().filter(|u| u.is_admin).cloned().collect())
    }

    async fn push_notification(
        &self,
        user_id: Uuid,
        notification: &Notification,
    ) -> Result<Option<User>> {
        Ok(self.edit_user(user_id, |u| u.push_notification(notification.clone())))
    }

    async fn mark_all_seen(&self, user_id: Uuid) -> Result<Option<User>> {
        Ok(self.edit_user(user_id, User::mark_all_seen))
    }

    async fn clear_notifications(&self, user_id: Uuid) -> Result<Option<User>> {
        Ok(self.edit_user(user_id, User::clear_notifications))
    }
}

#[async_trait]
impl DoctorRepository for MemoryStore {
    async fn create(&self, doctor: &Doctor) -> Result<Doctor> {
        let mut tables = self.tables.lock().unwrap();
        if tables.doctors.iter().any(|d| d.user_id == doctor.user_id) {
            return Err(AppError::Conflict("Doctor account already applied".to_string()));
        }
        tables.doctors.push(doctor.clone());
        Ok(doctor.clone())
    }

    async fn find_by_id(&self, doctor_id: Uuid) -> Result<Option<Doctor>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.doctors.iter().find(|d| d.id == doctor_id).cloned())
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<Doctor>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.doctors.iter().find(|d| d.user_id == user_id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Doctor>> {
        Ok(self.tables.lock().unwrap().doctors.clone())
    }

    async fn find_by_status(&self, status: DoctorStatus) -> Result<Vec<Doctor>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .doctors
            .iter()
            .filter(|d| d.status == status)
            .cloned()
            .collect())
    }

    async fn update_profile(&self, doctor: &Doctor) -> Result<Doctor> {
        let mut tables = self.tables.lock().unwrap();
        let stored = tables
            .doctors
            .iter_mut()
            .find(|d| d.id == doctor.id)
            .ok_or_else(|| AppError::NotFound("Doctor not found".to_string()))?;
        let (status, user_id) = (stored.status, stored.user_id);
        *stored = doctor.clone();
        stored.status = status;
        stored.user_id = user_id;
        Ok(stored.clone())
    }

    async fn update_status(
        &self,
        doctor_id: Uuid,
        status: DoctorStatus,
        notification: &Notification,
    ) -> Result<Option<Doctor>> {
        let mut tables = self.tables.lock().unwrap();
        let Some(stored) = tables.doctors.iter_mut().find(|d| d.id == doctor_id) else {
            return Ok(None);
        };
        let mut doctor = stored.clone();
        doctor.status = status;
        doctor.updated_at = Utc::now();
        let owner = tables
            .users
            .iter_mut()
            .find(|u| u.id == doctor.user_id)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        owner.is_doctor = status == DoctorStatus::Approved;
        owner.push_notification(notification.clone());
        owner.updated_at = Utc::now();
        if let Some(stored) = tables.doctors.iter_mut().find(|d| d.id == doctor_id) {
            *stored = doctor.clone();
        }
        Ok(Some(doctor))
    }
}

#[async_trait]
impl AppointmentRepository for MemoryStore {
    async fn create(&self, appointment: &Appointment) -> Result<Appointment> {
        self.tables
            .lock()
            .unwrap()
            .appointments
            .push(appointment.clone());
        Ok(appointment.clone())
    }

    async fn find_by_id(&self, appointment_id: Uuid) -> Result<Option<Appointment>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .appointments
            .iter()
            .find(|a| a.id == appointment_id)
            .cloned())
    }

    async fn find_by_doctor_on(&self, doctor_id: Uuid, date: NaiveDate) -> Result<Vec<Appointment>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .appointments
            .iter()
            .filter(|a| a.doctor_id == doctor_id && a.date == date)
            .cloned()
            .collect())
    }

    async fn find_by_doctor(&self, doctor_id: Uuid) -> Result<Vec<Appointment>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .appointments
            .iter()
            .filter(|a| a.doctor_id == doctor_id)
            .cloned()
            .collect())
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Appointment>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .appointments
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update_status(
        &self,
        appointment_id: Uuid,
        status: AppointmentStatus,
        refunded: bool,
    ) -> Result<Option<Appointment>> {
        let mut tables = self.tables.lock().unwrap();
        if std::mem::take(&mut tables.fail_next_appointment_update) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        let stored = tables
            .appointments
            .iter_mut()
            .find(|a| a.id == appointment_id && a.status == AppointmentStatus::Pending);
        Ok(stored.map(|a| {
            a.status = status;
            a.refunded = refunded;
            a.updated_at = Utc::now();
            a.clone()
        }))
    }

    async fn find_approved_updated_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .appointments
            .iter()
            .filter(|a| {
                a.status == AppointmentStatus::Approved
                    && a.updated_at >= start
                    && a.updated_at <= end
            })
            .cloned()
            .collect())
    }
}

#[derive(Debug, Clone)]
pub struct RecordedCharge {
    pub amount: i64,
    pub currency: String,
    pub idempotency_key: String,
    pub payment_id: String,
}

#[derive(Debug, Clone)]
pub struct RecordedRefund {
    pub payment_id: String,
    pub idempotency_key: String,
}

#[derive(Default)]
struct Ledger {
    charges: Vec<RecordedCharge>,
    refunds: Vec<RecordedRefund>,
}

/// Records every call; either side can be switched to fail. Refunds behave like the
/// processor: a repeated idempotency key replays the earlier success, while a second
/// refund of the same charge under a new key is refused.
#[derive(Clone, Default)]
pub struct FakePayments {
    ledger: Arc<Mutex<Ledger>>,
    fail_charges: bool,
    fail_refunds: bool,
}

impl FakePayments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_charges(mut self) -> Self {
        self.fail_charges = true;
        self
    }

    pub fn failing_refunds(mut self) -> Self {
        self.fail_refunds = true;
        self
    }

    pub fn charges(&self) -> Vec<RecordedCharge> {
        self.ledger.lock().unwrap().charges.clone()
    }

    pub fn refunds(&self) -> Vec<RecordedRefund> {
        self.ledger.lock().unwrap().refunds.clone()
    }
}

#[async_trait]
impl PaymentGateway for FakePayments {
    async fn charge(
        &self,
        amount: i64,
        currency: &str,
        _token: &PaymentToken,
        idempotency_key: &str,
    ) -> Result<String> {
        if self.fail_charges {
            return Err(AppError::Payment("Your card was declined.".to_string()));
        }
        let payment_id = format!("ch_{}", Uuid::new_v4().simple());
        self.ledger.lock().unwrap().charges.push(RecordedCharge {
            amount,
            currency: currency.to_string(),
            idempotency_key: idempotency_key.to_string(),
            payment_id: payment_id.clone(),
        });
        Ok(payment_id)
    }

    async fn refund(&self, payment_id: &str, idempotency_key: &str) -> Result<()> {
        if self.fail_refunds {
            return Err(AppError::Payment("Refund could not be processed".to_string()));
        }
        let mut ledger = self.ledger.lock().unwrap();
        if let Some(earlier) = ledger.refunds.iter().find(|r| r.payment_id == payment_id) {
            if earlier.idempotency_key == idempotency_key {
                return Ok(());
            }
            return Err(AppError::Payment(format!(
                "Charge {} has already been refunded.",
                payment_id
            )));
        }
        ledger.refunds.push(RecordedRefund {
            payment_id: payment_id.to_string(),
            idempotency_key: idempotency_key.to_string(),
        });
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct RecordingMailer {
    sent: Arc<Mutex<Vec<EmailMessage>>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailSender for RecordingMailer {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".into(),
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: "test-secret".into(),
        jwt_expiration_hours: 24,
        bcrypt_cost: TEST_BCRYPT_COST,
        stripe_secret_key: "sk_test".into(),
        stripe_api_base: "http://127.0.0.1:0".into(),
        payment_currency: "pkr".into(),
        mail_api_url: None,
        mail_api_key: None,
        mail_from: "no-reply@localhost".into(),
        contact_recipient: "admin@localhost".into(),
    }
}

pub fn test_state(store: &MemoryStore, payments: &FakePayments, mailer: &RecordingMailer) -> AppState {
    AppState::new(
        Arc::new(test_config()),
        store.users(),
        store.doctors(),
        store.appointments(),
        Arc::new(payments.clone()),
        Arc::new(mailer.clone()),
    )
}
