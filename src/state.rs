use anyhow::Context;
use std::sync::Arc;

use crate::{
    admin::admin_service::AdminService,
    appointment::{appointment_repository::AppointmentRepository, appointment_service::AppointmentService},
    auth::auth_service::AuthService,
    contact::mailer::EmailSender,
    doctor::{doctor_repository::DoctorRepository, doctor_service::DoctorService},
    notification::notification_service::NotificationService,
    payment::PaymentGateway,
    user::{user_repository::UserRepository, user_service::UserService},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub user_repository: Arc<dyn UserRepository>,
    pub mailer: Arc<dyn EmailSender>,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub notification_service: NotificationService,
    pub doctor_service: DoctorService,
    pub appointment_service: AppointmentService,
    pub admin_service: AdminService,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        user_repository: Arc<dyn UserRepository>,
        doctor_repository: Arc<dyn DoctorRepository>,
        appointment_repository: Arc<dyn AppointmentRepository>,
        payments: Arc<dyn PaymentGateway>,
        mailer: Arc<dyn EmailSender>,
    ) -> Self {
        let notification_service = NotificationService::new(user_repository.clone());
        let auth_service = AuthService::new(
            user_repository.clone(),
            config.jwt_secret.clone(),
            config.jwt_expiration_hours,
            config.bcrypt_cost,
        );
        let user_service = UserService::new(user_repository.clone());
        let doctor_service = DoctorService::new(
            doctor_repository.clone(),
            user_repository.clone(),
            notification_service.clone(),
        );
        let appointment_service = AppointmentService::new(
            appointment_repository.clone(),
            doctor_repository.clone(),
            user_repository.clone(),
            payments,
            notification_service.clone(),
            config.payment_currency.clone(),
        );
        let admin_service = AdminService::new(appointment_repository, user_repository.clone());

        Self {
            config,
            user_repository,
            mailer,
            auth_service,
            user_service,
            notification_service,
            doctor_service,
            appointment_service,
            admin_service,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub bcrypt_cost: u32,
    pub stripe_secret_key: String,
    pub stripe_api_base: String,
    pub payment_currency: String,
    pub mail_api_url: Option<String>,
    pub mail_api_key: Option<String>,
    pub mail_from: String,
    pub contact_recipient: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            host: optional("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: optional("PORT")
                .unwrap_or_else(|| "5000".to_string())
                .parse()
                .context("PORT must be a number")?,
            jwt_secret: required("JWT_SECRET")?,
            jwt_expiration_hours: optional("JWT_EXPIRATION_HOURS")
                .unwrap_or_else(|| "24".to_string())
                .parse()
                .context("JWT_EXPIRATION_HOURS must be a number")?,
            bcrypt_cost: match optional("BCRYPT_COST") {
                Some(cost) => cost.parse().context("BCRYPT_COST must be a number")?,
                None => bcrypt::DEFAULT_COST,
            },
            stripe_secret_key: required("STRIPE_SECRET_KEY")?,
            stripe_api_base: optional("STRIPE_API_BASE")
                .unwrap_or_else(|| "https://api.stripe.com".to_string()),
            payment_currency: optional("PAYMENT_CURRENCY")
                .unwrap_or_else(|| "pkr".to_string())
                .to_lowercase(),
            mail_api_url: optional("MAIL_API_URL"),
            mail_api_key: optional("MAIL_API_KEY"),
            mail_from: optional("MAIL_FROM").unwrap_or_else(|| "no-reply@localhost".to_string()),
            contact_recipient: optional("CONTACT_RECIPIENT")
                .unwrap_or_else(|| "admin@localhost".to_string()),
        })
    }
}

fn required(key: &str) -> anyhow::Result<String> {
    std::env::var(key).with_context(|| format!("{} must be set", key))
}

fn optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
