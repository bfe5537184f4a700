mod admin;
mod appointment;
mod auth;
mod contact;
mod db;
mod doctor;
mod dto;
mod error;
mod middleware;
mod notification;
mod payment;
mod routes;
mod schedule;
mod state;
mod user;

#[cfg(test)]
mod testing;

use anyhow::Context;
use appointment::appointment_repository::PgAppointmentRepository;
use contact::mailer::{EmailSender, HttpMailer, LogMailer};
use db::{create_pool, run_migrations};
use doctor::doctor_repository::PgDoctorRepository;
use payment::StripeGateway;
use routes::create_router;
use state::{AppState, Config};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use user::user_repository::PgUserRepository;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,doctor_appointments=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(Config::from_env()?);

    tracing::info!("Connecting to database...");
    let db = create_pool(&config.database_url)
        .await
        .context("failed to connect to database")?;

    tracing::info!("Running migrations...");
    run_migrations(&db)
        .await
        .context("failed to run migrations")?;

    let payments = StripeGateway::new(&config.stripe_api_base, &config.stripe_secret_key)
        .context("failed to build payment client")?;

    let mailer: Arc<dyn EmailSender> = match &config.mail_api_url {
        Some(url) => Arc::new(HttpMailer::new(url.clone(), config.mail_api_key.clone())),
        None => {
            tracing::warn!("MAIL_API_URL not set, contact emails will only be logged");
            Arc::new(LogMailer)
        }
    };

    let state = AppState::new(
        config.clone(),
        Arc::new(PgUserRepository::new(db.clone())),
        Arc::new(PgDoctorRepository::new(db.clone())),
        Arc::new(PgAppointmentRepository::new(db)),
        Arc::new(payments),
        mailer,
    );

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Server starting on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
