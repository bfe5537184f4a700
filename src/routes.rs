use crate::{
    admin::{self, admin_middleware::admin_authorization},
    appointment::{self, appointment_dto, appointment_models, availability},
    auth::{self, auth_dto},
    contact::{self, contact_dto},
    doctor::{self, doctor_dto, doctor_models},
    dto::ApiResponse,
    middleware::auth_middleware,
    notification::{self, notification_models},
    payment::PaymentToken,
    state::AppState,
    user::{self, user_models},
};
use axum::{
    middleware,
    response::IntoResponse,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::auth_handlers::register,
        auth::auth_handlers::login,
        user::user_handlers::get_current_user,
        notification::notification_handlers::mark_all_notifications_seen,
        notification::notification_handlers::clear_all_notifications,
        doctor::doctor_handlers::apply_doctor_account,
        doctor::doctor_handlers::get_approved_doctors,
        doctor::doctor_handlers::get_own_doctor_info,
        doctor::doctor_handlers::get_doctor_by_id,
        doctor::doctor_handlers::update_doctor_profile,
        appointment::appointment_handlers::check_booking_availability,
        appointment::appointment_handlers::book_appointment,
        appointment::appointment_handlers::get_user_appointments,
        appointment::appointment_handlers::get_doctor_appointments,
        appointment::appointment_handlers::change_appointment_status,
        admin::admin_handlers::list_users,
        admin::admin_handlers::list_doctors,
        admin::admin_handlers::change_doctor_status,
        admin::admin_handlers::get_stats,
        contact::contact_handlers::send_contact_email,
    ),
    components(
        schemas(
            auth_dto::RegisterRequest,
            auth_dto::LoginRequest,
            user_models::UserResponse,
            notification_models::Notification,
            notification_models::NotificationKind,
            doctor_models::Doctor,
            doctor_models::DoctorStatus,
            doctor_dto::DoctorProfileRequest,
            doctor_dto::ChangeDoctorStatusRequest,
            appointment_models::Appointment,
            appointment_models::AppointmentStatus,
            appointment_models::DoctorSnapshot,
            appointment_models::PatientSnapshot,
            appointment_dto::AvailabilityRequest,
            appointment_dto::BookAppointmentRequest,
            appointment_dto::ChangeAppointmentStatusRequest,
            availability::Availability,
            admin::admin_dto::DoctorStats,
            admin::admin_dto::StatsReport,
            contact_dto::ContactRequest,
            PaymentToken,
        )
    ),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "users", description = "Signed-in user endpoints"),
        (name = "notifications", description = "Notification inbox endpoints"),
        (name = "doctors", description = "Doctor accounts and profiles"),
        (name = "appointments", description = "Availability, booking and appointment decisions"),
        (name = "admin", description = "Administration and statistics"),
        (name = "contact", description = "Public contact form")
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::Http::new(
                        utoipa::openapi::security::HttpAuthScheme::Bearer,
                    ),
                ),
            )
        }
    }
}

async fn health() -> impl IntoResponse {
    ApiResponse::message("Doctor appointment service is running")
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let user_public = Router::new()
        .route("/register", post(auth::auth_handlers::register))
        .route("/login", post(auth::auth_handlers::login));

    // Protected routes (auth required)
    let user_protected = Router::new()
        .route("/me", get(user::user_handlers::get_current_user))
        .route(
            "/apply-doctor-account",
            post(doctor::doctor_handlers::apply_doctor_account),
        )
        .route(
            "/approved-doctors",
            get(doctor::doctor_handlers::get_approved_doctors),
        )
        .route(
            "/check-booking-availability",
            post(appointment::appointment_handlers::check_booking_availability),
        )
        .route(
            "/book-appointment",
            post(appointment::appointment_handlers::book_appointment),
        )
        .route(
            "/appointments",
            get(appointment::appointment_handlers::get_user_appointments),
        )
        .route(
            "/notifications/mark-all-seen",
            post(notification::notification_handlers::mark_all_notifications_seen),
        )
        .route(
            "/notifications",
            delete(notification::notification_handlers::clear_all_notifications),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let doctor_routes = Router::new()
        .route(
            "/me",
            get(doctor::doctor_handlers::get_own_doctor_info)
                .put(doctor::doctor_handlers::update_doctor_profile),
        )
        .route(
            "/appointments",
            get(appointment::appointment_handlers::get_doctor_appointments),
        )
        .route(
            "/appointments/:id/status",
            post(appointment::appointment_handlers::change_appointment_status),
        )
        .route("/:id", get(doctor::doctor_handlers::get_doctor_by_id))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Stats stay reachable without a session
    let admin_public = Router::new().route("/stats", get(admin::admin_handlers::get_stats));

    // Admin routes: auth runs first, then the role check
    let admin_protected = Router::new()
        .route("/users", get(admin::admin_handlers::list_users))
        .route("/doctors", get(admin::admin_handlers::list_doctors))
        .route(
            "/doctors/:id/status",
            post(admin::admin_handlers::change_doctor_status),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin_authorization,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine all routes
    let api_routes = Router::new()
        .nest("/user", user_public.merge(user_protected))
        .nest("/doctor", doctor_routes)
        .nest("/admin", admin_public.merge(admin_protected))
        .route(
            "/send-email",
            post(contact::contact_handlers::send_contact_email),
        );

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(health))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::create_session_token,
        testing::{test_state, FakePayments, MemoryStore, RecordingMailer},
    };
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    struct TestApp {
        store: MemoryStore,
        payments: FakePayments,
        mailer: RecordingMailer,
    }

    impl TestApp {
        fn new() -> Self {
            Self {
                store: MemoryStore::new(),
                payments: FakePayments::new(),
                mailer: RecordingMailer::default(),
            }
        }

        fn router(&self) -> Router {
            create_router(test_state(&self.store, &self.payments, &self.mailer))
        }

        fn token_for(&self, user_id: Uuid) -> String {
            create_session_token(user_id, "test-secret", 24).unwrap()
        }

        async fn send(
            &self,
            method: Method,
            uri: &str,
            token: Option<&str>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut request = Request::builder().method(method).uri(uri);
            if let Some(token) = token {
                request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
            }
            let request = match body {
                Some(body) => request
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
                None => request.body(Body::empty()).unwrap(),
            };

            let response = self.router().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
            (status, value)
        }
    }

    #[tokio::test]
    async fn health_check_is_public() {
        let app = TestApp::new();
        let (status, body) = app.send(Method::GET, "/", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
    }

    #[tokio::test]
    async fn register_login_and_fetch_profile() {
        let app = TestApp::new();
        let credentials = json!({ "email": "ali@example.com", "password": "secret1" });

        let (status, body) = app
            .send(
                Method::POST,
                "/api/user/register",
                None,
                Some(json!({ "name": "Ali", "email": "ali@example.com", "password": "secret1" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "User created successfully");

        let (_, body) = app
            .send(Method::POST, "/api/user/login", None, Some(credentials))
            .await;
        assert_eq!(body["success"], true);
        let token = body["data"].as_str().unwrap().to_string();

        let (status, body) = app
            .send(Method::GET, "/api/user/me", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["email"], "ali@example.com");
        assert!(body["data"].get("password_hash").is_none());
    }

    #[tokio::test]
    async fn duplicate_registration_is_unsuccessful_with_ok_status() {
        let app = TestApp::new();
        app.store.insert_user("Ali", "ali@example.com");

        let (status, body) = app
            .send(
                Method::POST,
                "/api/user/register",
                None,
                Some(json!({ "name": "Ali", "email": "ali@example.com", "password": "secret1" })),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "User already exists");
        assert_eq!(body["kind"], "conflict");
    }

    #[tokio::test]
    async fn wrong_password_is_unsuccessful_with_ok_status() {
        let app = TestApp::new();
        app.send(
            Method::POST,
            "/api/user/register",
            None,
            Some(json!({ "name": "Ali", "email": "ali@example.com", "password": "secret1" })),
        )
        .await;

        let (status, body) = app
            .send(
                Method::POST,
                "/api/user/login",
                None,
                Some(json!({ "email": "ali@example.com", "password": "wrong-one" })),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Password is incorrect");
    }

    #[tokio::test]
    async fn protected_routes_need_a_valid_token() {
        let app = TestApp::new();

        let (status, body) = app.send(Method::GET, "/api/user/me", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["kind"], "unauthorized");

        let (status, _) = app
            .send(Method::GET, "/api/doctor/appointments", Some("garbage"), None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn admin_routes_check_the_stored_role() {
        let app = TestApp::new();
        let patient = app.store.insert_user("Ali", "ali@example.com");
        let admin = app.store.insert_admin("Admin", "admin@example.com");

        let (status, body) = app
            .send(
                Method::GET,
                "/api/admin/users",
                Some(&app.token_for(patient.id)),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["kind"], "forbidden");

        let (status, body) = app
            .send(
                Method::GET,
                "/api/admin/users",
                Some(&app.token_for(admin.id)),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn stats_are_public() {
        let app = TestApp::new();

        let (status, body) = app
            .send(
                Method::GET,
                "/api/admin/stats?start=2020-01-01T00:00:00Z&end=2099-12-31T00:00:00Z",
                None,
                None,
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["results"], 0);
    }

    #[tokio::test]
    async fn doctor_application_and_approval_flow() {
        let app = TestApp::new();
        let admin = app.store.insert_admin("Admin", "admin@example.com");
        let applicant = app.store.insert_user("Sara", "sara@example.com");
        let applicant_token = app.token_for(applicant.id);

        let (_, body) = app
            .send(
                Method::POST,
                "/api/user/apply-doctor-account",
                Some(&applicant_token),
                Some(json!({
                    "first_name": "Sara",
                    "last_name": "Khan",
                    "phone_number": "0300",
                    "address": "Lahore",
                    "specialization": "Cardiology",
                    "experience": "7 years",
                    "fee_per_consultation": 1500,
                    "timings": ["09:00", "17:00"]
                })),
            )
            .await;
        assert_eq!(body["success"], true);
        let doctor_id = body["data"]["id"].as_str().unwrap().to_string();
        assert_eq!(app.store.user(admin.id).unseen_notifications.len(), 1);

        let (_, body) = app
            .send(
                Method::POST,
                &format!("/api/admin/doctors/{}/status", doctor_id),
                Some(&app.token_for(admin.id)),
                Some(json!({ "status": "approved" })),
            )
            .await;
        assert_eq!(body["data"]["status"], "approved");
        assert!(app.store.user(applicant.id).is_doctor);

        let (_, body) = app
            .send(Method::GET, "/api/doctor/me", Some(&applicant_token), None)
            .await;
        assert_eq!(body["data"]["id"], doctor_id);
    }

    #[tokio::test]
    async fn booking_over_http() {
        let app = TestApp::new();
        let owner = app.store.insert_user("Sara", "sara@example.com");
        let doctor = app.store.insert_doctor(owner.id);
        let patient = app.store.insert_user("Ali", "ali@example.com");
        let token = app.token_for(patient.id);

        let (_, body) = app
            .send(
                Method::POST,
                "/api/user/check-booking-availability",
                Some(&token),
                Some(json!({ "doctor_id": doctor.id, "date": "10-03-2099", "time": "08:00" })),
            )
            .await;
        assert_eq!(body["success"], false);
        assert_eq!(body["data"]["available"], false);

        let (status, body) = app
            .send(
                Method::POST,
                "/api/user/book-appointment",
                Some(&token),
                Some(json!({
                    "doctor_id": doctor.id,
                    "date": "10-03-2099",
                    "time": "10:00 AM",
                    "token": { "id": "tok_visa", "email": "ali@example.com" }
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Appointment booked successfully with Dr. Sara Khan");
        assert_eq!(app.payments.charges().len(), 1);

        let (_, body) = app
            .send(
                Method::GET,
                "/api/doctor/appointments?name=ali",
                Some(&app.token_for(owner.id)),
                None,
            )
            .await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn malformed_booking_date_is_a_bad_request() {
        let app = TestApp::new();
        let patient = app.store.insert_user("Ali", "ali@example.com");

        let (status, body) = app
            .send(
                Method::POST,
                "/api/user/check-booking-availability",
                Some(&app.token_for(patient.id)),
                Some(json!({ "doctor_id": Uuid::new_v4(), "date": "2099-03-10", "time": "10:00" })),
            )
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "validation");
    }

    #[tokio::test]
    async fn contact_form_is_mailed_to_recipient() {
        let app = TestApp::new();

        let (status, body) = app
            .send(
                Method::POST,
                "/api/send-email",
                None,
                Some(json!({
                    "name": "Ali",
                    "email": "ali@example.com",
                    "phone_number": "0300",
                    "description": "Question about fees"
                })),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Email sent successfully");
        let sent = app.mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "admin@localhost");
    }
}
