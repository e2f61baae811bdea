//! # API REST
//!
//! REST API for the hospital management service.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - Bearer token checks on protected routes
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON bodies, status codes, CORS)
//!
//! Business rules live in `hms-core`; the handlers here decode requests, call one core
//! service and map the outcome to a response.

#![warn(rust_2018_idioms)]

pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;

#[cfg(test)]
mod tests;

use axum::routing::{get, patch, post};
use axum::Router;
use hms_core::repositories::{
    AppointmentService, DoctorService, InvoiceService, PatientService, PrescriptionService,
};
use hms_core::{CoreConfig, DocumentStore, TokenService};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

pub use error::ApiError;

/// Application state shared by all handlers.
///
/// Services are cheap to build and are constructed per request from these handles.
#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<CoreConfig>,
    pub store: Arc<dyn DocumentStore>,
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(cfg: Arc<CoreConfig>, store: Arc<dyn DocumentStore>) -> Self {
        let tokens = TokenService::from_config(&cfg);
        Self { cfg, store, tokens }
    }

    pub fn patients(&self) -> PatientService {
        PatientService::new(self.cfg.clone(), self.store.clone(), self.tokens.clone())
    }

    pub fn doctors(&self) -> DoctorService {
        DoctorService::new(self.cfg.clone(), self.store.clone())
    }

    pub fn appointments(&self) -> AppointmentService {
        AppointmentService::new(self.cfg.clone(), self.store.clone())
    }

    pub fn prescriptions(&self) -> PrescriptionService {
        PrescriptionService::new(self.cfg.clone(), self.store.clone())
    }

    pub fn invoices(&self) -> InvoiceService {
        InvoiceService::new(self.cfg.clone(), self.store.clone())
    }
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::patients::signup,
        handlers::patients::login,
        handlers::patients::refresh,
        handlers::patients::list_patients,
        handlers::patients::get_patient,
        handlers::patients::update_patient,
        handlers::doctors::list_doctors,
        handlers::doctors::get_doctor,
        handlers::doctors::create_doctor,
        handlers::doctors::update_doctor,
        handlers::appointments::list_appointments,
        handlers::appointments::get_appointment,
        handlers::appointments::create_appointment,
        handlers::appointments::update_appointment,
        handlers::prescriptions::list_prescriptions,
        handlers::prescriptions::get_prescription,
        handlers::prescriptions::create_prescription,
        handlers::prescriptions::update_prescription,
        handlers::invoices::list_invoices,
        handlers::invoices::get_invoice,
        handlers::invoices::create_invoice,
        handlers::invoices::update_invoice,
    ),
    components(schemas(
        api_shared::HealthRes,
        api_shared::ErrorRes,
        api_shared::FieldErrorRes,
        hms_core::InsertOneResult,
        hms_core::UpdateResult,
        hms_core::TokenPair,
        hms_core::models::Patient,
        hms_core::models::SignupRequest,
        hms_core::models::LoginRequest,
        hms_core::models::RefreshRequest,
        hms_core::models::PatientUpdateRequest,
        hms_core::models::Doctor,
        hms_core::models::DoctorRequest,
        hms_core::models::Appointment,
        hms_core::models::AppointmentRequest,
        hms_core::models::Prescription,
        hms_core::models::PrescriptionRequest,
        hms_core::models::Invoice,
        hms_core::models::InvoiceRequest,
        hms_core::models::PaymentMethod,
        hms_core::models::PaymentStatus,
        hms_core::pagination::PatientPage,
        hms_core::pagination::DoctorPage,
        hms_core::pagination::AppointmentPage,
        hms_core::pagination::PrescriptionPage,
        hms_core::pagination::InvoicePage,
    )),
    modifiers(&BearerAuth)
)]
pub struct ApiDoc;

/// Builds the full application router.
///
/// Health, signup, login and refresh are public; every other route goes through
/// [`middleware::require_auth`]. The misspelled `/appoinments`, `/appoinment/:id` and
/// `/precription` paths are part of the published API.
pub fn router(state: AppState) -> Router {
    use handlers::{appointments, doctors, health, invoices, patients, prescriptions};

    let protected = Router::new()
        .route("/patients", get(patients::list_patients))
        .route(
            "/patients/:patient_id",
            get(patients::get_patient).patch(patients::update_patient),
        )
        .route(
            "/doctors",
            get(doctors::list_doctors).post(doctors::create_doctor),
        )
        .route(
            "/doctors/:doctor_id",
            get(doctors::get_doctor).patch(doctors::update_doctor),
        )
        .route("/appoinments", get(appointments::list_appointments))
        .route(
            "/appoinment/:appointment_id",
            get(appointments::get_appointment),
        )
        .route("/appointment", post(appointments::create_appointment))
        .route(
            "/appointment/:appointment_id",
            patch(appointments::update_appointment),
        )
        .route("/prescriptions", get(prescriptions::list_prescriptions))
        .route(
            "/prescription/:prescription_id",
            get(prescriptions::get_prescription).patch(prescriptions::update_prescription),
        )
        .route("/precription", post(prescriptions::create_prescription))
        .route(
            "/invoices",
            get(invoices::list_invoices).post(invoices::create_invoice),
        )
        .route(
            "/invoices/:invoice_id",
            get(invoices::get_invoice).patch(invoices::update_invoice),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    Router::new()
        .route("/health", get(health::health))
        .route("/patients/signup", post(patients::signup))
        .route("/patients/login", post(patients::login))
        .route("/patients/refresh", post(patients::refresh))
        .merge(protected)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
