use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::AppState;
use api_shared::ErrorRes;
use axum::extract::{Path, Query, State};
use axum::Json;
use hms_core::models::{Appointment, AppointmentRequest};
use hms_core::pagination::AppointmentPage;
use hms_core::{InsertOneResult, PageQuery, Pagination, UpdateResult};

#[utoipa::path(
    get,
    path = "/appoinments",
    tag = "appointments",
    params(PageQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "One page of appointments", body = AppointmentPage),
        (status = 401, description = "Missing or invalid token", body = ErrorRes),
        (status = 500, description = "Listing failed", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<AppointmentPage>, ApiError> {
    state
        .appointments()
        .list(Pagination::from_query(&query))
        .await
        .map(Json)
        .map_err(|e| ApiError::from_core(e, "error occurred while listing appointments"))
}

#[utoipa::path(
    get,
    path = "/appoinment/{appointment_id}",
    tag = "appointments",
    params(("appointment_id" = String, Path, description = "Appointment identifier")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The appointment", body = Appointment),
        (status = 400, description = "Malformed identifier", body = ErrorRes),
        (status = 401, description = "Missing or invalid token", body = ErrorRes),
        (status = 500, description = "Appointment not found or store failure", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<AppState>,
    Path(appointment_id): Path<String>,
) -> Result<Json<Appointment>, ApiError> {
    state
        .appointments()
        .get(&appointment_id)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_core(e, "error occurred while fetching the appointment"))
}

#[utoipa::path(
    post,
    path = "/appointment",
    tag = "appointments",
    request_body = AppointmentRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Appointment created", body = InsertOneResult),
        (status = 400, description = "Malformed body or invalid fields", body = ErrorRes),
        (status = 401, description = "Missing or invalid token", body = ErrorRes),
        (status = 500, description = "Doctor not found or insert failed", body = ErrorRes)
    )
)]
/// Book an appointment. A given `doctor_id` must name an existing doctor.
#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<AppointmentRequest>,
) -> Result<Json<InsertOneResult>, ApiError> {
    state
        .appointments()
        .create(&req)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_core(e, "appointment item was not created"))
}

#[utoipa::path(
    patch,
    path = "/appointment/{appointment_id}",
    tag = "appointments",
    params(("appointment_id" = String, Path, description = "Appointment identifier")),
    request_body = AppointmentRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Update outcome", body = UpdateResult),
        (status = 400, description = "Malformed body, identifier or fields", body = ErrorRes),
        (status = 401, description = "Missing or invalid token", body = ErrorRes),
        (status = 500, description = "Doctor not found or update failed", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn update_appointment(
    State(state): State<AppState>,
    Path(appointment_id): Path<String>,
    JsonBody(req): JsonBody<AppointmentRequest>,
) -> Result<Json<UpdateResult>, ApiError> {
    state
        .appointments()
        .update(&appointment_id, &req)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_core(e, "appointment update failed"))
}
