//! Patient endpoints: signup, login, refresh and the record routes.

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::AppState;
use api_shared::ErrorRes;
use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use hms_core::models::{
    LoginRequest, Patient, PatientUpdateRequest, RefreshRequest, SignupRequest,
};
use hms_core::pagination::PatientPage;
use hms_core::{Claims, InsertOneResult, PageQuery, Pagination, TokenPair, UpdateResult};

#[utoipa::path(
    post,
    path = "/patients/signup",
    tag = "patients",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Patient registered", body = InsertOneResult),
        (status = 400, description = "Malformed body or invalid fields", body = ErrorRes),
        (status = 500, description = "Email or phone already registered, or store failure", body = ErrorRes)
    )
)]
/// Register a new patient.
///
/// The password is stored as an Argon2id hash. Email and phone must not belong to an
/// existing patient.
#[axum::debug_handler]
pub async fn signup(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<SignupRequest>,
) -> Result<Json<InsertOneResult>, ApiError> {
    let created = state
        .patients()
        .signup(&req)
        .await
        .map_err(|e| ApiError::from_core(e, "patient item was not created"))?;
    tracing::info!("-- Registered patient {}", created.inserted_id);
    Ok(Json(created))
}

#[utoipa::path(
    post,
    path = "/patients/login",
    tag = "patients",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Patient with a fresh token pair", body = Patient),
        (status = 400, description = "Malformed body", body = ErrorRes),
        (status = 500, description = "Login or password is incorrect", body = ErrorRes)
    )
)]
/// Log a patient in and issue a new access/refresh token pair.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Json<Patient>, ApiError> {
    state
        .patients()
        .login(&req)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_core(e, "login failed"))
}

#[utoipa::path(
    post,
    path = "/patients/refresh",
    tag = "patients",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New token pair", body = TokenPair),
        (status = 400, description = "Malformed body", body = ErrorRes),
        (status = 401, description = "Refresh token invalid, expired or superseded", body = ErrorRes)
    )
)]
/// Exchange the current refresh token for a new token pair.
#[axum::debug_handler]
pub async fn refresh(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RefreshRequest>,
) -> Result<Json<TokenPair>, ApiError> {
    state
        .patients()
        .refresh(&req)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_core(e, "token refresh failed"))
}

#[utoipa::path(
    get,
    path = "/patients",
    tag = "patients",
    params(PageQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "One page of patients", body = PatientPage),
        (status = 401, description = "Missing or invalid token", body = ErrorRes),
        (status = 500, description = "Listing failed", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn list_patients(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PatientPage>, ApiError> {
    state
        .patients()
        .list(Pagination::from_query(&query))
        .await
        .map(Json)
        .map_err(|e| ApiError::from_core(e, "error occurred while listing patients"))
}

#[utoipa::path(
    get,
    path = "/patients/{patient_id}",
    tag = "patients",
    params(("patient_id" = String, Path, description = "Patient identifier")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The patient", body = Patient),
        (status = 400, description = "Malformed identifier", body = ErrorRes),
        (status = 401, description = "Missing or invalid token", body = ErrorRes),
        (status = 500, description = "Patient not found or store failure", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> Result<Json<Patient>, ApiError> {
    state
        .patients()
        .get(&patient_id)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_core(e, "error occurred while fetching the patient"))
}

#[utoipa::path(
    patch,
    path = "/patients/{patient_id}",
    tag = "patients",
    params(("patient_id" = String, Path, description = "Patient identifier")),
    request_body = PatientUpdateRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Update outcome", body = UpdateResult),
        (status = 400, description = "Malformed body, identifier or fields", body = ErrorRes),
        (status = 401, description = "Missing or invalid token", body = ErrorRes),
        (status = 403, description = "Token belongs to another patient", body = ErrorRes),
        (status = 500, description = "Update failed", body = ErrorRes)
    )
)]
/// Update a patient's names. Absent fields are left as stored. Patients may only update
/// their own record.
#[axum::debug_handler]
pub async fn update_patient(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(patient_id): Path<String>,
    JsonBody(req): JsonBody<PatientUpdateRequest>,
) -> Result<Json<UpdateResult>, ApiError> {
    if claims.sub != patient_id {
        tracing::warn!("-- Patient {} tried to update patient {}", claims.sub, patient_id);
        return Err(ApiError::forbidden("patients may only update their own record"));
    }
    let result = state
        .patients()
        .update(&patient_id, &req)
        .await
        .map_err(|e| ApiError::from_core(e, "patient update failed"))?;
    tracing::info!("-- Patient {} updated", patient_id);
    Ok(Json(result))
}
