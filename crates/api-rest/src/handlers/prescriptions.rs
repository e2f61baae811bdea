use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::AppState;
use api_shared::ErrorRes;
use axum::extract::{Path, Query, State};
use axum::Json;
use hms_core::models::{Prescription, PrescriptionRequest};
use hms_core::pagination::PrescriptionPage;
use hms_core::{InsertOneResult, PageQuery, Pagination, UpdateResult};

#[utoipa::path(
    get,
    path = "/prescriptions",
    tag = "prescriptions",
    params(PageQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "One page of prescriptions", body = PrescriptionPage),
        (status = 401, description = "Missing or invalid token", body = ErrorRes),
        (status = 500, description = "Listing failed", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn list_prescriptions(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PrescriptionPage>, ApiError> {
    state
        .prescriptions()
        .list(Pagination::from_query(&query))
        .await
        .map(Json)
        .map_err(|e| ApiError::from_core(e, "error occurred while listing prescriptions"))
}

#[utoipa::path(
    get,
    path = "/prescription/{prescription_id}",
    tag = "prescriptions",
    params(("prescription_id" = String, Path, description = "Prescription identifier")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The prescription", body = Prescription),
        (status = 400, description = "Malformed identifier", body = ErrorRes),
        (status = 401, description = "Missing or invalid token", body = ErrorRes),
        (status = 500, description = "Prescription not found or store failure", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn get_prescription(
    State(state): State<AppState>,
    Path(prescription_id): Path<String>,
) -> Result<Json<Prescription>, ApiError> {
    state
        .prescriptions()
        .get(&prescription_id)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_core(e, "error occurred while fetching the prescription"))
}

#[utoipa::path(
    post,
    path = "/precription",
    tag = "prescriptions",
    request_body = PrescriptionRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Prescription created", body = InsertOneResult),
        (status = 400, description = "Malformed body or invalid fields", body = ErrorRes),
        (status = 401, description = "Missing or invalid token", body = ErrorRes),
        (status = 500, description = "Bad time span, unknown doctor or insert failure", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn create_prescription(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<PrescriptionRequest>,
) -> Result<Json<InsertOneResult>, ApiError> {
    state
        .prescriptions()
        .create(&req)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_core(e, "prescription was not created"))
}

#[utoipa::path(
    patch,
    path = "/prescription/{prescription_id}",
    tag = "prescriptions",
    params(("prescription_id" = String, Path, description = "Prescription identifier")),
    request_body = PrescriptionRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Update outcome", body = UpdateResult),
        (status = 400, description = "Malformed body, identifier or fields", body = ErrorRes),
        (status = 401, description = "Missing or invalid token", body = ErrorRes),
        (status = 500, description = "Bad time span or update failure", body = ErrorRes)
    )
)]
/// Update a prescription. `start_date` and `end_date` must be sent together; the course
/// must start in the future and end after it starts.
#[axum::debug_handler]
pub async fn update_prescription(
    State(state): State<AppState>,
    Path(prescription_id): Path<String>,
    JsonBody(req): JsonBody<PrescriptionRequest>,
) -> Result<Json<UpdateResult>, ApiError> {
    state
        .prescriptions()
        .update(&prescription_id, &req)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_core(e, "prescription update failed"))
}
