use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::AppState;
use api_shared::ErrorRes;
use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use hms_core::models::{Doctor, DoctorRequest};
use hms_core::pagination::DoctorPage;
use hms_core::{Claims, InsertOneResult, PageQuery, Pagination, UpdateResult};

#[utoipa::path(
    get,
    path = "/doctors",
    tag = "doctors",
    params(PageQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "One page of doctors", body = DoctorPage),
        (status = 401, description = "Missing or invalid token", body = ErrorRes),
        (status = 500, description = "Listing failed", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn list_doctors(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<DoctorPage>, ApiError> {
    state
        .doctors()
        .list(Pagination::from_query(&query))
        .await
        .map(Json)
        .map_err(|e| ApiError::from_core(e, "error occurred while listing doctors"))
}

#[utoipa::path(
    get,
    path = "/doctors/{doctor_id}",
    tag = "doctors",
    params(("doctor_id" = String, Path, description = "Doctor identifier")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The doctor", body = Doctor),
        (status = 400, description = "Malformed identifier", body = ErrorRes),
        (status = 401, description = "Missing or invalid token", body = ErrorRes),
        (status = 500, description = "Doctor not found or store failure", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<AppState>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Doctor>, ApiError> {
    state
        .doctors()
        .get(&doctor_id)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_core(e, "error occurred while fetching the doctor"))
}

#[utoipa::path(
    post,
    path = "/doctors",
    tag = "doctors",
    request_body = DoctorRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Doctor created", body = InsertOneResult),
        (status = 400, description = "Malformed body or invalid fields", body = ErrorRes),
        (status = 401, description = "Missing or invalid token", body = ErrorRes),
        (status = 500, description = "Insert failed", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn create_doctor(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    JsonBody(req): JsonBody<DoctorRequest>,
) -> Result<Json<InsertOneResult>, ApiError> {
    let created = state
        .doctors()
        .create(&req)
        .await
        .map_err(|e| ApiError::from_core(e, "doctor item was not created"))?;
    tracing::info!("-- Doctor {} created by {}", created.inserted_id, claims.sub);
    Ok(Json(created))
}

#[utoipa::path(
    patch,
    path = "/doctors/{doctor_id}",
    tag = "doctors",
    params(("doctor_id" = String, Path, description = "Doctor identifier")),
    request_body = DoctorRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Update outcome", body = UpdateResult),
        (status = 400, description = "Malformed body, identifier or fields", body = ErrorRes),
        (status = 401, description = "Missing or invalid token", body = ErrorRes),
        (status = 500, description = "Update failed", body = ErrorRes)
    )
)]
/// Update a doctor's name and/or speciality. Absent fields are left as stored.
#[axum::debug_handler]
pub async fn update_doctor(
    State(state): State<AppState>,
    Path(doctor_id): Path<String>,
    JsonBody(req): JsonBody<DoctorRequest>,
) -> Result<Json<UpdateResult>, ApiError> {
    state
        .doctors()
        .update(&doctor_id, &req)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_core(e, "doctor update failed"))
}
