use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::AppState;
use api_shared::ErrorRes;
use axum::extract::{Path, Query, State};
use axum::Json;
use hms_core::models::{Invoice, InvoiceRequest};
use hms_core::pagination::InvoicePage;
use hms_core::{InsertOneResult, PageQuery, Pagination, UpdateResult};

#[utoipa::path(
    get,
    path = "/invoices",
    tag = "invoices",
    params(PageQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "One page of invoices", body = InvoicePage),
        (status = 401, description = "Missing or invalid token", body = ErrorRes),
        (status = 500, description = "Listing failed", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn list_invoices(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<InvoicePage>, ApiError> {
    state
        .invoices()
        .list(Pagination::from_query(&query))
        .await
        .map(Json)
        .map_err(|e| ApiError::from_core(e, "error occurred while listing invoices"))
}

#[utoipa::path(
    get,
    path = "/invoices/{invoice_id}",
    tag = "invoices",
    params(("invoice_id" = String, Path, description = "Invoice identifier")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The invoice", body = Invoice),
        (status = 400, description = "Malformed identifier", body = ErrorRes),
        (status = 401, description = "Missing or invalid token", body = ErrorRes),
        (status = 500, description = "Invoice not found or store failure", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<String>,
) -> Result<Json<Invoice>, ApiError> {
    state
        .invoices()
        .get(&invoice_id)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_core(e, "error occurred while fetching the invoice"))
}

#[utoipa::path(
    post,
    path = "/invoices",
    tag = "invoices",
    request_body = InvoiceRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Invoice created", body = InsertOneResult),
        (status = 400, description = "Malformed body or invalid fields", body = ErrorRes),
        (status = 401, description = "Missing or invalid token", body = ErrorRes),
        (status = 500, description = "Insert failed", body = ErrorRes)
    )
)]
/// Raise an invoice. `payment_status` is required; `payment_method` may be empty.
#[axum::debug_handler]
pub async fn create_invoice(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<InvoiceRequest>,
) -> Result<Json<InsertOneResult>, ApiError> {
    state
        .invoices()
        .create(&req)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_core(e, "invoice item was not created"))
}

#[utoipa::path(
    patch,
    path = "/invoices/{invoice_id}",
    tag = "invoices",
    params(("invoice_id" = String, Path, description = "Invoice identifier")),
    request_body = InvoiceRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Update outcome", body = UpdateResult),
        (status = 400, description = "Malformed body, identifier or fields", body = ErrorRes),
        (status = 401, description = "Missing or invalid token", body = ErrorRes),
        (status = 500, description = "Update failed", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn update_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<String>,
    JsonBody(req): JsonBody<InvoiceRequest>,
) -> Result<Json<UpdateResult>, ApiError> {
    state
        .invoices()
        .update(&invoice_id, &req)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_core(e, "invoice update failed"))
}
