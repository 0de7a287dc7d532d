//! Tax-form CRU endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use taxform_common::db::TaxFormRecord;
use tracing::info;

use crate::api::ApiError;
use crate::service::TaxFormFilter;
use crate::AppState;

/// GET /tax-forms
///
/// Returns records matching the optional filters, unmodified.
pub async fn list_tax_forms(
    State(state): State<AppState>,
    Query(filter): Query<TaxFormFilter>,
) -> Result<Json<Vec<TaxFormRecord>>, ApiError> {
    info!("Fetching user tax forms");
    let records = state.service.list(&filter).await?;
    Ok(Json(records))
}

/// POST /tax-forms
///
/// Runs the full write pipeline and returns the created record. The body is
/// taken as raw JSON so schema validation sees exactly what the client sent.
pub async fn create_tax_form(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<TaxFormRecord>), ApiError> {
    info!("Creating a new user tax form");
    let created = state.service.create(body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /tax-forms
///
/// Same pipeline as create without the duplicate check.
pub async fn update_tax_form(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<TaxFormRecord>, ApiError> {
    info!("Updating tax form");
    let updated = state.service.update(body).await?;
    Ok(Json(updated))
}
