//! Report endpoint

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use tracing::info;

use crate::api::ApiError;
use crate::report::bundle;
use crate::service::TaxFormFilter;
use crate::AppState;

/// GET /tax-forms/report
///
/// Same filters as the list endpoint. Exactly one match for an explicitly
/// requested employee returns a standalone PDF; anything else returns a ZIP
/// with one PDF per matched record.
pub async fn generate_report(
    State(state): State<AppState>,
    Query(filter): Query<TaxFormFilter>,
) -> Result<Response, ApiError> {
    info!("Generating tax form report");

    let records = state.service.list(&filter).await?;
    let output = bundle(&records, filter.employee_id)?;

    let headers = [
        (header::CONTENT_TYPE, output.content_type.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", output.filename),
        ),
    ];
    Ok((headers, output.bytes).into_response())
}
