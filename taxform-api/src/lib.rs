#![recursion_limit = "256"]
//! taxform-api library - Tax-form declaration HTTP service
//!
//! Exposes CRU endpoints for per-employee annual tax-declaration records and
//! a report endpoint producing a single PDF or a ZIP of PDFs.

use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod render;
pub mod report;
pub mod service;
pub mod validation;

use service::TaxFormService;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Record-service facade wrapping the database pool
    pub service: TaxFormService,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, default_page_size: i64) -> Self {
        Self {
            service: TaxFormService::new(db, default_page_size),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route(
            "/tax-forms",
            get(api::list_tax_forms)
                .post(api::create_tax_form)
                .put(api::update_tax_form),
        )
        .route("/tax-forms/report", get(api::generate_report))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
