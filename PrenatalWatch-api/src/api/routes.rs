use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::debug;

use prenatal_watch_data::repository::{InMemoryStorage, PatientDirectory};
use prenatal_watch_domain::health::HealthService as DomainHealthService;
use prenatal_watch_domain::services::{create_default_services, CancellationSignal};
use prenatal_watch_domain::TriageConfig;

use crate::api::handlers::{self, health};
use crate::api::state::AppState;
use crate::openapi::configure_swagger_routes;

/// Create the application router over a shared storage
pub fn create_app(storage: InMemoryStorage, config: TriageConfig, shutdown: CancellationSignal) -> Router {
    debug!("Creating application router with {:?}", config);

    let health_service: health::HealthService =
        Arc::new(DomainHealthService::new(PatientDirectory::new(storage.clone())));
    let state = AppState::new(create_default_services(storage, config), shutdown);

    // Specific routes before parametrized ones
    let api_routes = Router::new()
        .route("/roster", get(handlers::get_roster))
        .route("/symptoms/vocabulary", get(handlers::get_symptom_vocabulary))
        .route("/patients/:id", get(handlers::get_patient_detail))
        .route("/patients/:id/summary", get(handlers::get_patient_summary))
        .route("/patients/:id/symptoms", get(handlers::get_symptom_ranking))
        .route(
            "/patients/:id/reports",
            get(handlers::list_reports).post(handlers::create_report),
        )
        .route(
            "/patients/:id/medications",
            get(handlers::list_medications).post(handlers::prescribe_medication),
        )
        .route(
            "/patients/:id/records",
            get(handlers::list_clinical_records).post(handlers::create_clinical_record),
        )
        .route(
            "/patients/:id/guidance",
            get(handlers::list_guidance).post(handlers::send_guidance),
        )
        .route("/medications/:id/toggle", post(handlers::toggle_medication))
        .with_state(state);

    let public_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .layer(Extension(health_service));

    health::initialize_server_start_time();

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .merge(configure_swagger_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
