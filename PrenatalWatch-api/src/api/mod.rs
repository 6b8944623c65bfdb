pub mod handlers;
pub mod routes;
pub mod session;
pub mod state;

use axum::Router;

use prenatal_watch_data::repository::InMemoryStorage;
use prenatal_watch_domain::services::CancellationSignal;
use prenatal_watch_domain::TriageConfig;

/// Create the application router
pub fn create_application(storage: InMemoryStorage, config: TriageConfig, shutdown: CancellationSignal) -> Router {
    routes::create_app(storage, config, shutdown)
}
