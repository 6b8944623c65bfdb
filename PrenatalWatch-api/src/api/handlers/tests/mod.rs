mod medications_test;
mod reports_test;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use prenatal_watch_data::repository::InMemoryStorage;
use prenatal_watch_data::seed::demo_storage;
use prenatal_watch_domain::services::CancellationSignal;
use prenatal_watch_domain::TriageConfig;

use crate::api::create_application;

/// Router over the demo dataset
pub fn demo_app() -> Router {
    app_over(demo_storage().unwrap())
}

pub fn app_over(storage: InMemoryStorage) -> Router {
    create_application(storage, TriageConfig::default(), CancellationSignal::never())
}

/// Send a request as `user` with `role` and decode the JSON answer
pub async fn send(
    app: Router,
    method: &str,
    uri: &str,
    session: Option<(&str, &str)>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some((user, role)) = session {
        builder = builder.header("x-user-id", user).header("x-user-role", role);
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub const CLINICIAN: Option<(&str, &str)> = Some(("doc-1", "clinician"));
