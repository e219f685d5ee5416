use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use candidate_intake::csrf::token_router;
use candidate_intake::intake::{intake_router, CandidateIntakeService, CandidateRepository};
use candidate_intake::lookup::{lookup_router, AddressProvider, LookupCache, PostalLookupService};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_service_routes<P, C, R>(
    lookup_service: Arc<PostalLookupService<P, C>>,
    intake_service: Arc<CandidateIntakeService<R>>,
    secure_cookies: bool,
) -> axum::Router
where
    P: AddressProvider + 'static,
    C: LookupCache + 'static,
    R: CandidateRepository + 'static,
{
    lookup_router(lookup_service)
        .merge(intake_router(intake_service))
        .merge(token_router(secure_cookies))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
