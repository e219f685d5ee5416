use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use axum_extra::extract::{CookieJar, Form, FormRejection};
use serde::Deserialize;
use serde_json::json;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::warn;

use super::cache::LookupCache;
use super::domain::LookupError;
use super::provider::AddressProvider;
use super::service::PostalLookupService;
use crate::csrf;
use crate::postal::PostalCode;

/// Form body accepted by the lookup endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct LookupRequest {
    #[serde(default)]
    pub csrf_token: Option<String>,
    #[serde(default)]
    pub cep: Option<String>,
}

/// `POST /api/v1/cep` plus the no-store / no-sniff headers every answer carries.
pub fn lookup_router<P, C>(service: Arc<PostalLookupService<P, C>>) -> Router
where
    P: AddressProvider + 'static,
    C: LookupCache + 'static,
{
    Router::new()
        .route(
            "/api/v1/cep",
            post(lookup_handler::<P, C>).fallback(method_not_allowed),
        )
        .layer(header_layer(header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
        .layer(header_layer(header::REFERRER_POLICY, "no-referrer"))
        .layer(header_layer(
            header::CACHE_CONTROL,
            "no-store, no-cache, must-revalidate, max-age=0",
        ))
        .layer(header_layer(header::PRAGMA, "no-cache"))
        .with_state(service)
}

fn header_layer(name: HeaderName, value: &'static str) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(name, HeaderValue::from_static(value))
}

pub(crate) async fn lookup_handler<P, C>(
    State(service): State<Arc<PostalLookupService<P, C>>>,
    jar: CookieJar,
    form: Result<Form<LookupRequest>, FormRejection>,
) -> Response
where
    P: AddressProvider + 'static,
    C: LookupCache + 'static,
{
    // An unreadable body carries no token either, so it fails the anti-forgery check.
    let request = form.map(|Form(request)| request).unwrap_or_default();

    if csrf::verify_request(&jar, request.csrf_token.as_deref()).is_err() {
        warn!("lookup rejected: anti-forgery token mismatch");
        return failure(StatusCode::BAD_REQUEST, "CSRF inválido");
    }

    let Some(raw) = request.cep else {
        return failure(StatusCode::BAD_REQUEST, "Requisição inválida");
    };

    let code = match PostalCode::parse(&raw) {
        Ok(code) => code,
        Err(invalid) => {
            return lookup_failure(LookupError::InvalidInput {
                normalized: invalid.normalized,
            })
        }
    };

    match service.resolve(&code).await {
        Ok(record) => {
            let payload = json!({
                "ok": true,
                "cep": code,
                "data": record,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => lookup_failure(error),
    }
}

pub(crate) async fn method_not_allowed() -> Response {
    failure(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

fn lookup_failure(error: LookupError) -> Response {
    let status = error.status_code();
    let payload = match &error {
        LookupError::InvalidInput { normalized } => json!({
            "ok": false,
            "error": error.to_string(),
            "cep": normalized,
        }),
        LookupError::NotFound | LookupError::UpstreamUnavailable => json!({
            "ok": false,
            "error": error.to_string(),
        }),
    };
    (status, Json(payload)).into_response()
}

fn failure(status: StatusCode, message: &str) -> Response {
    let payload = json!({ "ok": false, "error": message });
    (status, Json(payload)).into_response()
}
