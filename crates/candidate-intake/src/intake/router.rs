use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::post,
    Router,
};
use axum_extra::extract::{CookieJar, Form, FormRejection};
use chrono::Local;
use tower_http::set_header::SetResponseHeaderLayer;

use super::domain::{CandidateForm, FieldErrors};
use super::render::{failure_page, success_page};
use super::repository::CandidateRepository;
use super::service::{CandidateIntakeService, IntakeError};
use crate::csrf::CSRF_COOKIE;

const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; img-src 'self' data:; \
style-src 'self' https://cdn.jsdelivr.net 'unsafe-inline'; script-src 'self' https://cdn.jsdelivr.net; \
connect-src 'self'; base-uri 'none'; form-action 'self'";

const SECURITY_HEADERS: [(HeaderName, &str); 9] = [
    (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (header::X_FRAME_OPTIONS, "DENY"),
    (header::REFERRER_POLICY, "no-referrer"),
    (
        HeaderName::from_static("permissions-policy"),
        "geolocation=(), microphone=(), camera=()",
    ),
    (
        HeaderName::from_static("cross-origin-opener-policy"),
        "same-origin",
    ),
    (
        HeaderName::from_static("cross-origin-resource-policy"),
        "same-origin",
    ),
    (
        HeaderName::from_static("cross-origin-embedder-policy"),
        "require-corp",
    ),
    (
        header::STRICT_TRANSPORT_SECURITY,
        "max-age=31536000; includeSubDomains; preload",
    ),
    (header::CONTENT_SECURITY_POLICY, CONTENT_SECURITY_POLICY),
];

/// `POST /api/v1/candidates`, rendering an HTML result page with hardened headers.
pub fn intake_router<R>(service: Arc<CandidateIntakeService<R>>) -> Router
where
    R: CandidateRepository + 'static,
{
    let mut router = Router::new().route(
        "/api/v1/candidates",
        post(submit_handler::<R>).fallback(form_required),
    );

    for (name, value) in SECURITY_HEADERS {
        router = router.layer(SetResponseHeaderLayer::overriding(
            name,
            HeaderValue::from_static(value),
        ));
    }

    router.with_state(service)
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<CandidateIntakeService<R>>>,
    jar: CookieJar,
    form: Result<Form<CandidateForm>, FormRejection>,
) -> Response
where
    R: CandidateRepository + 'static,
{
    let form = form.map(|Form(form)| form).unwrap_or_default();

    let cookie_token = jar.get(CSRF_COOKIE).map(|cookie| cookie.value());
    let today = Local::now().date_naive();

    match service.submit(form, cookie_token, today) {
        Ok(record) => {
            let html = success_page(
                "Validação concluída. Cadastro registrado com sucesso.",
                &record.payload,
            );
            (StatusCode::OK, Html(html)).into_response()
        }
        Err(error) => {
            let message = error.to_string();
            match error {
                IntakeError::Invalid(errors) => failure(Some(&errors), &message),
                _ => failure(None, &message),
            }
        }
    }
}

pub(crate) async fn form_required() -> Response {
    failure(None, "Use o formulário para enviar os dados via POST.")
}

fn failure(errors: Option<&FieldErrors>, message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Html(failure_page(message, errors))).into_response()
}
