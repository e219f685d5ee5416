//! Double-submit anti-forgery token: the form echoes the value of a cookie and the two
//! must match byte for byte.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde_json::json;
use subtle::ConstantTimeEq;
use uuid::Uuid;

pub const CSRF_COOKIE: &str = "csrf_token";
pub const CSRF_FIELD: &str = "csrf_token";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("anti-forgery token missing or mismatched")]
pub struct AuthorizationFailure;

/// Both sides must be present, non-empty, and equal. Comparison is constant-time.
pub fn verify_double_submit(
    cookie: Option<&str>,
    submitted: Option<&str>,
) -> Result<(), AuthorizationFailure> {
    let (Some(cookie), Some(submitted)) = (cookie, submitted) else {
        return Err(AuthorizationFailure);
    };

    if cookie.is_empty() || submitted.is_empty() {
        return Err(AuthorizationFailure);
    }

    if bool::from(cookie.as_bytes().ct_eq(submitted.as_bytes())) {
        Ok(())
    } else {
        Err(AuthorizationFailure)
    }
}

/// Check the token carried by `jar` against the submitted form value.
pub fn verify_request(jar: &CookieJar, submitted: Option<&str>) -> Result<(), AuthorizationFailure> {
    verify_double_submit(jar.get(CSRF_COOKIE).map(|cookie| cookie.value()), submitted)
}

pub fn issue_token() -> String {
    Uuid::new_v4().simple().to_string()
}

pub fn token_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((CSRF_COOKIE, token))
        .path("/")
        .same_site(SameSite::Strict)
        .http_only(true)
        .secure(secure)
        .build()
}

#[derive(Debug, Clone, Copy)]
struct TokenSettings {
    secure: bool,
}

/// `GET /api/v1/csrf` hands out a fresh token as cookie and JSON body.
pub fn token_router(secure_cookies: bool) -> Router {
    Router::new()
        .route("/api/v1/csrf", get(issue_handler))
        .with_state(TokenSettings {
            secure: secure_cookies,
        })
}

async fn issue_handler(State(settings): State<TokenSettings>, jar: CookieJar) -> impl IntoResponse {
    let token = issue_token();
    let jar = jar.add(token_cookie(token.clone(), settings.secure));
    (jar, Json(json!({ "csrf_token": token })))
}
