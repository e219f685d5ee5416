use super::common::*;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::lookup::lookup_router;

#[tokio::test]
async fn returns_address_payload_on_success() {
    let h = harness(vec![ok(PAULISTA_BODY)]);

    let response = lookup_router(h.service)
        .oneshot(form_request("csrf_token=tok123&cep=01310-100", Some("tok123")))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).expect("cache header"),
        "no-store, no-cache, must-revalidate, max-age=0"
    );
    assert_eq!(
        response.headers().get(header::X_CONTENT_TYPE_OPTIONS).expect("nosniff"),
        "nosniff"
    );

    let payload = read_json_body(response).await;
    assert_eq!(
        payload,
        json!({
            "ok": true,
            "cep": "01310100",
            "data": {
                "logradouro": "Avenida Paulista",
                "bairro": "Bela Vista",
                "localidade": "São Paulo",
                "uf": "SP",
            },
        })
    );
}

#[tokio::test]
async fn rejects_invalid_format_with_normalized_digits() {
    let h = harness(Vec::new());

    let response = lookup_router(h.service)
        .oneshot(form_request("csrf_token=tok&cep=123-45", Some("tok")))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["ok"], json!(false));
    assert_eq!(payload["cep"], json!("12345"));
    assert_eq!(h.provider.call_count(), 0);
}

#[tokio::test]
async fn maps_not_found_and_upstream_failures() {
    let h = harness(vec![ok(NOT_FOUND_BODY)]);
    let response = lookup_router(h.service)
        .oneshot(form_request("csrf_token=t&cep=99999999", Some("t")))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload, json!({ "ok": false, "error": "CEP não encontrado" }));

    let h = harness(vec![connection_refused()]);
    let response = lookup_router(h.service)
        .oneshot(form_request("csrf_token=t&cep=99999999", Some("t")))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], json!("Serviço de CEP indisponível"));
}

#[tokio::test]
async fn rejects_mismatched_or_missing_tokens() {
    let h = harness(vec![ok(PAULISTA_BODY)]);
    let router = lookup_router(h.service);

    let response = router
        .clone()
        .oneshot(form_request("csrf_token=abc&cep=01310100", Some("xyz")))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json_body(response).await["error"], json!("CSRF inválido"));

    let response = router
        .oneshot(form_request("csrf_token=abc&cep=01310100", None))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(h.provider.call_count(), 0);
}

#[tokio::test]
async fn missing_cep_field_is_a_bad_request() {
    let h = harness(Vec::new());

    let response = lookup_router(h.service)
        .oneshot(form_request("csrf_token=tok", Some("tok")))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn non_post_methods_get_json_405() {
    let h = harness(Vec::new());

    let response = lookup_router(h.service)
        .oneshot(
            Request::get("/api/v1/cep")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let payload = read_json_body(response).await;
    assert_eq!(payload, json!({ "ok": false, "error": "Method not allowed" }));
}

#[tokio::test]
async fn unreadable_body_fails_the_token_check_first() {
    let h = harness(vec![ok(PAULISTA_BODY)]);

    let response = lookup_router(h.service)
        .oneshot(
            Request::post("/api/v1/cep")
                .header(header::COOKIE, "csrf_token=tok")
                .body(Body::from("csrf_token=tok&cep=01310100"))
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        read_json_body(response).await,
        json!({ "ok": false, "error": "CSRF inválido" })
    );
    assert_eq!(h.provider.call_count(), 0);
}
