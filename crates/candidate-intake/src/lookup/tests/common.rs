use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use serde_json::Value;
use tokio::time::Instant;

use crate::lookup::{
    AddressProvider, CachedLookup, LookupCache, PostalLookupService, RetryPolicy, TransportError,
    UpstreamReply,
};
use crate::postal::PostalCode;

pub(super) const PAULISTA_BODY: &str = r#"{
  "cep": "01310-100",
  "logradouro": "Avenida Paulista",
  "complemento": "de 612 a 1510 - lado par",
  "bairro": "Bela Vista",
  "localidade": "São Paulo",
  "uf": "SP"
}"#;

pub(super) const NOT_FOUND_BODY: &str = r#"{"erro": true}"#;

/// Provider replaying a fixed script; once the script runs dry it answers 500.
#[derive(Default)]
pub(super) struct ScriptedProvider {
    script: Mutex<VecDeque<Result<UpstreamReply, TransportError>>>,
    calls: Mutex<Vec<(PostalCode, Instant)>>,
}

impl ScriptedProvider {
    pub(super) fn new(script: Vec<Result<UpstreamReply, TransportError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn push(&self, reply: Result<UpstreamReply, TransportError>) {
        self.script.lock().expect("script mutex poisoned").push_back(reply);
    }

    pub(super) fn call_count(&self) -> usize {
        self.calls.lock().expect("calls mutex poisoned").len()
    }

    pub(super) fn call_instants(&self) -> Vec<Instant> {
        self.calls
            .lock()
            .expect("calls mutex poisoned")
            .iter()
            .map(|(_, at)| *at)
            .collect()
    }
}

#[async_trait]
impl AddressProvider for ScriptedProvider {
    async fn fetch(&self, code: &PostalCode) -> Result<UpstreamReply, TransportError> {
        self.calls
            .lock()
            .expect("calls mutex poisoned")
            .push((code.clone(), Instant::now()));
        self.script
            .lock()
            .expect("script mutex poisoned")
            .pop_front()
            .unwrap_or_else(|| Ok(UpstreamReply::new(500, Vec::new())))
    }
}

/// TTL cache whose clock only moves when a test advances it.
pub(super) struct ManualClockCache {
    ttl: Duration,
    elapsed: Mutex<Duration>,
    entries: Mutex<HashMap<PostalCode, (Duration, CachedLookup)>>,
}

impl ManualClockCache {
    pub(super) fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            elapsed: Mutex::new(Duration::ZERO),
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub(super) fn advance(&self, by: Duration) {
        *self.elapsed.lock().expect("clock mutex poisoned") += by;
    }

    pub(super) fn is_empty(&self) -> bool {
        self.entries.lock().expect("cache mutex poisoned").is_empty()
    }

    fn now(&self) -> Duration {
        *self.elapsed.lock().expect("clock mutex poisoned")
    }
}

impl LookupCache for ManualClockCache {
    fn get(&self, code: &PostalCode) -> Option<CachedLookup> {
        let now = self.now();
        self.entries
            .lock()
            .expect("cache mutex poisoned")
            .get(code)
            .filter(|(written_at, _)| now - *written_at < self.ttl)
            .map(|(_, value)| value.clone())
    }

    fn put(&self, code: PostalCode, value: CachedLookup) {
        let now = self.now();
        self.entries
            .lock()
            .expect("cache mutex poisoned")
            .insert(code, (now, value));
    }
}

pub(super) type TestService = PostalLookupService<ScriptedProvider, ManualClockCache>;

pub(super) struct Harness {
    pub(super) provider: Arc<ScriptedProvider>,
    pub(super) cache: Arc<ManualClockCache>,
    pub(super) service: Arc<TestService>,
}

pub(super) fn harness(script: Vec<Result<UpstreamReply, TransportError>>) -> Harness {
    let provider = Arc::new(ScriptedProvider::new(script));
    let cache = Arc::new(ManualClockCache::new(Duration::from_secs(180)));
    let service = Arc::new(PostalLookupService::new(
        provider.clone(),
        cache.clone(),
        RetryPolicy::default(),
    ));
    Harness {
        provider,
        cache,
        service,
    }
}

pub(super) fn ok(body: &str) -> Result<UpstreamReply, TransportError> {
    Ok(UpstreamReply::new(200, body.as_bytes().to_vec()))
}

pub(super) fn status(code: u16) -> Result<UpstreamReply, TransportError> {
    Ok(UpstreamReply::new(code, b"Service Unavailable".to_vec()))
}

pub(super) fn connection_refused() -> Result<UpstreamReply, TransportError> {
    Err(TransportError {
        kind: "connection failure",
    })
}

pub(super) fn paulista() -> PostalCode {
    PostalCode::parse("01310-100").expect("valid cep")
}

pub(super) fn form_request(body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::post("/api/v1/cep")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(token) = cookie {
        builder = builder.header(header::COOKIE, format!("csrf_token={token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
