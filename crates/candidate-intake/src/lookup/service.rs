use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::cache::LookupCache;
use super::domain::{AddressRecord, CachedLookup, LookupError};
use super::provider::{AddressProvider, TransportError, UpstreamReply};
use crate::config::LookupConfig;
use crate::postal::PostalCode;

/// Bounded linear backoff: the pause after failed attempt `n` is `base_delay * n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&LookupConfig::default())
    }
}

impl From<&LookupConfig> for RetryPolicy {
    fn from(config: &LookupConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            base_delay: config.backoff,
        }
    }
}

/// What a single upstream attempt means for the retry loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// 200 with an address payload.
    Resolved(AddressRecord),
    /// 200 carrying the provider's own not-found flag.
    DefinitiveNegative,
    /// 200 whose body is not a JSON object.
    Unreadable,
    /// Any non-200 status; worth another try.
    Transient { status: u16 },
    TransportFailed(TransportError),
}

impl AttemptOutcome {
    pub fn classify(reply: Result<UpstreamReply, TransportError>) -> Self {
        let reply = match reply {
            Ok(reply) => reply,
            Err(err) => return AttemptOutcome::TransportFailed(err),
        };

        if reply.status != 200 {
            return AttemptOutcome::Transient {
                status: reply.status,
            };
        }

        match serde_json::from_slice::<Value>(&reply.body) {
            Ok(Value::Object(fields)) if is_truthy(fields.get("erro")) => {
                AttemptOutcome::DefinitiveNegative
            }
            Ok(Value::Object(fields)) => AttemptOutcome::Resolved(address_from(&fields)),
            _ => AttemptOutcome::Unreadable,
        }
    }
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(text)) => !text.is_empty() && text != "0",
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(fields)) => !fields.is_empty(),
    }
}

fn text_field(fields: &Map<String, Value>, key: &str) -> String {
    match fields.get(key) {
        Some(Value::String(text)) => text.trim().to_string(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(true)) => "1".to_string(),
        _ => String::new(),
    }
}

fn address_from(fields: &Map<String, Value>) -> AddressRecord {
    AddressRecord {
        street: text_field(fields, "logradouro"),
        district: text_field(fields, "bairro"),
        city: text_field(fields, "localidade"),
        state_code: text_field(fields, "uf").to_uppercase(),
    }
}

/// Resolves postal codes through the cache first, then the provider.
pub struct PostalLookupService<P, C> {
    provider: Arc<P>,
    cache: Arc<C>,
    policy: RetryPolicy,
}

impl<P, C> PostalLookupService<P, C>
where
    P: AddressProvider + 'static,
    C: LookupCache + 'static,
{
    pub fn new(provider: Arc<P>, cache: Arc<C>, policy: RetryPolicy) -> Self {
        Self {
            provider,
            cache,
            policy,
        }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Normalize raw input and resolve it.
    pub async fn lookup(&self, raw: &str) -> Result<AddressRecord, LookupError> {
        let code = PostalCode::parse(raw).map_err(|err| LookupError::InvalidInput {
            normalized: err.normalized,
        })?;
        self.resolve(&code).await
    }

    /// Resolve an already-validated code.
    ///
    /// Only successes and the provider's explicit not-found answer are cached. Exhausted
    /// retries and transport failures leave the cache untouched so the next call goes
    /// upstream again.
    pub async fn resolve(&self, code: &PostalCode) -> Result<AddressRecord, LookupError> {
        if let Some(cached) = self.cache.get(code) {
            return cached.into_result();
        }

        for attempt in 1..=self.policy.max_attempts {
            let reply = self.provider.fetch(code).await;

            match AttemptOutcome::classify(reply) {
                AttemptOutcome::Resolved(record) => {
                    debug!(cep = %code, attempt, "address resolved");
                    self.cache
                        .put(code.clone(), CachedLookup::Found(record.clone()));
                    return Ok(record);
                }
                AttemptOutcome::DefinitiveNegative => {
                    info!(cep = %code, attempt, "provider reports unknown postal code");
                    self.cache.put(code.clone(), CachedLookup::NotFound);
                    return Err(LookupError::NotFound);
                }
                AttemptOutcome::Unreadable => {
                    warn!(cep = %code, attempt, "provider returned a non-object body");
                    return Err(LookupError::NotFound);
                }
                AttemptOutcome::Transient { status } => {
                    let delay = self.policy.delay_after(attempt);
                    warn!(
                        cep = %code,
                        attempt,
                        status,
                        delay_ms = delay.as_millis() as u64,
                        "provider returned non-200 status"
                    );
                    tokio::time::sleep(delay).await;
                }
                AttemptOutcome::TransportFailed(err) => {
                    warn!(cep = %code, attempt, error = %err, "address provider unreachable");
                    return Err(LookupError::UpstreamUnavailable);
                }
            }
        }

        warn!(cep = %code, attempts = self.policy.max_attempts, "lookup retries exhausted");
        Err(LookupError::NotFound)
    }
}
