use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};

use crate::config::LookupConfig;
use crate::postal::PostalCode;

/// Raw upstream answer. Non-200 statuses are data here, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamReply {
    pub status: u16,
    pub body: Vec<u8>,
}

impl UpstreamReply {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Connection, TLS, or timeout failure while talking to the provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} while contacting address provider")]
pub struct TransportError {
    pub kind: &'static str,
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            "timeout"
        } else if err.is_connect() {
            "connection failure"
        } else if err.is_body() || err.is_decode() {
            "truncated body"
        } else {
            "transport failure"
        };
        Self { kind }
    }
}

/// One call performs exactly one upstream attempt.
#[async_trait]
pub trait AddressProvider: Send + Sync {
    async fn fetch(&self, code: &PostalCode) -> Result<UpstreamReply, TransportError>;
}

/// ViaCEP-style REST client: `GET {base}/{cep}/json/`.
#[derive(Debug, Clone)]
pub struct ViaCepClient {
    http: reqwest::Client,
    base_url: String,
}

impl ViaCepClient {
    pub fn from_config(config: &LookupConfig) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self, code: &PostalCode) -> String {
        format!("{}/{}/json/", self.base_url, code)
    }
}

#[async_trait]
impl AddressProvider for ViaCepClient {
    async fn fetch(&self, code: &PostalCode) -> Result<UpstreamReply, TransportError> {
        let response = self.http.get(self.endpoint(code)).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        Ok(UpstreamReply::new(status, body.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let config = LookupConfig {
            base_url: "https://viacep.com.br/ws/".to_string(),
            ..LookupConfig::default()
        };
        let client = ViaCepClient::from_config(&config).expect("client builds");
        let code = PostalCode::parse("01310100").expect("valid cep");
        assert_eq!(
            client.endpoint(&code),
            "https://viacep.com.br/ws/01310100/json/"
        );
    }
}
