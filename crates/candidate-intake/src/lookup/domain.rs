use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

/// Normalized address returned by a successful lookup. Serialized with the upstream
/// field names because that is the shape clients of the lookup endpoint consume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRecord {
    #[serde(rename = "logradouro")]
    pub street: String,
    #[serde(rename = "bairro")]
    pub district: String,
    #[serde(rename = "localidade")]
    pub city: String,
    #[serde(rename = "uf")]
    pub state_code: String,
}

/// Value stored in the lookup cache. Negative answers are cached too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedLookup {
    Found(AddressRecord),
    NotFound,
}

impl CachedLookup {
    pub fn into_result(self) -> Result<AddressRecord, LookupError> {
        match self {
            CachedLookup::Found(record) => Ok(record),
            CachedLookup::NotFound => Err(LookupError::NotFound),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("CEP inválido")]
    InvalidInput { normalized: String },
    #[error("CEP não encontrado")]
    NotFound,
    #[error("Serviço de CEP indisponível")]
    UpstreamUnavailable,
}

impl LookupError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            LookupError::InvalidInput { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            LookupError::NotFound => StatusCode::NOT_FOUND,
            LookupError::UpstreamUnavailable => StatusCode::BAD_GATEWAY,
        }
    }
}
