//! Brazilian postal code (CEP) normalization shared by the lookup endpoint and the
//! candidate form.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const POSTAL_CODE_LEN: usize = 8;

/// Keep only ASCII digits. Idempotent.
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// An 8-digit CEP, already stripped of punctuation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostalCode(String);

impl PostalCode {
    /// Normalize `raw` and accept it only when exactly eight digits remain.
    pub fn parse(raw: &str) -> Result<Self, InvalidPostalCode> {
        let digits = digits_only(raw);
        if digits.len() == POSTAL_CODE_LEN {
            Ok(Self(digits))
        } else {
            Err(InvalidPostalCode { normalized: digits })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rejected input, carrying whatever digits were left after normalization.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("postal code must have exactly {POSTAL_CODE_LEN} digits (got {})", normalized.len())]
pub struct InvalidPostalCode {
    pub normalized: String,
}
