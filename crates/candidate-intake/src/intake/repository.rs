use std::fmt;

use serde::Serialize;

use super::domain::ValidatedPayload;

/// Identifier assigned by the repository on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CandidateId(pub u64);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cand-{:06}", self.0)
    }
}

/// Stored candidate together with its benefits association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateRecord {
    pub id: CandidateId,
    pub payload: ValidatedPayload,
}

/// Storage abstraction for accepted submissions. An insert stores the candidate and its
/// benefit links together or not at all.
pub trait CandidateRepository: Send + Sync {
    fn insert(&self, payload: ValidatedPayload) -> Result<CandidateRecord, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
