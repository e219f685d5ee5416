use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use candidate_intake::intake::{
    Benefit, CandidateId, CandidateRecord, CandidateRepository, RepositoryError, ValidatedPayload,
};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct CandidateTables {
    candidates: BTreeMap<CandidateId, ValidatedPayload>,
    candidate_benefits: Vec<(CandidateId, Benefit)>,
}

/// Process-local stand-in for the relational store: a candidates table plus the
/// candidate/benefit link table, both written under one lock.
#[derive(Default, Clone)]
pub(crate) struct InMemoryCandidateRepository {
    sequence: Arc<AtomicU64>,
    tables: Arc<Mutex<CandidateTables>>,
}

impl CandidateRepository for InMemoryCandidateRepository {
    fn insert(&self, payload: ValidatedPayload) -> Result<CandidateRecord, RepositoryError> {
        let mut guard = self
            .tables
            .lock()
            .map_err(|_| RepositoryError::Unavailable("candidate store poisoned".to_string()))?;

        let id = CandidateId(self.sequence.fetch_add(1, Ordering::Relaxed) + 1);
        guard
            .candidate_benefits
            .extend(payload.benefits.iter().map(|benefit| (id, *benefit)));
        guard.candidates.insert(id, payload.clone());

        Ok(CandidateRecord { id, payload })
    }
}
