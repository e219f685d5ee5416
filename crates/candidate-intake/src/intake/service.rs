use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use super::domain::{CandidateForm, FieldErrors};
use super::pipeline::CandidateValidator;
use super::repository::{CandidateRecord, CandidateRepository, RepositoryError};
use crate::csrf::{self, AuthorizationFailure};

/// Envelope checks, validation, and persistence for one candidate submission.
pub struct CandidateIntakeService<R> {
    validator: CandidateValidator,
    repository: Arc<R>,
}

impl<R> CandidateIntakeService<R>
where
    R: CandidateRepository + 'static,
{
    pub fn new(repository: Arc<R>, validator: CandidateValidator) -> Self {
        Self {
            validator,
            repository,
        }
    }

    pub fn validator(&self) -> &CandidateValidator {
        &self.validator
    }

    /// Checks run in a fixed order: honeypot, anti-forgery token, field rules, storage.
    pub fn submit(
        &self,
        form: CandidateForm,
        cookie_token: Option<&str>,
        today: NaiveDate,
    ) -> Result<CandidateRecord, IntakeError> {
        if honeypot_filled(&form.honeypot) {
            warn!("candidate submission rejected: honeypot field filled");
            return Err(IntakeError::Bot);
        }

        csrf::verify_double_submit(cookie_token, form.csrf_token.as_deref()).map_err(|err| {
            warn!("candidate submission rejected: anti-forgery token mismatch");
            IntakeError::Forgery(err)
        })?;

        let payload = self
            .validator
            .validate(&form, today)
            .map_err(IntakeError::Invalid)?;

        let record = self.repository.insert(payload)?;
        info!(candidate_id = %record.id, "candidate submission stored");
        Ok(record)
    }
}

/// Blank and `"0"` both count as untouched.
fn honeypot_filled(value: &str) -> bool {
    !value.is_empty() && value != "0"
}

#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("Requisição rejeitada.")]
    Bot,
    #[error("CSRF token inválido ou ausente.")]
    Forgery(#[source] AuthorizationFailure),
    #[error("Corrija os campos destacados e envie novamente.")]
    Invalid(FieldErrors),
    #[error("Erro ao salvar no banco (transação revertida).")]
    Repository(#[from] RepositoryError),
}
