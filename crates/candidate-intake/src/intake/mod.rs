//! Candidate form intake: sanitation, field-by-field validation, persistence hand-off,
//! and the HTML endpoint that reports the outcome.

pub mod domain;
pub mod fields;
pub mod pipeline;
pub(crate) mod render;
pub mod repository;
pub mod router;
pub mod sanitize;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Benefit, CandidateAddress, CandidateForm, FieldErrors, FormField, Gender, ValidatedPayload,
};
pub use pipeline::CandidateValidator;
pub use repository::{CandidateId, CandidateRecord, CandidateRepository, RepositoryError};
pub use router::intake_router;
pub use service::{CandidateIntakeService, IntakeError};
