use chrono::NaiveDate;

use super::domain::{CandidateAddress, CandidateForm, FieldErrors, FormField, ValidatedPayload};
use super::fields;
use crate::config::IntakeConfig;

/// Runs every field rule unconditionally and merges the results, so one response can
/// list every problem with a submission.
#[derive(Debug, Clone)]
pub struct CandidateValidator {
    minimum_age_years: u32,
}

impl Default for CandidateValidator {
    fn default() -> Self {
        Self::from_config(&IntakeConfig::default())
    }
}

impl CandidateValidator {
    pub fn new(minimum_age_years: u32) -> Self {
        Self { minimum_age_years }
    }

    pub fn from_config(config: &IntakeConfig) -> Self {
        Self::new(config.minimum_age_years)
    }

    pub fn minimum_age_years(&self) -> u32 {
        self.minimum_age_years
    }

    pub fn validate(
        &self,
        form: &CandidateForm,
        today: NaiveDate,
    ) -> Result<ValidatedPayload, FieldErrors> {
        let mut errors = FieldErrors::default();

        let name = errors.check(FormField::Name, fields::name(&form.name));
        let tax_id = errors.check(FormField::TaxId, fields::tax_id(&form.tax_id));
        let email = errors.check(FormField::Email, fields::email(&form.email));
        let salary = errors.check(FormField::Salary, fields::salary(&form.salary));
        let birth_date = errors.check(
            FormField::BirthDate,
            fields::birth_date(&form.birth_date, today, self.minimum_age_years),
        );
        let gender = errors.check(FormField::Gender, fields::gender(&form.gender));
        let benefits = errors.check(FormField::Benefits, fields::benefits(&form.benefits));
        let postal_code = errors.check(
            FormField::PostalCode,
            fields::postal_code(&form.postal_code),
        );
        let street = errors.check(FormField::Street, fields::street(&form.street));
        let state_code = errors.check(FormField::StateCode, fields::state_code(&form.state_code));
        let city = errors.check(FormField::City, fields::city(&form.city));

        match (
            name,
            tax_id,
            email,
            salary,
            birth_date,
            gender,
            benefits,
            postal_code,
            street,
            state_code,
            city,
        ) {
            (
                Some(name),
                Some(tax_id),
                Some(email),
                Some(salary),
                Some(birth_date),
                Some(gender),
                Some(benefits),
                Some(cep),
                Some(street),
                Some(state_code),
                Some(city),
            ) => Ok(ValidatedPayload {
                name,
                tax_id,
                email,
                salary,
                birth_date,
                gender,
                benefits,
                address: CandidateAddress {
                    cep,
                    street,
                    state_code,
                    city,
                },
            }),
            _ => Err(errors),
        }
    }
}
