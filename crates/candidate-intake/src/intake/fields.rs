//! Per-field rules. Each function is pure: raw input in, normalized value or the
//! field's fixed error message out.

use std::sync::OnceLock;

use chrono::{Months, NaiveDate};
use regex::Regex;

use super::domain::{Benefit, Gender};
use super::sanitize::{sanitize_email, sanitize_text};
use crate::postal::{digits_only, PostalCode};

pub type FieldResult<T> = Result<T, &'static str>;

pub const NAME_INVALID: &str = "Nome inválido.";
pub const TAX_ID_INVALID: &str = "CPF inválido.";
pub const EMAIL_INVALID: &str = "E-mail inválido.";
pub const SALARY_INVALID: &str = "Salário inválido.";
pub const BIRTH_DATE_INVALID: &str = "Data de nascimento inválida (ou idade mínima não atendida).";
pub const GENDER_INVALID: &str = "Selecione masculino ou feminino.";
pub const BENEFITS_INVALID: &str = "Escolha ao menos 1 benefício válido.";
pub const POSTAL_CODE_INVALID: &str = "CEP inválido.";
pub const STREET_REQUIRED: &str = "Rua é obrigatória.";
pub const STATE_CODE_INVALID: &str = "UF inválida.";
pub const CITY_REQUIRED: &str = "Cidade é obrigatória.";

pub const EMAIL_MAX_LEN: usize = 150;
pub const SALARY_CEILING: f64 = 1_000_000_000.0;
pub const BENEFIT_PLACEHOLDER: &str = "selecione";

pub const STATE_CODES: [&str; 27] = [
    "AC", "AL", "AP", "AM", "BA", "CE", "DF", "ES", "GO", "MA", "MT", "MS", "MG", "PA", "PB",
    "PR", "PE", "PI", "RJ", "RN", "RS", "RO", "RR", "SC", "SP", "SE", "TO",
];

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        fn $name() -> &'static Regex {
            static PATTERN: OnceLock<Regex> = OnceLock::new();
            PATTERN.get_or_init(|| Regex::new($re).expect("valid field pattern"))
        }
    };
}

pattern!(name_pattern, r"^[A-Za-zÀ-ÖØ-öø-ÿ'´`^~\- ]{2,120}$");
pattern!(
    email_pattern,
    r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]{1,64}(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,63}$"
);
pattern!(currency_marker, r"[Rr]\$?|\s+");
pattern!(
    numeric_literal,
    r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?$"
);
pattern!(iso_date, r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$");

pub fn name(raw: &str) -> FieldResult<String> {
    let name = sanitize_text(raw);
    if name_pattern().is_match(&name) {
        Ok(name)
    } else {
        Err(NAME_INVALID)
    }
}

/// CPF: 11 digits, not all identical, both check digits matching.
pub fn tax_id(raw: &str) -> FieldResult<String> {
    let digits = digits_only(raw);
    if cpf_is_valid(&digits) {
        Ok(digits)
    } else {
        Err(TAX_ID_INVALID)
    }
}

fn cpf_is_valid(digits: &str) -> bool {
    let values: Vec<u32> = digits.chars().filter_map(|c| c.to_digit(10)).collect();
    if values.len() != 11 || values.iter().all(|d| *d == values[0]) {
        return false;
    }

    (9..11).all(|position| {
        let sum: u32 = values[..position]
            .iter()
            .enumerate()
            .map(|(index, digit)| digit * (position as u32 + 1 - index as u32))
            .sum();
        (10 * sum) % 11 % 10 == values[position]
    })
}

/// The grammar check runs on the trimmed input; the sanitized form is what gets stored.
pub fn email(raw: &str) -> FieldResult<String> {
    let trimmed = raw.trim();
    if trimmed.len() > EMAIL_MAX_LEN || !email_pattern().is_match(trimmed) {
        return Err(EMAIL_INVALID);
    }
    Ok(sanitize_email(trimmed))
}

/// Brazilian currency input (`"R$ 1.234,56"`) to a two-decimal string (`"1234.56"`).
pub fn salary(raw: &str) -> FieldResult<String> {
    let stripped = currency_marker().replace_all(raw.trim(), "");
    let normalized = stripped.replace('.', "").replace(',', ".");

    if !numeric_literal().is_match(&normalized) {
        return Err(SALARY_INVALID);
    }

    let amount: f64 = normalized.parse().map_err(|_| SALARY_INVALID)?;
    if !(0.0..=SALARY_CEILING).contains(&amount) {
        return Err(SALARY_INVALID);
    }

    let cents = round_half_up_cents(amount);
    Ok(format!("{}.{:02}", cents / 100, cents % 100))
}

/// Half-up rounding to cents. The scaled value is first cut to 15 significant digits so
/// `1.005 * 100 == 100.49999999999999` rounds as the 100.5 the user typed.
fn round_half_up_cents(amount: f64) -> u64 {
    let scaled = amount * 100.0;
    let pre_rounded: f64 = format!("{scaled:.14e}").parse().unwrap_or(scaled);
    pre_rounded.round() as u64
}

/// `YYYY-MM-DD`, a real calendar date, and at least `minimum_age_years` before `today`.
pub fn birth_date(raw: &str, today: NaiveDate, minimum_age_years: u32) -> FieldResult<NaiveDate> {
    if !iso_date().is_match(raw) {
        return Err(BIRTH_DATE_INVALID);
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| BIRTH_DATE_INVALID)?;
    let cutoff = today
        .checked_sub_months(Months::new(minimum_age_years.saturating_mul(12)))
        .ok_or(BIRTH_DATE_INVALID)?;

    if date <= cutoff {
        Ok(date)
    } else {
        Err(BIRTH_DATE_INVALID)
    }
}

pub fn gender(raw: &str) -> FieldResult<Gender> {
    Gender::from_normalized(&raw.trim().to_lowercase()).ok_or(GENDER_INVALID)
}

/// Allow-listed benefits in order of first appearance, blanks and the placeholder
/// option removed, duplicates collapsed.
pub fn filter_benefits<S: AsRef<str>>(raw: &[S]) -> Vec<Benefit> {
    let mut accepted = Vec::new();
    for value in raw {
        let value = value.as_ref().trim();
        if value.is_empty() || value.to_lowercase() == BENEFIT_PLACEHOLDER {
            continue;
        }
        if let Some(benefit) = Benefit::from_code(value) {
            if !accepted.contains(&benefit) {
                accepted.push(benefit);
            }
        }
    }
    accepted
}

pub fn benefits<S: AsRef<str>>(raw: &[S]) -> FieldResult<Vec<Benefit>> {
    let accepted = filter_benefits(raw);
    if accepted.is_empty() {
        Err(BENEFITS_INVALID)
    } else {
        Ok(accepted)
    }
}

/// Format check only; the candidate form never calls the lookup service.
pub fn postal_code(raw: &str) -> FieldResult<PostalCode> {
    PostalCode::parse(raw).map_err(|_| POSTAL_CODE_INVALID)
}

pub fn street(raw: &str) -> FieldResult<String> {
    required_text(raw, STREET_REQUIRED)
}

pub fn city(raw: &str) -> FieldResult<String> {
    required_text(raw, CITY_REQUIRED)
}

fn required_text(raw: &str, message: &'static str) -> FieldResult<String> {
    let value = sanitize_text(raw);
    if value.is_empty() {
        Err(message)
    } else {
        Ok(value)
    }
}

pub fn state_code(raw: &str) -> FieldResult<String> {
    let code = raw.trim().to_uppercase();
    if STATE_CODES.contains(&code.as_str()) {
        Ok(code)
    } else {
        Err(STATE_CODE_INVALID)
    }
}
