use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::postal::PostalCode;

/// Raw form submission as posted by the browser. Every field defaults to empty so a
/// missing input is reported as a field error rather than a malformed request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CandidateForm {
    #[serde(default, rename = "nome")]
    pub name: String,
    #[serde(default, rename = "cpf")]
    pub tax_id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, rename = "salario")]
    pub salary: String,
    #[serde(default, rename = "data_nascimento")]
    pub birth_date: String,
    #[serde(default, rename = "genero")]
    pub gender: String,
    #[serde(default, rename = "beneficios", alias = "beneficios[]")]
    pub benefits: Vec<String>,
    #[serde(default, rename = "cep")]
    pub postal_code: String,
    #[serde(default, rename = "rua")]
    pub street: String,
    #[serde(default, rename = "estado")]
    pub state_code: String,
    #[serde(default, rename = "cidade")]
    pub city: String,
    /// Honeypot input hidden from humans.
    #[serde(default, rename = "website")]
    pub honeypot: String,
    #[serde(default)]
    pub csrf_token: Option<String>,
}

/// Form inputs that can carry a validation error, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum FormField {
    #[serde(rename = "nome")]
    Name,
    #[serde(rename = "cpf")]
    TaxId,
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "salario")]
    Salary,
    #[serde(rename = "data_nascimento")]
    BirthDate,
    #[serde(rename = "genero")]
    Gender,
    #[serde(rename = "beneficios")]
    Benefits,
    #[serde(rename = "cep")]
    PostalCode,
    #[serde(rename = "rua")]
    Street,
    #[serde(rename = "estado")]
    StateCode,
    #[serde(rename = "cidade")]
    City,
}

impl FormField {
    pub const fn wire_name(self) -> &'static str {
        match self {
            FormField::Name => "nome",
            FormField::TaxId => "cpf",
            FormField::Email => "email",
            FormField::Salary => "salario",
            FormField::BirthDate => "data_nascimento",
            FormField::Gender => "genero",
            FormField::Benefits => "beneficios",
            FormField::PostalCode => "cep",
            FormField::Street => "rua",
            FormField::StateCode => "estado",
            FormField::City => "cidade",
        }
    }
}

/// At most one message per failing field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<FormField, &'static str>);

impl FieldErrors {
    /// Record the error of `result` under `field`, returning the value on success.
    pub fn check<T>(&mut self, field: FormField, result: Result<T, &'static str>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.0.insert(field, message);
                None
            }
        }
    }

    pub fn get(&self, field: FormField) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &'static str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, *message))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Masculino,
    Feminino,
}

impl Gender {
    pub fn from_normalized(value: &str) -> Option<Self> {
        match value {
            "masculino" => Some(Gender::Masculino),
            "feminino" => Some(Gender::Feminino),
            _ => None,
        }
    }
}

/// Benefits a candidate may opt into. Codes are matched case-sensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Benefit {
    #[serde(rename = "cesta basica")]
    CestaBasica,
    #[serde(rename = "convenio")]
    Convenio,
    #[serde(rename = "VT")]
    ValeTransporte,
    #[serde(rename = "VR")]
    ValeRefeicao,
}

impl Benefit {
    pub const ALL: [Benefit; 4] = [
        Benefit::CestaBasica,
        Benefit::Convenio,
        Benefit::ValeTransporte,
        Benefit::ValeRefeicao,
    ];

    pub const fn code(self) -> &'static str {
        match self {
            Benefit::CestaBasica => "cesta basica",
            Benefit::Convenio => "convenio",
            Benefit::ValeTransporte => "VT",
            Benefit::ValeRefeicao => "VR",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|benefit| benefit.code() == code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateAddress {
    pub cep: PostalCode,
    #[serde(rename = "rua")]
    pub street: String,
    #[serde(rename = "estado")]
    pub state_code: String,
    #[serde(rename = "cidade")]
    pub city: String,
}

/// Fully sanitized submission, only produced when every field passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedPayload {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "cpf")]
    pub tax_id: String,
    pub email: String,
    /// Fixed-point with two decimals, e.g. `"1234.56"`.
    #[serde(rename = "salario")]
    pub salary: String,
    #[serde(rename = "data_nascimento")]
    pub birth_date: NaiveDate,
    #[serde(rename = "genero")]
    pub gender: Gender,
    #[serde(rename = "beneficios")]
    pub benefits: Vec<Benefit>,
    #[serde(rename = "endereco")]
    pub address: CandidateAddress,
}
