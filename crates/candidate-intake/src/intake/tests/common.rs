use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use chrono::NaiveDate;

use crate::intake::{
    CandidateForm, CandidateId, CandidateIntakeService, CandidateRecord, CandidateRepository,
    CandidateValidator, RepositoryError, ValidatedPayload,
};

pub(super) const TOKEN: &str = "f3b1c2d4e5a60718293a4b5c6d7e8f90";

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 17).expect("valid date")
}

pub(super) fn valid_form() -> CandidateForm {
    CandidateForm {
        name: "  Maria   José da Silva ".to_string(),
        tax_id: "111.444.777-35".to_string(),
        email: " maria.silva@example.com ".to_string(),
        salary: "R$ 1.234,56".to_string(),
        birth_date: "1990-05-17".to_string(),
        gender: " Feminino ".to_string(),
        benefits: vec![
            "Selecione".to_string(),
            "cesta basica".to_string(),
            "VT".to_string(),
            "cesta basica".to_string(),
        ],
        postal_code: "01310-100".to_string(),
        street: "Avenida Paulista,  1000".to_string(),
        state_code: "sp".to_string(),
        city: "S&atilde;o Paulo".to_string(),
        honeypot: String::new(),
        csrf_token: Some(TOKEN.to_string()),
    }
}

pub(super) const VALID_FORM_BODY: &str = "nome=Maria+Jos%C3%A9+da+Silva&cpf=111.444.777-35\
&email=maria.silva%40example.com&salario=R%24+1.234%2C56&data_nascimento=1990-05-17\
&genero=feminino&beneficios=cesta+basica&beneficios=VT&cep=01310-100&rua=Avenida+Paulista\
&estado=SP&cidade=S%C3%A3o+Paulo&website=&csrf_token=f3b1c2d4e5a60718293a4b5c6d7e8f90";

#[derive(Default)]
pub(super) struct MemoryRepository {
    records: Mutex<BTreeMap<CandidateId, CandidateRecord>>,
}

impl MemoryRepository {
    pub(super) fn stored(&self) -> Vec<CandidateRecord> {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .values()
            .cloned()
            .collect()
    }
}

impl CandidateRepository for MemoryRepository {
    fn insert(&self, payload: ValidatedPayload) -> Result<CandidateRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let id = CandidateId(guard.len() as u64 + 1);
        let record = CandidateRecord { id, payload };
        guard.insert(id, record.clone());
        Ok(record)
    }
}

pub(super) struct UnavailableRepository;

impl CandidateRepository for UnavailableRepository {
    fn insert(&self, _payload: ValidatedPayload) -> Result<CandidateRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("connection reset".to_string()))
    }
}

pub(super) fn build_service() -> (
    Arc<CandidateIntakeService<MemoryRepository>>,
    Arc<MemoryRepository>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let service = Arc::new(CandidateIntakeService::new(
        repository.clone(),
        CandidateValidator::default(),
    ));
    (service, repository)
}

pub(super) fn form_request(body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::post("/api/v1/candidates")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(token) = cookie {
        builder = builder.header(header::COOKIE, format!("csrf_token={token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

pub(super) async fn read_html_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 html")
}
