//! Direct client for the public ViaCEP service.
//!
//! ViaCEP answers unknown codes with `200 {"erro": true}` and uses empty
//! strings for missing values, so both are normalized here before the result
//! reaches the orchestrator.

use std::sync::Arc;

use autofill_core::{AddressLookup, Cep, LookupFailure};
use serde::Deserialize;

use crate::lookup::{parse_uf, report_failure, JsonHttp, LogErrorReporter};
use crate::{CepLookup, ErrorReporter, LookupError, LookupOptions, LookupSettings};

pub const VIACEP_BASE_URL: &str = "https://viacep.com.br";

#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    cep: Option<String>,
    logradouro: Option<String>,
    complemento: Option<String>,
    bairro: Option<String>,
    localidade: Option<String>,
    uf: Option<String>,
    #[serde(default)]
    erro: Option<serde_json::Value>,
}

impl ViaCepResponse {
    fn is_not_found(&self) -> bool {
        let flagged = match &self.erro {
            Some(serde_json::Value::Bool(flag)) => *flag,
            Some(serde_json::Value::String(text)) => text.eq_ignore_ascii_case("true"),
            _ => false,
        };
        flagged || self.cep.as_deref().map_or(true, str::is_empty)
    }

    fn into_lookup(self) -> AddressLookup {
        AddressLookup {
            street: non_empty(self.logradouro),
            complement: non_empty(self.complemento),
            district: non_empty(self.bairro),
            city: non_empty(self.localidade),
            uf: parse_uf(self.uf.as_deref()),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

pub struct ViaCepClient {
    http: JsonHttp,
    reporter: Arc<dyn ErrorReporter>,
}

impl ViaCepClient {
    pub fn new(settings: LookupSettings) -> Self {
        Self {
            http: JsonHttp::new(settings),
            reporter: Arc::new(LogErrorReporter),
        }
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    async fn request(&self, cep: &Cep) -> Result<AddressLookup, LookupError> {
        let url = self.http.endpoint(&format!("ws/{}/json/", cep.as_str()));
        let response: ViaCepResponse = self.http.get_json(&url).await?;
        if response.is_not_found() {
            return Err(LookupError::new(
                LookupFailure::NotFound,
                format!("CEP {} not found", cep.formatted()),
            ));
        }
        Ok(response.into_lookup())
    }
}

#[async_trait::async_trait]
impl CepLookup for ViaCepClient {
    async fn lookup(
        &self,
        cep: &Cep,
        options: LookupOptions,
    ) -> Result<AddressLookup, LookupError> {
        let result = self.request(cep).await;
        report_failure(self.reporter.as_ref(), cep, options, &result);
        result
    }
}
