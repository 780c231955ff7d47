use std::sync::Arc;
use std::time::Duration;

use autofill_core::{AddressLookup, Cep, LookupFailure, Uf};
use autofill_logging::{autofill_error, autofill_warn};
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::viacep::ViaCepClient;
use crate::{LookupError, LookupOptions};

/// Which lookup service the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookupBackend {
    /// The application's own `GET {base}/api/cep/{code}` endpoint.
    #[default]
    Api,
    /// The public ViaCEP service, `GET {base}/ws/{code}/json/`.
    ViaCep,
}

#[derive(Debug, Clone)]
pub struct LookupSettings {
    pub backend: LookupBackend,
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for LookupSettings {
    fn default() -> Self {
        Self {
            backend: LookupBackend::Api,
            base_url: "http://localhost:8080".to_string(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
            max_bytes: 64 * 1024,
        }
    }
}

/// Ambient error-reporting side channel of a lookup client.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, cep: &Cep, error: &LookupError);
}

/// Reports lookup failures to the log at error level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogErrorReporter;

impl ErrorReporter for LogErrorReporter {
    fn report(&self, cep: &Cep, error: &LookupError) {
        autofill_error!("CEP lookup for {} failed: {}", cep, error);
    }
}

#[async_trait::async_trait]
pub trait CepLookup: Send + Sync {
    /// Performs exactly one request for `cep`. No retries, no caching.
    async fn lookup(&self, cep: &Cep, options: LookupOptions)
        -> Result<AddressLookup, LookupError>;
}

/// Builds the client for the configured backend with the log reporter.
pub fn client_for(settings: LookupSettings) -> Arc<dyn CepLookup> {
    match settings.backend {
        LookupBackend::Api => Arc::new(ApiCepClient::new(settings)),
        LookupBackend::ViaCep => Arc::new(ViaCepClient::new(settings)),
    }
}

/// Client for the application's `/api/cep/{code}` endpoint.
pub struct ApiCepClient {
    http: JsonHttp,
    reporter: Arc<dyn ErrorReporter>,
}

#[derive(Debug, Deserialize)]
struct AddressDto {
    street: Option<String>,
    complement: Option<String>,
    district: Option<String>,
    city: Option<String>,
    uf: Option<String>,
}

impl ApiCepClient {
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
        let url = self.http.endpoint(&format!("api/cep/{}", cep.as_str()));
        let dto: AddressDto = self.http.get_json(&url).await?;
        Ok(AddressLookup {
            street: dto.street,
            complement: dto.complement,
            district: dto.district,
            city: dto.city,
            uf: parse_uf(dto.uf.as_deref()),
        })
    }
}

#[async_trait::async_trait]
impl CepLookup for ApiCepClient {
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

pub(crate) fn report_failure<T>(
    reporter: &dyn ErrorReporter,
    cep: &Cep,
    options: LookupOptions,
    result: &Result<T, LookupError>,
) {
    if let Err(err) = result {
        if !options.suppress_error_reporting {
            reporter.report(cep, err);
        }
    }
}

/// Unknown or blank region codes become "no selection".
pub(crate) fn parse_uf(raw: Option<&str>) -> Option<Uf> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse() {
        Ok(uf) => Some(uf),
        Err(err) => {
            autofill_warn!("Ignoring region in lookup result: {}", err);
            None
        }
    }
}

/// One-shot JSON GET with timeouts and a body size cap.
#[derive(Debug, Clone)]
pub(crate) struct JsonHttp {
    settings: LookupSettings,
}

impl JsonHttp {
    pub(crate) fn new(settings: LookupSettings) -> Self {
        Self { settings }
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.settings.base_url.trim_end_matches('/'), path)
    }

    fn build_client(&self) -> Result<reqwest::Client, LookupError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| LookupError::new(LookupFailure::Unknown, err.to_string()))
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, LookupError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| LookupError::new(LookupFailure::Unknown, format!("bad url: {err}")))?;
        let client = self.build_client()?;

        let response = client
            .get(parsed)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::from_status(status.as_u16(), status.to_string()));
        }

        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(too_large(max_bytes, content_len));
            }
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = body.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(too_large(max_bytes, next_len));
            }
            body.extend_from_slice(&chunk);
        }

        serde_json::from_slice(&body).map_err(|err| {
            LookupError::new(LookupFailure::Unknown, format!("invalid response body: {err}"))
        })
    }
}

fn too_large(max_bytes: u64, actual: u64) -> LookupError {
    LookupError::new(
        LookupFailure::Unknown,
        format!("response too large (max {max_bytes}, actual {actual})"),
    )
}

fn map_reqwest_error(err: reqwest::Error) -> LookupError {
    let message = if err.is_timeout() {
        format!("timeout: {err}")
    } else {
        format!("network error: {err}")
    };
    LookupError::new(LookupFailure::Unknown, message)
}
