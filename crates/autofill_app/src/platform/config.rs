//! Optional RON configuration for the CLI driver.
//!
//! Looked up at `--config`, else `./autofill.ron` when present; every field
//! has a default so partial files are fine.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use autofill_core::AutofillTiming;
use autofill_engine::{EngineConfig, LookupBackend, LookupSettings, VIACEP_BASE_URL};
use autofill_logging::autofill_info;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "autofill.ron";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Api,
    Viacep,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend: Backend,
    /// Defaults to the local API for `api` and to ViaCEP for `viacep`.
    pub base_url: Option<String>,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub fill_stagger_ms: u64,
    pub settle_delay_ms: u64,
    pub notification_duration_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let lookup = LookupSettings::default();
        let timing = AutofillTiming::default();
        let engine = EngineConfig::default();
        Self {
            backend: Backend::Api,
            base_url: None,
            connect_timeout_ms: millis(lookup.connect_timeout),
            request_timeout_ms: millis(lookup.request_timeout),
            fill_stagger_ms: millis(timing.fill_stagger),
            settle_delay_ms: millis(timing.settle_delay),
            notification_duration_ms: millis(engine.notification_duration),
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

impl AppConfig {
    /// Reads `explicit` if given, else the default file if it exists, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    Self::from_file(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = ron::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        autofill_info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    pub fn engine_config(&self) -> EngineConfig {
        let (backend, default_base) = match self.backend {
            Backend::Api => (LookupBackend::Api, LookupSettings::default().base_url),
            Backend::Viacep => (LookupBackend::ViaCep, VIACEP_BASE_URL.to_string()),
        };
        EngineConfig {
            lookup: LookupSettings {
                backend,
                base_url: self.base_url.clone().unwrap_or(default_base),
                connect_timeout: Duration::from_millis(self.connect_timeout_ms),
                request_timeout: Duration::from_millis(self.request_timeout_ms),
                ..LookupSettings::default()
            },
            timing: AutofillTiming {
                fill_stagger: Duration::from_millis(self.fill_stagger_ms),
                settle_delay: Duration::from_millis(self.settle_delay_ms),
            },
            notification_duration: Duration::from_millis(self.notification_duration_ms),
        }
    }
}
