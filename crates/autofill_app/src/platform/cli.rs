use std::path::PathBuf;

use autofill_logging::LogDestination;
use clap::Parser;

use super::config::{AppConfig, Backend};

/// Fill a Brazilian address form from one or more CEPs.
#[derive(Parser, Debug)]
#[command(name = "cep-autofill", version, about = "Fill an address form from a CEP")]
pub struct Cli {
    /// Postal codes to look up, one after another, e.g. `01001-000`.
    #[arg(required = true, value_name = "CEP")]
    pub ceps: Vec<String>,

    /// RON configuration file (defaults to ./autofill.ron when present)
    #[arg(long, env = "CEP_AUTOFILL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base URL of the lookup service
    #[arg(long, env = "CEP_AUTOFILL_BASE_URL")]
    pub base_url: Option<String>,

    /// Lookup backend
    #[arg(long, value_enum)]
    pub backend: Option<Backend>,

    /// Where logs go: terminal, file or both
    #[arg(long, default_value = "terminal")]
    pub log: LogDestination,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,

    /// House number already typed into the form
    #[arg(long)]
    pub number: Option<String>,

    /// Complement already typed into the form
    #[arg(long)]
    pub complement: Option<String>,
}

impl Cli {
    /// Command-line flags win over the file.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(backend) = self.backend {
            config.backend = backend;
        }
        if let Some(base_url) = &self.base_url {
            config.base_url = Some(base_url.clone());
        }
    }
}
