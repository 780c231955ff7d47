use autofill_core::LookupFailure;

/// A failed lookup: the classification the orchestrator acts on plus the
/// details used for logging.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cep lookup failed ({kind}): {message}")]
pub struct LookupError {
    pub kind: LookupFailure,
    pub status: Option<u16>,
    pub message: String,
}

impl LookupError {
    pub(crate) fn new(kind: LookupFailure, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            message: message.into(),
        }
    }

    pub(crate) fn from_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: LookupFailure::from_status(status),
            status: Some(status),
            message: message.into(),
        }
    }
}

/// Per-call switches for a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LookupOptions {
    /// Skip the client's ambient error reporter; the caller presents failures itself.
    pub suppress_error_reporting: bool,
}

impl LookupOptions {
    pub fn silent() -> Self {
        Self {
            suppress_error_reporting: true,
        }
    }
}
