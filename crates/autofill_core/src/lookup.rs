use std::fmt;

use crate::Uf;

/// Address returned by a successful CEP lookup. Missing values stay `None`
/// here and become empty form values when applied.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AddressLookup {
    pub street: Option<String>,
    pub complement: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub uf: Option<Uf>,
}

/// Classification of a failed lookup. This is the whole contract between the
/// lookup client and the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupFailure {
    /// 400: the service rejected the code.
    InvalidInput,
    /// 404: no address for the code.
    NotFound,
    /// 502: the upstream CEP provider is down.
    ServiceUnavailable,
    /// Anything else, including transport errors.
    Unknown,
}

impl LookupFailure {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => LookupFailure::InvalidInput,
            404 => LookupFailure::NotFound,
            502 => LookupFailure::ServiceUnavailable,
            _ => LookupFailure::Unknown,
        }
    }
}

impl fmt::Display for LookupFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupFailure::InvalidInput => write!(f, "invalid input"),
            LookupFailure::NotFound => write!(f, "not found"),
            LookupFailure::ServiceUnavailable => write!(f, "service unavailable"),
            LookupFailure::Unknown => write!(f, "unknown error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_outside_the_contract_are_unknown() {
        assert_eq!(LookupFailure::from_status(400), LookupFailure::InvalidInput);
        assert_eq!(LookupFailure::from_status(404), LookupFailure::NotFound);
        assert_eq!(
            LookupFailure::from_status(502),
            LookupFailure::ServiceUnavailable
        );
        for status in [401, 403, 418, 500, 503, 504] {
            assert_eq!(LookupFailure::from_status(status), LookupFailure::Unknown);
        }
    }
}
