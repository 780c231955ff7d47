use std::collections::BTreeMap;

use crate::LookupFailure;

/// Form fields that carry a visual state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldName {
    PostalCode,
    Street,
    District,
    City,
    Region,
}

impl FieldName {
    /// Fields filled from a lookup result, in the order they are revealed.
    pub const FILL_ORDER: [FieldName; 4] = [
        FieldName::Street,
        FieldName::District,
        FieldName::City,
        FieldName::Region,
    ];

    pub const ALL: [FieldName; 5] = [
        FieldName::PostalCode,
        FieldName::Street,
        FieldName::District,
        FieldName::City,
        FieldName::Region,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FieldName::PostalCode => "cep",
            FieldName::Street => "street",
            FieldName::District => "district",
            FieldName::City => "city",
            FieldName::Region => "uf",
        }
    }
}

/// Tag attached to a field in the error state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldError {
    InvalidFormat,
    NotFound,
    ServiceUnavailable,
    UnknownError,
}

impl FieldError {
    /// Inline annotation shown next to the field.
    pub fn message(self) -> &'static str {
        match self {
            FieldError::InvalidFormat => "Invalid CEP. Use the format 00000-000.",
            FieldError::NotFound => "CEP not found.",
            FieldError::ServiceUnavailable => {
                "The CEP service is unavailable. Try again in a few minutes."
            }
            FieldError::UnknownError => "Could not look up this CEP.",
        }
    }
}

impl From<LookupFailure> for FieldError {
    fn from(failure: LookupFailure) -> Self {
        match failure {
            LookupFailure::InvalidInput => FieldError::InvalidFormat,
            LookupFailure::NotFound => FieldError::NotFound,
            LookupFailure::ServiceUnavailable => FieldError::ServiceUnavailable,
            LookupFailure::Unknown => FieldError::UnknownError,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldVisualState {
    #[default]
    Normal,
    Loading,
    Success,
    Error(FieldError),
}

impl FieldVisualState {
    /// Presentation class for the field wrapper.
    pub fn style_class(self) -> &'static str {
        match self {
            FieldVisualState::Normal => "field-normal",
            FieldVisualState::Loading => "field-loading",
            FieldVisualState::Success => "field-success",
            FieldVisualState::Error(_) => "field-error",
        }
    }

    /// Normal and error are resting states; loading and success are transient.
    pub fn is_resting(self) -> bool {
        matches!(self, FieldVisualState::Normal | FieldVisualState::Error(_))
    }

    pub fn error(self) -> Option<FieldError> {
        match self {
            FieldVisualState::Error(tag) => Some(tag),
            _ => None,
        }
    }
}

/// Per-field visual state. Unset fields read as [`FieldVisualState::Normal`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldStates {
    states: BTreeMap<FieldName, FieldVisualState>,
}

impl FieldStates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: FieldName) -> FieldVisualState {
        self.states.get(&field).copied().unwrap_or_default()
    }

    /// Returns `true` when the stored state changed.
    pub fn set(&mut self, field: FieldName, state: FieldVisualState) -> bool {
        let previous = self.states.insert(field, state).unwrap_or_default();
        previous != state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_fields_read_as_normal() {
        let states = FieldStates::new();
        for field in FieldName::ALL {
            assert_eq!(states.get(field), FieldVisualState::Normal);
        }
    }

    #[test]
    fn any_state_is_reachable_from_any_other() {
        let mut states = FieldStates::new();
        assert!(states.set(FieldName::City, FieldVisualState::Success));
        assert!(states.set(FieldName::City, FieldVisualState::Loading));
        assert!(states.set(
            FieldName::City,
            FieldVisualState::Error(FieldError::NotFound)
        ));
        assert!(states.set(FieldName::City, FieldVisualState::Normal));
        assert!(!states.set(FieldName::City, FieldVisualState::Normal));
        assert_eq!(states.get(FieldName::Street), FieldVisualState::Normal);
    }

    #[test]
    fn style_classes_are_distinct() {
        let classes = [
            FieldVisualState::Normal.style_class(),
            FieldVisualState::Loading.style_class(),
            FieldVisualState::Success.style_class(),
            FieldVisualState::Error(FieldError::UnknownError).style_class(),
        ];
        for (i, a) in classes.iter().enumerate() {
            for b in &classes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn lookup_failures_map_to_field_errors() {
        assert_eq!(
            FieldError::from(LookupFailure::InvalidInput),
            FieldError::InvalidFormat
        );
        assert_eq!(
            FieldError::from(LookupFailure::ServiceUnavailable),
            FieldError::ServiceUnavailable
        );
    }
}
