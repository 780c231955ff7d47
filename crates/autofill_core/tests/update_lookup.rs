use std::sync::Once;

use autofill_core::{
    normalize_cep, update, AutofillState, Effect, FieldError, FieldName, FieldVisualState,
    FormField, Msg,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(autofill_logging::initialize_for_tests);
}

fn type_cep(state: AutofillState, raw: &str) -> AutofillState {
    let (state, effects) = update(
        state,
        Msg::FieldEdited {
            field: FormField::PostalCode,
            value: raw.to_string(),
        },
    );
    assert!(effects.is_empty());
    state
}

#[test]
fn postal_code_input_is_formatted_without_validation() {
    init_logging();
    let mut state = type_cep(AutofillState::new(), "01001000");

    assert_eq!(state.form().postal_code, "01001-000");
    assert_eq!(
        state.field_state(FieldName::PostalCode),
        FieldVisualState::Normal
    );
    assert!(state.consume_dirty());

    let mut state = type_cep(state, "12");
    assert_eq!(state.form().postal_code, "12");
    // Short input is not an error until a lookup is requested.
    assert_eq!(
        state.field_state(FieldName::PostalCode),
        FieldVisualState::Normal
    );
    assert!(state.consume_dirty());
}

#[test]
fn empty_postal_code_is_ignored() {
    init_logging();
    let state = type_cep(AutofillState::new(), " - ");
    let before = state.clone();

    let (next, effects) = update(state, Msg::LookupRequested);

    assert_eq!(next, before);
    assert!(effects.is_empty());
}

#[test]
fn short_postal_code_marks_invalid_format_without_dispatch() {
    init_logging();
    let state = type_cep(AutofillState::new(), "1234");

    let (next, effects) = update(state, Msg::LookupRequested);

    assert!(effects.is_empty());
    assert!(!next.lookup_in_progress());
    assert_eq!(
        next.field_state(FieldName::PostalCode),
        FieldVisualState::Error(FieldError::InvalidFormat)
    );
    for field in FieldName::FILL_ORDER {
        assert_eq!(next.field_state(field), FieldVisualState::Normal);
    }
    let view = next.view();
    let row = view.field(FieldName::PostalCode).unwrap();
    assert_eq!(row.style_class, "field-error");
    assert_eq!(
        row.error_message,
        Some(FieldError::InvalidFormat.message())
    );
}

#[test]
fn valid_postal_code_dispatches_and_marks_dependents_loading() {
    init_logging();
    let state = type_cep(AutofillState::new(), "1234");
    let (state, _) = update(state, Msg::LookupRequested);
    assert!(state.field_state(FieldName::PostalCode).error().is_some());

    let state = type_cep(state, "01001-000");
    let (next, effects) = update(state, Msg::LookupRequested);

    assert_eq!(
        effects,
        vec![Effect::Lookup {
            attempt: 1,
            cep: normalize_cep("01001000").unwrap(),
        }]
    );
    assert!(next.lookup_in_progress());
    assert_eq!(
        next.field_state(FieldName::PostalCode),
        FieldVisualState::Normal
    );
    for field in FieldName::FILL_ORDER {
        assert_eq!(next.field_state(field), FieldVisualState::Loading);
    }
    assert!(next.view().lookup_in_progress);
}

#[test]
fn retriggering_starts_a_new_attempt() {
    init_logging();
    let state = type_cep(AutofillState::new(), "01001000");
    let (state, first) = update(state, Msg::LookupRequested);
    let (state, second) = update(state, Msg::LookupRequested);

    assert!(matches!(first[..], [Effect::Lookup { attempt: 1, .. }]));
    assert!(matches!(second[..], [Effect::Lookup { attempt: 2, .. }]));
    assert!(state.lookup_in_progress());
}

#[test]
fn editing_other_fields_leaves_visual_states_alone() {
    init_logging();
    let state = type_cep(AutofillState::new(), "01001000");
    let (state, _) = update(state, Msg::LookupRequested);

    let (next, effects) = update(
        state,
        Msg::FieldEdited {
            field: FormField::Street,
            value: "typed by hand".to_string(),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(next.form().street, "typed by hand");
    assert_eq!(next.field_state(FieldName::Street), FieldVisualState::Loading);
}
