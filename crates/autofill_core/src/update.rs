use crate::form::fill_value_for;
use crate::{
    format_cep, normalize_cep, AddressLookup, AttemptId, AutofillState, Cep, CepRejection, Effect,
    FieldError, FieldName, FieldVisualState, FormField, LookupFailure, Msg, Severity, TimerEvent,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AutofillState, msg: Msg) -> (AutofillState, Vec<Effect>) {
    let effects = match msg {
        Msg::FieldEdited { field, value } => {
            // Field edits never touch visual states, even mid-lookup.
            let value = if field == FormField::PostalCode {
                format_cep(&value)
            } else {
                value
            };
            let mut form = state.form().clone();
            if form.edit(field, value) && form != *state.form() {
                *state.form_mut() = form;
            }
            Vec::new()
        }
        Msg::LookupRequested => match normalize_cep(&state.form().postal_code) {
            Err(CepRejection::Empty) => Vec::new(),
            Err(CepRejection::WrongLength { .. }) => {
                state.set_field(
                    FieldName::PostalCode,
                    FieldVisualState::Error(FieldError::InvalidFormat),
                );
                Vec::new()
            }
            Ok(cep) => {
                state.set_field(FieldName::PostalCode, FieldVisualState::Normal);
                for field in FieldName::FILL_ORDER {
                    state.set_field(field, FieldVisualState::Loading);
                }
                let attempt = state.begin_attempt();
                vec![Effect::Lookup { attempt, cep }]
            }
        },
        // Results and timers of a superseded attempt never touch the form.
        Msg::LookupFinished { attempt, .. } if attempt < state.latest_attempt() => Vec::new(),
        Msg::Timer(event) if event.attempt() < state.latest_attempt() => Vec::new(),
        Msg::LookupFinished {
            attempt,
            cep,
            result,
        } => {
            state.finish_attempt(attempt);
            match result {
                Ok(lookup) => apply_success(&mut state, attempt, &cep, &lookup),
                Err(failure) => apply_failure(&mut state, &cep, failure),
            }
        }
        Msg::Timer(TimerEvent::Fill {
            attempt,
            field,
            value,
        }) => {
            if let Some(value) = value {
                state.form_mut().fill(field, value);
            }
            state.set_field(field, FieldVisualState::Success);
            vec![Effect::Schedule {
                delay: state.timing().settle_delay,
                event: TimerEvent::Settle { attempt, field },
            }]
        }
        Msg::Timer(TimerEvent::Settle { field, .. }) => {
            if state.field_state(field) == FieldVisualState::Success {
                state.set_field(field, FieldVisualState::Normal);
            }
            Vec::new()
        }
    };

    (state, effects)
}

fn apply_success(
    state: &mut AutofillState,
    attempt: AttemptId,
    cep: &Cep,
    lookup: &AddressLookup,
) -> Vec<Effect> {
    if let Some(complement) = &lookup.complement {
        if state.form().complement != *complement {
            state.form_mut().complement = complement.clone();
        }
    }

    let stagger = state.timing().fill_stagger;
    let mut effects = Vec::with_capacity(FieldName::FILL_ORDER.len() + 2);
    effects.push(Effect::Notify {
        severity: Severity::Success,
        message: format!("Address found for CEP {}.", cep.formatted()),
    });

    let reveal_order = FieldName::FILL_ORDER
        .iter()
        .copied()
        .chain(std::iter::once(FieldName::PostalCode));
    for (step, field) in (1u32..).zip(reveal_order) {
        effects.push(Effect::Schedule {
            delay: stagger.saturating_mul(step),
            event: TimerEvent::Fill {
                attempt,
                field,
                value: fill_value_for(lookup, field),
            },
        });
    }
    effects
}

fn apply_failure(state: &mut AutofillState, cep: &Cep, failure: LookupFailure) -> Vec<Effect> {
    for field in FieldName::FILL_ORDER {
        state.set_field(field, FieldVisualState::Normal);
    }
    state.set_field(
        FieldName::PostalCode,
        FieldVisualState::Error(FieldError::from(failure)),
    );

    match failure {
        LookupFailure::NotFound => vec![Effect::Notify {
            severity: Severity::Warning,
            message: format!("CEP {} not found.", cep.formatted()),
        }],
        // Transient and input errors surface on the field only.
        LookupFailure::InvalidInput
        | LookupFailure::ServiceUnavailable
        | LookupFailure::Unknown => Vec::new(),
    }
}
