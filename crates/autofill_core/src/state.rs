use std::time::Duration;

use crate::view_model::{AutofillViewModel, FieldRowView};
use crate::{AddressForm, FieldName, FieldStates, FieldVisualState};

pub type AttemptId = u64;

/// Presentation timing of the staggered fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutofillTiming {
    /// Gap between consecutive field reveals.
    pub fill_stagger: Duration,
    /// Time a revealed field stays in the success state.
    pub settle_delay: Duration,
}

impl Default for AutofillTiming {
    fn default() -> Self {
        Self {
            fill_stagger: Duration::from_millis(150),
            settle_delay: Duration::from_millis(1_500),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AutofillState {
    form: AddressForm,
    fields: FieldStates,
    timing: AutofillTiming,
    in_flight: Option<AttemptId>,
    last_attempt: AttemptId,
    dirty: bool,
}

impl AutofillState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timing(timing: AutofillTiming) -> Self {
        Self {
            timing,
            ..Self::default()
        }
    }

    /// Starts from an existing record (edit mode).
    pub fn with_form(mut self, form: AddressForm) -> Self {
        self.form = form;
        self
    }

    pub fn form(&self) -> &AddressForm {
        &self.form
    }

    pub fn field_state(&self, field: FieldName) -> FieldVisualState {
        self.fields.get(field)
    }

    pub fn timing(&self) -> AutofillTiming {
        self.timing
    }

    /// Id of the most recent lookup attempt, 0 before the first one.
    pub fn latest_attempt(&self) -> AttemptId {
        self.last_attempt
    }

    pub fn lookup_in_progress(&self) -> bool {
        self.in_flight.is_some()
    }

    /// True when no lookup is pending and every field is back to a resting
    /// state (normal or error).
    pub fn is_settled(&self) -> bool {
        !self.lookup_in_progress()
            && FieldName::ALL
                .iter()
                .all(|field| self.fields.get(*field).is_resting())
    }

    pub fn view(&self) -> AutofillViewModel {
        AutofillViewModel {
            form: self.form.clone(),
            fields: FieldName::ALL
                .iter()
                .map(|field| {
                    let state = self.fields.get(*field);
                    FieldRowView {
                        field: *field,
                        state,
                        style_class: state.style_class(),
                        error_message: state.error().map(|tag| tag.message()),
                    }
                })
                .collect(),
            lookup_in_progress: self.lookup_in_progress(),
            dirty: self.dirty,
        }
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn form_mut(&mut self) -> &mut AddressForm {
        self.dirty = true;
        &mut self.form
    }

    pub(crate) fn set_field(&mut self, field: FieldName, state: FieldVisualState) {
        if self.fields.set(field, state) {
            self.dirty = true;
        }
    }

    pub(crate) fn begin_attempt(&mut self) -> AttemptId {
        self.last_attempt += 1;
        self.in_flight = Some(self.last_attempt);
        self.dirty = true;
        self.last_attempt
    }

    /// Clears the in-progress flag when `attempt` is the latest one.
    pub(crate) fn finish_attempt(&mut self, attempt: AttemptId) {
        if self.in_flight == Some(attempt) {
            self.in_flight = None;
            self.dirty = true;
        }
    }
}
