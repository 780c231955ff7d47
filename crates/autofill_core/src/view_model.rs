use crate::{AddressForm, FieldName, FieldVisualState};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AutofillViewModel {
    pub form: AddressForm,
    pub fields: Vec<FieldRowView>,
    pub lookup_in_progress: bool,
    pub dirty: bool,
}

impl AutofillViewModel {
    pub fn field(&self, field: FieldName) -> Option<&FieldRowView> {
        self.fields.iter().find(|row| row.field == field)
    }

    /// No lookup pending and no field mid-animation.
    pub fn is_settled(&self) -> bool {
        !self.lookup_in_progress && self.fields.iter().all(|row| row.state.is_resting())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRowView {
    pub field: FieldName,
    pub state: FieldVisualState,
    pub style_class: &'static str,
    pub error_message: Option<&'static str>,
}
