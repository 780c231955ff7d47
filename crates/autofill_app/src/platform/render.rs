use autofill_core::{AutofillViewModel, FieldName, FieldRowView, FieldVisualState};
use autofill_engine::Notification;

const LABEL_WIDTH: usize = 12;

/// One line per visual-state change between two views, in field order.
pub fn render_changes(previous: &AutofillViewModel, next: &AutofillViewModel) -> Vec<String> {
    let mut lines = Vec::new();
    for row in &next.fields {
        let before = previous.field(row.field).map(|prev| prev.state);
        if before == Some(row.state) {
            continue;
        }
        lines.push(render_row(next, row));
    }
    lines
}

/// The whole form, one line per field plus the fields the lookup never touches.
pub fn render_form(view: &AutofillViewModel) -> Vec<String> {
    let form = &view.form;
    let mut lines: Vec<String> = view.fields.iter().map(|row| render_row(view, row)).collect();
    lines.push(format!("{:<LABEL_WIDTH$}{}", "number", form.number));
    lines.push(format!("{:<LABEL_WIDTH$}{}", "complement", form.complement));
    lines
}

pub fn render_notification(notification: &Notification) -> String {
    format!(
        "{} [{}:{}] {}",
        notification.created_at.format("%H:%M:%S"),
        notification.severity.as_str(),
        notification.severity.icon(),
        notification.message
    )
}

fn render_row(view: &AutofillViewModel, row: &FieldRowView) -> String {
    let value = field_value(view, row.field);
    let mut line = format!(
        "{:<LABEL_WIDTH$}{:<40} ({})",
        row.field.label(),
        value,
        row.style_class
    );
    if let Some(message) = row.error_message {
        line.push_str(" - ");
        line.push_str(message);
    }
    line
}

fn field_value(view: &AutofillViewModel, field: FieldName) -> String {
    let form = &view.form;
    match field {
        FieldName::PostalCode => form.postal_code.clone(),
        FieldName::Street => form.street.clone(),
        FieldName::District => form.district.clone(),
        FieldName::City => form.city.clone(),
        FieldName::Region => form.uf.map(|uf| uf.code().to_string()).unwrap_or_default(),
    }
}

/// True when the postal code ended up in an error state.
pub fn lookup_failed(view: &AutofillViewModel) -> bool {
    view.field(FieldName::PostalCode)
        .is_some_and(|row| matches!(row.state, FieldVisualState::Error(_)))
}
