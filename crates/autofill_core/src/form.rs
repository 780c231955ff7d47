use crate::{AddressLookup, FieldName, Uf};

/// Values of the address form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AddressForm {
    pub postal_code: String,
    pub street: String,
    pub number: String,
    pub complement: String,
    pub district: String,
    pub city: String,
    pub uf: Option<Uf>,
}

/// A form input the user can edit directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    PostalCode,
    Street,
    Number,
    Complement,
    District,
    City,
    Uf,
}

/// Value written into one of the lookup-filled fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FillValue {
    Text(String),
    Region(Option<Uf>),
}

impl AddressForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a user edit. Returns `false` for an unparseable region.
    pub fn edit(&mut self, field: FormField, value: String) -> bool {
        match field {
            FormField::PostalCode => self.postal_code = value,
            FormField::Street => self.street = value,
            FormField::Number => self.number = value,
            FormField::Complement => self.complement = value,
            FormField::District => self.district = value,
            FormField::City => self.city = value,
            FormField::Uf => {
                if value.trim().is_empty() {
                    self.uf = None;
                } else {
                    match value.parse() {
                        Ok(uf) => self.uf = Some(uf),
                        Err(_) => return false,
                    }
                }
            }
        }
        true
    }

    /// Writes a lookup value into the form field backing `field`.
    pub(crate) fn fill(&mut self, field: FieldName, value: FillValue) {
        match (field, value) {
            (FieldName::Street, FillValue::Text(text)) => self.street = text,
            (FieldName::District, FillValue::Text(text)) => self.district = text,
            (FieldName::City, FillValue::Text(text)) => self.city = text,
            (FieldName::Region, FillValue::Region(uf)) => self.uf = uf,
            // The postal code is never written by a lookup; mismatched pairs
            // cannot be produced by `fill_value_for`.
            _ => {}
        }
    }
}

/// The value a lookup result supplies for `field`; absent text becomes `""`.
pub(crate) fn fill_value_for(lookup: &AddressLookup, field: FieldName) -> Option<FillValue> {
    let text = |value: &Option<String>| FillValue::Text(value.clone().unwrap_or_default());
    match field {
        FieldName::Street => Some(text(&lookup.street)),
        FieldName::District => Some(text(&lookup.district)),
        FieldName::City => Some(text(&lookup.city)),
        FieldName::Region => Some(FillValue::Region(lookup.uf)),
        FieldName::PostalCode => None,
    }
}
