//! Autofill core: pure CEP validation, field-state tracking and the lookup
//! state machine. Timers, IO and notifications are effects run elsewhere.
mod cep;
mod effect;
mod field;
mod form;
mod lookup;
mod msg;
mod region;
mod severity;
mod state;
mod update;
mod view_model;

pub use cep::{format_cep, normalize_cep, Cep, CepRejection, CEP_LEN};
pub use effect::{Effect, TimerEvent};
pub use field::{FieldError, FieldName, FieldStates, FieldVisualState};
pub use form::{AddressForm, FillValue, FormField};
pub use lookup::{AddressLookup, LookupFailure};
pub use msg::Msg;
pub use region::{Uf, UnknownUf};
pub use severity::{Severity, DEFAULT_NOTIFICATION_DURATION};
pub use state::{AttemptId, AutofillState, AutofillTiming};
pub use update::update;
pub use view_model::{AutofillViewModel, FieldRowView};
