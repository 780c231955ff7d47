//! Autofill engine: CEP lookup clients, the notification queue and the
//! runtime that executes core effects.
mod engine;
mod lookup;
mod notifications;
mod tasks;
mod types;
mod viacep;

pub use engine::{AutofillHandle, EngineConfig};
pub use lookup::{
    client_for, ApiCepClient, CepLookup, ErrorReporter, LogErrorReporter, LookupBackend,
    LookupSettings,
};
pub use notifications::{Notification, NotificationId, NotificationQueue, NotificationStream};
pub use types::{LookupError, LookupOptions};
pub use viacep::{ViaCepClient, VIACEP_BASE_URL};
