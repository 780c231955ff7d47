use std::time::Duration;

use crate::{AttemptId, Cep, FieldName, FillValue, Severity};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Issue one lookup for `cep`; the runner answers with `Msg::LookupFinished`.
    Lookup { attempt: AttemptId, cep: Cep },
    /// Push a notification onto the queue.
    Notify { severity: Severity, message: String },
    /// Deliver `Msg::Timer(event)` after `delay`, unless the runner is disposed first.
    Schedule { delay: Duration, event: TimerEvent },
}

/// Timed continuation of a successful lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// Write `value` (if any) into `field` and mark it as succeeded.
    Fill {
        attempt: AttemptId,
        field: FieldName,
        value: Option<FillValue>,
    },
    /// Decay a succeeded field back to normal.
    Settle { attempt: AttemptId, field: FieldName },
}

impl TimerEvent {
    pub fn field(&self) -> FieldName {
        match self {
            TimerEvent::Fill { field, .. } | TimerEvent::Settle { field, .. } => *field,
        }
    }

    pub fn attempt(&self) -> AttemptId {
        match self {
            TimerEvent::Fill { attempt, .. } | TimerEvent::Settle { attempt, .. } => *attempt,
        }
    }
}
