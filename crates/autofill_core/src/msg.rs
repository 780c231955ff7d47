#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited a form input. Postal-code input is reformatted silently.
    FieldEdited {
        field: crate::FormField,
        value: String,
    },
    /// User activated "look up" for the current postal code.
    LookupRequested,
    /// The lookup client answered (or the lookup task died) for an attempt.
    LookupFinished {
        attempt: crate::AttemptId,
        cep: crate::Cep,
        result: Result<crate::AddressLookup, crate::LookupFailure>,
    },
    /// A scheduled fill or settle step is due.
    Timer(crate::TimerEvent),
}
