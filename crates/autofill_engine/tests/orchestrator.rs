use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use autofill_core::{
    AddressForm, AddressLookup, AutofillState, AutofillTiming, Cep, FieldError, FieldName,
    FieldVisualState, FormField, LookupFailure, Severity, Uf,
};
use autofill_engine::{AutofillHandle, CepLookup, LookupError, LookupOptions, NotificationQueue};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(autofill_logging::initialize_for_tests);
}

enum Scripted {
    Found(AddressLookup),
    Status(u16),
    Panic,
}

/// Lookup client that answers from a script after a fixed latency.
struct FakeLookup {
    answer: Scripted,
    latency: Duration,
    calls: AtomicUsize,
    seen: Mutex<Vec<(String, LookupOptions)>>,
}

impl FakeLookup {
    fn new(answer: Scripted) -> Arc<Self> {
        Arc::new(Self {
            answer,
            latency: Duration::from_millis(50),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl CepLookup for FakeLookup {
    async fn lookup(
        &self,
        cep: &Cep,
        options: LookupOptions,
    ) -> Result<AddressLookup, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push((cep.to_string(), options));
        tokio::time::sleep(self.latency).await;
        match &self.answer {
            Scripted::Found(address) => Ok(address.clone()),
            Scripted::Status(status) => Err(LookupError {
                kind: LookupFailure::from_status(*status),
                status: Some(*status),
                message: format!("status {status}"),
            }),
            Scripted::Panic => panic!("lookup client blew up"),
        }
    }
}

fn timing() -> AutofillTiming {
    AutofillTiming {
        fill_stagger: Duration::from_millis(100),
        settle_delay: Duration::from_millis(1_000),
    }
}

fn start(client: Arc<FakeLookup>, form: AddressForm) -> AutofillHandle {
    init_logging();
    AutofillHandle::spawn(
        client,
        NotificationQueue::new(),
        AutofillState::with_timing(timing()).with_form(form),
    )
}

fn sp_address() -> AddressLookup {
    AddressLookup {
        street: Some("A".to_string()),
        complement: None,
        district: Some("B".to_string()),
        city: Some("C".to_string()),
        uf: Some(Uf::SP),
    }
}

fn state_of(view: &autofill_core::AutofillViewModel, field: FieldName) -> FieldVisualState {
    view.field(field).unwrap().state
}

#[tokio::test(start_paused = true)]
async fn successful_lookup_fills_form_and_notifies_once() {
    let client = FakeLookup::new(Scripted::Found(sp_address()));
    let handle = start(
        client.clone(),
        AddressForm {
            number: "100".to_string(),
            ..AddressForm::default()
        },
    );

    handle.edit(FormField::PostalCode, "01001000");
    handle.request_lookup();
    let view = handle.settled().await.expect("settled");

    assert_eq!(view.form.postal_code, "01001-000");
    assert_eq!(view.form.street, "A");
    assert_eq!(view.form.district, "B");
    assert_eq!(view.form.city, "C");
    assert_eq!(view.form.uf, Some(Uf::SP));
    assert_eq!(view.form.number, "100");
    for field in FieldName::ALL {
        assert_eq!(state_of(&view, field), FieldVisualState::Normal);
    }
    assert!(!view.lookup_in_progress);

    let notes = handle.notifications().snapshot();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].severity, Severity::Success);
    assert!(notes[0].message.contains("01001-000"));

    assert_eq!(client.calls(), 1);
    let seen = client.seen.lock().unwrap().clone();
    assert_eq!(seen[0].0, "01001000");
    assert!(seen[0].1.suppress_error_reporting);
}

#[tokio::test(start_paused = true)]
async fn fields_show_loading_then_success_in_order() {
    let client = FakeLookup::new(Scripted::Found(sp_address()));
    let handle = start(client, AddressForm::default());
    let mut views = handle.subscribe();

    handle.edit(FormField::PostalCode, "01001-000");
    handle.request_lookup();
    handle.flush().await;
    let view = handle.view();
    assert!(view.lookup_in_progress);
    for field in FieldName::FILL_ORDER {
        assert_eq!(state_of(&view, field), FieldVisualState::Loading);
    }

    // Record the order in which fields first turn successful.
    let mut succeeded = Vec::new();
    while succeeded.len() < FieldName::ALL.len() {
        views.changed().await.unwrap();
        let view = views.borrow_and_update().clone();
        for row in &view.fields {
            if row.state == FieldVisualState::Success && !succeeded.contains(&row.field) {
                succeeded.push(row.field);
            }
        }
    }
    assert_eq!(
        succeeded,
        vec![
            FieldName::Street,
            FieldName::District,
            FieldName::City,
            FieldName::Region,
            FieldName::PostalCode,
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn short_code_never_reaches_the_client() {
    let client = FakeLookup::new(Scripted::Found(sp_address()));
    let handle = start(client.clone(), AddressForm::default());

    handle.edit(FormField::PostalCode, "1234");
    handle.request_lookup();
    let view = handle.settled().await.unwrap();

    assert_eq!(client.calls(), 0);
    assert_eq!(
        state_of(&view, FieldName::PostalCode),
        FieldVisualState::Error(FieldError::InvalidFormat)
    );
    assert!(handle.notifications().snapshot().is_empty());
}

#[tokio::test(start_paused = true)]
async fn not_found_warns_once_and_clears_loading() {
    let client = FakeLookup::new(Scripted::Status(404));
    let handle = start(client, AddressForm::default());

    handle.edit(FormField::PostalCode, "99999999");
    handle.request_lookup();
    let view = handle.settled().await.unwrap();

    assert_eq!(
        state_of(&view, FieldName::PostalCode),
        FieldVisualState::Error(FieldError::NotFound)
    );
    for field in FieldName::FILL_ORDER {
        assert_eq!(state_of(&view, field), FieldVisualState::Normal);
    }
    let notes = handle.notifications().snapshot();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].severity, Severity::Warning);
}

#[tokio::test(start_paused = true)]
async fn bad_gateway_marks_service_unavailable() {
    let client = FakeLookup::new(Scripted::Status(502));
    let handle = start(client, AddressForm::default());

    handle.edit(FormField::PostalCode, "01001000");
    handle.request_lookup();
    let view = handle.settled().await.unwrap();

    assert_eq!(
        state_of(&view, FieldName::PostalCode),
        FieldVisualState::Error(FieldError::ServiceUnavailable)
    );
    assert!(view
        .fields
        .iter()
        .all(|row| row.state != FieldVisualState::Loading));
    assert!(handle.notifications().snapshot().is_empty());
}

#[tokio::test(start_paused = true)]
async fn panicking_client_still_finalizes() {
    let client = FakeLookup::new(Scripted::Panic);
    let handle = start(client, AddressForm::default());

    handle.edit(FormField::PostalCode, "01001000");
    handle.request_lookup();
    let view = handle.settled().await.unwrap();

    assert!(!view.lookup_in_progress);
    assert_eq!(
        state_of(&view, FieldName::PostalCode),
        FieldVisualState::Error(FieldError::UnknownError)
    );
    for field in FieldName::FILL_ORDER {
        assert_eq!(state_of(&view, field), FieldVisualState::Normal);
    }
}

#[tokio::test(start_paused = true)]
async fn shutdown_cancels_pending_field_writes() {
    let client = FakeLookup::new(Scripted::Found(sp_address()));
    let handle = start(client, AddressForm::default());

    handle.edit(FormField::PostalCode, "01001000");
    handle.request_lookup();
    // Past the lookup latency and the first reveal only.
    tokio::time::sleep(Duration::from_millis(160)).await;
    handle.flush().await;
    let before = handle.view();
    assert_eq!(before.form.street, "A");
    assert_eq!(before.form.district, "");

    handle.shutdown();
    assert!(!handle.request_lookup());
    tokio::time::sleep(Duration::from_secs(5)).await;

    let after = handle.view();
    assert_eq!(after, before);
    assert_eq!(handle.live_tasks(), 0);
    assert!(handle.settled().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn user_complement_survives_unless_lookup_supplies_one() {
    let form = AddressForm {
        complement: "apto 12".to_string(),
        number: "7".to_string(),
        ..AddressForm::default()
    };
    let handle = start(FakeLookup::new(Scripted::Found(sp_address())), form.clone());
    handle.edit(FormField::PostalCode, "01001000");
    handle.request_lookup();
    let view = handle.settled().await.unwrap();
    assert_eq!(view.form.complement, "apto 12");
    assert_eq!(view.form.number, "7");

    let with_complement = AddressLookup {
        complement: Some("bloco B".to_string()),
        ..sp_address()
    };
    let handle = start(FakeLookup::new(Scripted::Found(with_complement)), form);
    handle.edit(FormField::PostalCode, "01001000");
    handle.request_lookup();
    let view = handle.settled().await.unwrap();
    assert_eq!(view.form.complement, "bloco B");
    assert_eq!(view.form.number, "7");
}
