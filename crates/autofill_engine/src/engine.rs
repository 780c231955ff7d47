use std::sync::Arc;
use std::time::Duration;

use autofill_core::{
    update, AddressLookup, AutofillState, AutofillTiming, AutofillViewModel, Cep, Effect,
    FormField, LookupFailure, Msg, DEFAULT_NOTIFICATION_DURATION,
};
use autofill_logging::{autofill_debug, autofill_error, autofill_info, autofill_warn};
use tokio::sync::{mpsc, oneshot, watch};

use crate::lookup::client_for;
use crate::tasks::{AbortOnDrop, TaskArena};
use crate::{CepLookup, LookupOptions, LookupSettings, NotificationQueue};

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub lookup: LookupSettings,
    pub timing: AutofillTiming,
    pub notification_duration: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lookup: LookupSettings::default(),
            timing: AutofillTiming::default(),
            notification_duration: DEFAULT_NOTIFICATION_DURATION,
        }
    }
}

enum EngineCommand {
    Dispatch(Msg),
    Flush(oneshot::Sender<()>),
}

/// Handle to a running autofill orchestrator.
///
/// One actor task owns the [`AutofillState`] and applies messages in order;
/// lookups and timers run as separate tasks that post messages back. All of
/// them are cancelled by [`AutofillHandle::shutdown`] or when the handle is
/// dropped, after which no further form writes or state changes happen.
pub struct AutofillHandle {
    cmd_tx: mpsc::UnboundedSender<EngineCommand>,
    view_rx: watch::Receiver<AutofillViewModel>,
    notifications: NotificationQueue,
    tasks: Arc<TaskArena>,
}

impl AutofillHandle {
    /// Starts an orchestrator for an empty form using the configured backend.
    /// Must be called from within a Tokio runtime.
    pub fn new(config: EngineConfig) -> Self {
        let notifications = NotificationQueue::with_default_duration(config.notification_duration);
        Self::spawn(
            client_for(config.lookup),
            notifications,
            AutofillState::with_timing(config.timing),
        )
    }

    /// Starts an orchestrator with explicit collaborators.
    /// Must be called from within a Tokio runtime.
    pub fn spawn(
        client: Arc<dyn CepLookup>,
        notifications: NotificationQueue,
        initial: AutofillState,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (view_tx, view_rx) = watch::channel(initial.view());
        let tasks = Arc::new(TaskArena::new());

        let actor = Actor {
            state: initial,
            client,
            notifications: notifications.clone(),
            tasks: tasks.clone(),
            cmd_tx: cmd_tx.clone(),
            view_tx,
        };
        tasks.spawn(actor.run(cmd_rx));

        Self {
            cmd_tx,
            view_rx,
            notifications,
            tasks,
        }
    }

    /// Queues a message. Returns `false` once the orchestrator is shut down.
    pub fn dispatch(&self, msg: Msg) -> bool {
        !self.tasks.is_cancelled() && self.cmd_tx.send(EngineCommand::Dispatch(msg)).is_ok()
    }

    pub fn edit(&self, field: FormField, value: impl Into<String>) -> bool {
        self.dispatch(Msg::FieldEdited {
            field,
            value: value.into(),
        })
    }

    pub fn request_lookup(&self) -> bool {
        self.dispatch(Msg::LookupRequested)
    }

    /// Latest published view.
    pub fn view(&self) -> AutofillViewModel {
        self.view_rx.borrow().clone()
    }

    /// Receiver that is notified after every message that changed the view.
    pub fn subscribe(&self) -> watch::Receiver<AutofillViewModel> {
        self.view_rx.clone()
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    /// Waits until every message sent so far has been applied.
    pub async fn flush(&self) -> bool {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tasks.is_cancelled() || self.cmd_tx.send(EngineCommand::Flush(done_tx)).is_err() {
            return false;
        }
        done_rx.await.is_ok()
    }

    /// Waits for the messages sent so far and for the animation they started
    /// to finish. Returns `None` if the orchestrator shuts down meanwhile.
    pub async fn settled(&self) -> Option<AutofillViewModel> {
        if !self.flush().await {
            return None;
        }
        let mut view_rx = self.view_rx.clone();
        let view = view_rx
            .wait_for(AutofillViewModel::is_settled)
            .await
            .ok()?
            .clone();
        Some(view)
    }

    /// Background tasks still alive, the actor included.
    pub fn live_tasks(&self) -> usize {
        self.tasks.live()
    }

    /// Cancels the actor, pending timers and any in-flight lookup.
    pub fn shutdown(&self) {
        if !self.tasks.is_cancelled() {
            autofill_debug!("Autofill orchestrator shutting down");
            self.tasks.cancel_all();
        }
    }
}

impl Drop for AutofillHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

struct Actor {
    state: AutofillState,
    client: Arc<dyn CepLookup>,
    notifications: NotificationQueue,
    tasks: Arc<TaskArena>,
    cmd_tx: mpsc::UnboundedSender<EngineCommand>,
    view_tx: watch::Sender<AutofillViewModel>,
}

impl Actor {
    async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<EngineCommand>) {
        while let Some(command) = cmd_rx.recv().await {
            match command {
                EngineCommand::Dispatch(msg) => self.apply(msg),
                EngineCommand::Flush(done) => {
                    let _ = done.send(());
                }
            }
        }
    }

    fn apply(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let view = state.view();
        let changed = state.consume_dirty();
        self.state = state;

        // Notifications are queued before observers can see the view that caused them.
        for effect in effects {
            self.run_effect(effect);
        }
        if changed {
            self.view_tx.send_replace(view);
        }
    }

    fn run_effect(&self, effect: Effect) {
        match effect {
            Effect::Lookup { attempt, cep } => {
                autofill_debug!("Lookup attempt {} dispatched for CEP {}", attempt, cep);
                let client = self.client.clone();
                let cmd_tx = self.cmd_tx.clone();
                self.tasks.spawn(async move {
                    let result = run_lookup(client, cep.clone()).await;
                    let _ = cmd_tx.send(EngineCommand::Dispatch(Msg::LookupFinished {
                        attempt,
                        cep,
                        result,
                    }));
                });
            }
            Effect::Notify { severity, message } => {
                self.notifications.enqueue(message, severity, None);
            }
            Effect::Schedule { delay, event } => {
                let cmd_tx = self.cmd_tx.clone();
                self.tasks.spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = cmd_tx.send(EngineCommand::Dispatch(Msg::Timer(event)));
                });
            }
        }
    }
}

/// Runs one lookup on its own task so that a panicking client still yields a
/// classified failure and the in-progress flag gets cleared.
async fn run_lookup(
    client: Arc<dyn CepLookup>,
    cep: Cep,
) -> Result<AddressLookup, LookupFailure> {
    let task_cep = cep.clone();
    let handle =
        tokio::spawn(async move { client.lookup(&task_cep, LookupOptions::silent()).await });
    let _abort = AbortOnDrop(handle.abort_handle());

    match handle.await {
        Ok(Ok(address)) => {
            autofill_info!("CEP {} resolved", cep);
            Ok(address)
        }
        Ok(Err(err)) => {
            autofill_warn!("CEP {} lookup failed: {}", cep, err);
            Err(err.kind)
        }
        Err(join_err) => {
            autofill_error!("CEP {} lookup task ended abnormally: {}", cep, join_err);
            Err(LookupFailure::Unknown)
        }
    }
}
