//! Event dispatch: operation → action → reconcile → completion signal.
//!
//! # Completion contract
//! - `Ack`: processed, do not redeliver. Returned on success, on unknown
//!   operations, on malformed events and on every terminal error.
//! - `NackRetryable`: redeliver. Returned only when the store error carries
//!   `retryable = true`.
//!
//! The dispatcher is the only place that decides retry vs swallow.

use psr_reconcile::{Reconciler, RemoveOutcome, UpsertOutcome};
use psr_store::{SourceGateway, StoreError, TargetGateway};
use serde_json::Value;
use tracing::{error, info, info_span, warn, Instrument};

use crate::{ChangeEvent, Operation};

/// Reconciler action selected for an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Upsert,
    Remove,
    Unsupported,
}

impl Action {
    pub fn for_operation(op: &Operation) -> Self {
        match op {
            Operation::Create | Operation::Update => Action::Upsert,
            Operation::Delete => Action::Remove,
            Operation::Other(_) => Action::Unsupported,
        }
    }
}

/// Signal returned to the event transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Ack,
    NackRetryable(StoreError),
}

impl DispatchOutcome {
    pub fn is_ack(&self) -> bool {
        matches!(self, DispatchOutcome::Ack)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchOutcome::Ack => "ACK",
            DispatchOutcome::NackRetryable(_) => "NACK_RETRYABLE",
        }
    }
}

/// Retry decision for a failed action, read from the error's own flag.
pub fn classify(err: StoreError) -> DispatchOutcome {
    if err.retryable {
        DispatchOutcome::NackRetryable(err)
    } else {
        DispatchOutcome::Ack
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ActionOutcome {
    Upserted(UpsertOutcome),
    Removed(RemoveOutcome),
}

impl ActionOutcome {
    fn summary(&self) -> String {
        match self {
            ActionOutcome::Upserted(o) => {
                serde_json::to_string(o).unwrap_or_else(|_| format!("{o:?}"))
            }
            ActionOutcome::Removed(RemoveOutcome::Removed) => "removed".to_string(),
            ActionOutcome::Removed(RemoveOutcome::AlreadyAbsent) => "already_absent".to_string(),
        }
    }
}

#[derive(Clone)]
pub struct Dispatcher {
    reconciler: Reconciler,
}

impl Dispatcher {
    pub fn new(source: SourceGateway, target: TargetGateway) -> Self {
        Self::from_reconciler(Reconciler::new(source, target))
    }

    pub fn from_reconciler(reconciler: Reconciler) -> Self {
        Self { reconciler }
    }

    /// Decode and dispatch a raw event document. A malformed event is
    /// terminal and acknowledged.
    pub async fn dispatch_raw(&self, raw: &Value) -> DispatchOutcome {
        info!(event = %raw, "change event received");
        match ChangeEvent::from_value(raw) {
            Ok(event) => self.run(&event).await,
            Err(e) => {
                error!(event = %raw, error = %e, "malformed change event, acknowledging");
                DispatchOutcome::Ack
            }
        }
    }

    pub async fn dispatch(&self, event: &ChangeEvent) -> DispatchOutcome {
        info!(event = %event.to_log_json(), "change event received");
        self.run(event).await
    }

    async fn run(&self, event: &ChangeEvent) -> DispatchOutcome {
        let span = info_span!(
            "dispatch",
            event_id = event.id.as_deref().unwrap_or("-"),
            operation = %event.operation(),
            name = %event.name()
        );
        self.handle(event).instrument(span).await
    }

    async fn handle(&self, event: &ChangeEvent) -> DispatchOutcome {
        let name = event.name();
        let result = match Action::for_operation(event.operation()) {
            Action::Upsert => self
                .reconciler
                .upsert(name, event.declared_type())
                .await
                .map(ActionOutcome::Upserted),
            Action::Remove => self
                .reconciler
                .remove(name)
                .await
                .map(ActionOutcome::Removed),
            Action::Unsupported => {
                info!(
                    operation = %event.operation(),
                    event = %event.to_log_json(),
                    "unknown operation, ignoring"
                );
                return DispatchOutcome::Ack;
            }
        };

        match result {
            Ok(outcome) => {
                info!(
                    operation = %event.operation(),
                    result = %outcome.summary(),
                    "operation completed"
                );
                DispatchOutcome::Ack
            }
            Err(err) => {
                let outcome = classify(err.clone());
                match &outcome {
                    DispatchOutcome::NackRetryable(_) => warn!(
                        event = %event.to_log_json(),
                        error = %err,
                        kind = err.kind.as_str(),
                        retryable = err.retryable,
                        "operation failed, requesting redelivery"
                    ),
                    DispatchOutcome::Ack => error!(
                        event = %event.to_log_json(),
                        error = %err,
                        kind = err.kind.as_str(),
                        retryable = err.retryable,
                        "operation failed with terminal error, acknowledging"
                    ),
                }
                outcome
            }
        }
    }
}
