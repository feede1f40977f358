//! psr-dispatch
//!
//! Entry point for change notifications. One event in, one completion
//! signal out (`Ack` / `NackRetryable`).

mod dispatcher;
mod event;

pub use dispatcher::{classify, Action, DispatchOutcome, Dispatcher};
pub use event::{ChangeDetail, ChangeEvent, MalformedEvent, Operation};
