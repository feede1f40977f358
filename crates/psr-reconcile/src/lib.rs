//! psr-reconcile
//!
//! Per-event reconciliation of one parameter between a source and a target
//! store.
//!
//! - Upsert: target is made to match source in value and type.
//! - Remove: target is made to lack the name.
//! - Value and type equal on both sides => no write (idempotent replay).
//! - Tier and provenance are never compared.
//!
//! `plan_upsert` is the deterministic decision (no IO). `Reconciler` runs
//! the fetch-source → fetch-target → plan → act pipeline against gateways.

mod engine;
mod reconciler;
mod types;

pub use engine::{is_in_sync, plan_upsert};
pub use reconciler::Reconciler;
pub use types::*;
