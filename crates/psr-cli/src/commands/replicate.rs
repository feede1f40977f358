//! `psr replicate`: replay change events between two snapshot-backed stores.

use anyhow::{Context, Result};
use psr_config::ReplicatorConfig;
use psr_dispatch::{DispatchOutcome, Dispatcher};
use psr_store::{InMemoryStore, ParameterStore, SourceGateway, TargetGateway};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use super::{parse_event_stream, read_event_input};

/// Exit code asking the caller to redeliver (EX_TEMPFAIL).
pub const EXIT_REDELIVER: i32 = 75;

pub struct ReplicateReport {
    pub outcomes: Vec<DispatchOutcome>,
}

impl ReplicateReport {
    pub fn redeliver_requested(&self) -> bool {
        self.outcomes.iter().any(|o| !o.is_ack())
    }

    /// One completion signal per event, in input order.
    pub fn signal_lines(&self) -> Vec<&'static str> {
        self.outcomes.iter().map(DispatchOutcome::as_str).collect()
    }

    pub fn exit_code(&self) -> i32 {
        if self.redeliver_requested() {
            EXIT_REDELIVER
        } else {
            0
        }
    }
}

pub async fn run_replicate(
    cfg: &ReplicatorConfig,
    source_path: &Path,
    target_path: &Path,
    events_path: Option<&Path>,
) -> Result<ReplicateReport> {
    let events = parse_event_stream(&read_event_input(events_path)?)?;

    let source = InMemoryStore::load_snapshot(cfg.source_region.clone(), source_path)
        .context("load source store")?;
    let target = if target_path.exists() {
        InMemoryStore::load_snapshot(cfg.target_region.clone(), target_path)
            .context("load target store")?
    } else {
        info!(path = %target_path.display(), "target snapshot missing, starting empty");
        InMemoryStore::new(cfg.target_region.clone())
    };
    let target = Arc::new(target);

    info!(
        source_region = %cfg.source_region,
        target_region = %cfg.target_region,
        events = events.len(),
        "replicate starting"
    );
    let dispatcher = Dispatcher::new(
        SourceGateway::new(Arc::new(source)),
        TargetGateway::new(target.clone()),
    );

    replicate_with(&dispatcher, &target, &events, target_path).await
}

/// Dispatch `events` in order, then save `target` to `target_path`. The save
/// happens even when some events asked for redelivery, so acknowledged work
/// is kept.
pub async fn replicate_with(
    dispatcher: &Dispatcher,
    target: &InMemoryStore,
    events: &[Value],
    target_path: &Path,
) -> Result<ReplicateReport> {
    let mut outcomes = Vec::with_capacity(events.len());
    for raw in events {
        outcomes.push(dispatcher.dispatch_raw(raw).await);
    }

    target
        .save_snapshot(target_path)
        .context("save target store")?;

    info!(
        events = outcomes.len(),
        redeliver = outcomes.iter().filter(|o| !o.is_ack()).count(),
        target_region = %target.region(),
        "replicate finished"
    );

    Ok(ReplicateReport { outcomes })
}
