use psr_store::{ParameterType, RemoveOutcome, SourceGateway, StoreError, TargetGateway};
use tracing::{debug, info};

use crate::{plan_upsert, UpsertOutcome, UpsertPlan};

/// Applies one event's worth of change to the target.
///
/// Each step is awaited before the next and any store error short-circuits
/// the rest unchanged. Absence on the target has already been turned into a
/// normal outcome by [`TargetGateway`].
#[derive(Clone)]
pub struct Reconciler {
    source: SourceGateway,
    target: TargetGateway,
}

impl Reconciler {
    pub fn new(source: SourceGateway, target: TargetGateway) -> Self {
        Self { source, target }
    }

    pub fn source_region(&self) -> &str {
        self.source.region()
    }

    pub fn target_region(&self) -> &str {
        self.target.region()
    }

    /// Make target match source for `name`.
    ///
    /// `NotFound` on the source is returned as an error: the event claims a
    /// change that the source cannot show.
    pub async fn upsert(
        &self,
        name: &str,
        declared: Option<ParameterType>,
    ) -> Result<UpsertOutcome, StoreError> {
        let source = self.source.fetch_latest(name, declared).await?;
        let target = self.target.fetch_current(name, declared).await?;
        debug!(
            name,
            source_version = source.version,
            target_present = target.is_some(),
            "fetched source and target"
        );

        match plan_upsert(&source, target.as_ref()) {
            UpsertPlan::Skip => {
                info!(
                    name,
                    region = %self.target.region(),
                    "parameter is already in target region with the same value and type, ignoring"
                );
                Ok(UpsertOutcome::Skipped)
            }
            UpsertPlan::Write(req) => {
                let resp = self.target.upsert(req).await?;
                Ok(UpsertOutcome::Written(resp))
            }
        }
    }

    /// Make target lack `name`. Already absent is success.
    pub async fn remove(&self, name: &str) -> Result<RemoveOutcome, StoreError> {
        let outcome = self.target.remove(name).await?;
        if outcome == RemoveOutcome::AlreadyAbsent {
            info!(
                name,
                region = %self.target.region(),
                "parameter was not found in target region, ignoring"
            );
        }
        Ok(outcome)
    }
}
