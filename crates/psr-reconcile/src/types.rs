use psr_store::{PutRequest, PutResponse};
use serde::Serialize;

pub use psr_store::RemoveOutcome;

/// What `plan_upsert` decided for one name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UpsertPlan {
    /// Target already holds source's value and type.
    Skip,
    /// Target must be overwritten with this request.
    Write(PutRequest),
}

impl UpsertPlan {
    pub fn is_skip(&self) -> bool {
        matches!(self, UpsertPlan::Skip)
    }
}

/// Result of a completed upsert. Both variants are success.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum UpsertOutcome {
    Written(PutResponse),
    Skipped,
}

impl UpsertOutcome {
    pub fn wrote(&self) -> bool {
        matches!(self, UpsertOutcome::Written(_))
    }
}
