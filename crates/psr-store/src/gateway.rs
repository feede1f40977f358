//! Source and target gateways: the role-specific handles the reconciliation
//! core uses instead of a raw [`ParameterStore`].
//!
//! # Contracts
//! - [`SourceGateway`] is read-only. Its latest value comes from the version
//!   history, whose last entry is authoritative even when a plain read would
//!   still return an older value.
//! - [`TargetGateway`] treats absence as a normal outcome: `fetch_current`
//!   yields `None` and `remove` yields [`RemoveOutcome::AlreadyAbsent`]
//!   instead of a `NotFound` error. Every other error passes through
//!   unchanged, `retryable` flag included.

use std::sync::Arc;

use crate::{Parameter, ParameterStore, ParameterType, PutRequest, PutResponse, StoreError};

/// Decryption is requested iff the event declared a `SecureString`.
pub fn wants_decryption(declared: Option<ParameterType>) -> bool {
    declared == Some(ParameterType::SecureString)
}

/// Result of a target-side delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    AlreadyAbsent,
}

#[derive(Clone)]
pub struct SourceGateway {
    store: Arc<dyn ParameterStore>,
}

impl SourceGateway {
    pub fn new(store: Arc<dyn ParameterStore>) -> Self {
        Self { store }
    }

    pub fn region(&self) -> &str {
        self.store.region()
    }

    /// Latest version of `name`. `NotFound` is an error here.
    pub async fn fetch_latest(
        &self,
        name: &str,
        declared: Option<ParameterType>,
    ) -> Result<Parameter, StoreError> {
        let mut history = self
            .store
            .get_parameter_history(name, wants_decryption(declared))
            .await?;
        history.pop().ok_or_else(|| StoreError::not_found(name))
    }
}

#[derive(Clone)]
pub struct TargetGateway {
    store: Arc<dyn ParameterStore>,
}

impl TargetGateway {
    pub fn new(store: Arc<dyn ParameterStore>) -> Self {
        Self { store }
    }

    pub fn region(&self) -> &str {
        self.store.region()
    }

    pub async fn fetch_current(
        &self,
        name: &str,
        declared: Option<ParameterType>,
    ) -> Result<Option<Parameter>, StoreError> {
        match self
            .store
            .get_parameter(name, wants_decryption(declared))
            .await
        {
            Ok(p) => Ok(Some(p)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn upsert(&self, req: PutRequest) -> Result<PutResponse, StoreError> {
        self.store.put_parameter(req).await
    }

    pub async fn remove(&self, name: &str) -> Result<RemoveOutcome, StoreError> {
        match self.store.delete_parameter(name).await {
            Ok(()) => Ok(RemoveOutcome::Removed),
            Err(e) if e.is_not_found() => Ok(RemoveOutcome::AlreadyAbsent),
            Err(e) => Err(e),
        }
    }
}
