//! psr-testkit
//!
//! Test doubles for the replication core.
//!
//! [`ScriptedStore`] wraps an [`InMemoryStore`] and
//! - records every store call in order,
//! - fails chosen operations with a scripted [`StoreError`],
//! - can pin the plain `get_parameter` answer to a stale record so tests can
//!   tell a history read from a current-value read.
//!
//! Not for production use.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use psr_store::{
    InMemoryStore, Parameter, ParameterStore, ParameterType, PutRequest, PutResponse,
    SourceGateway, StoreError, TargetGateway,
};

/// Store operation, for fault scripting and call counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    Get,
    History,
    Put,
    Delete,
}

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Get { name: String, with_decryption: bool },
    History { name: String, with_decryption: bool },
    Put(PutRequest),
    Delete { name: String },
}

impl StoreCall {
    pub fn op(&self) -> StoreOp {
        match self {
            StoreCall::Get { .. } => StoreOp::Get,
            StoreCall::History { .. } => StoreOp::History,
            StoreCall::Put(_) => StoreOp::Put,
            StoreCall::Delete { .. } => StoreOp::Delete,
        }
    }

    pub fn is_mutation(&self) -> bool {
        matches!(self, StoreCall::Put(_) | StoreCall::Delete { .. })
    }
}

pub struct ScriptedStore {
    inner: InMemoryStore,
    calls: Mutex<Vec<StoreCall>>,
    faults: Mutex<HashMap<StoreOp, StoreError>>,
    stale_current: Mutex<HashMap<String, Parameter>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ScriptedStore {
    pub fn new(region: &str) -> Self {
        Self {
            inner: InMemoryStore::new(region),
            calls: Mutex::new(Vec::new()),
            faults: Mutex::new(HashMap::new()),
            stale_current: Mutex::new(HashMap::new()),
        }
    }

    /// Seed a parameter. Seeding is not recorded as a call.
    pub fn with_parameter(self, name: &str, value: &str, param_type: ParameterType) -> Self {
        self.inner.seed(name, value, param_type);
        self
    }

    pub fn seed(&self, name: &str, value: &str, param_type: ParameterType) -> Parameter {
        self.inner.seed(name, value, param_type)
    }

    pub fn seed_request(&self, req: PutRequest) -> Parameter {
        self.inner.seed_request(req)
    }

    /// Fail every subsequent call of `op` with `err` until cleared.
    pub fn fail(&self, op: StoreOp, err: StoreError) {
        lock(&self.faults).insert(op, err);
    }

    pub fn clear_faults(&self) {
        lock(&self.faults).clear();
    }

    /// Make `get_parameter` answer `param` for its name while the history
    /// keeps moving on.
    pub fn pin_current(&self, param: Parameter) {
        lock(&self.stale_current).insert(param.name.clone(), param);
    }

    pub fn current(&self, name: &str) -> Option<Parameter> {
        self.inner.current(name)
    }

    /// The wrapped store, e.g. to save its snapshot after scripted calls.
    pub fn inner(&self) -> &InMemoryStore {
        &self.inner
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        lock(&self.calls).clone()
    }

    pub fn count(&self, op: StoreOp) -> usize {
        lock(&self.calls).iter().filter(|c| c.op() == op).count()
    }

    pub fn mutations(&self) -> usize {
        lock(&self.calls).iter().filter(|c| c.is_mutation()).count()
    }

    pub fn puts(&self) -> Vec<PutRequest> {
        lock(&self.calls)
            .iter()
            .filter_map(|c| match c {
                StoreCall::Put(req) => Some(req.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn reset_calls(&self) {
        lock(&self.calls).clear();
    }

    fn record(&self, call: StoreCall) -> Result<(), StoreError> {
        let op = call.op();
        lock(&self.calls).push(call);
        match lock(&self.faults).get(&op) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl ParameterStore for ScriptedStore {
    fn region(&self) -> &str {
        self.inner.region()
    }

    async fn get_parameter(
        &self,
        name: &str,
        with_decryption: bool,
    ) -> Result<Parameter, StoreError> {
        self.record(StoreCall::Get {
            name: name.to_string(),
            with_decryption,
        })?;
        if let Some(p) = lock(&self.stale_current).get(name) {
            return Ok(p.clone());
        }
        self.inner.get_parameter(name, with_decryption).await
    }

    async fn get_parameter_history(
        &self,
        name: &str,
        with_decryption: bool,
    ) -> Result<Vec<Parameter>, StoreError> {
        self.record(StoreCall::History {
            name: name.to_string(),
            with_decryption,
        })?;
        self.inner.get_parameter_history(name, with_decryption).await
    }

    async fn put_parameter(&self, req: PutRequest) -> Result<PutResponse, StoreError> {
        self.record(StoreCall::Put(req.clone()))?;
        lock(&self.stale_current).remove(&req.name);
        self.inner.put_parameter(req).await
    }

    async fn delete_parameter(&self, name: &str) -> Result<(), StoreError> {
        self.record(StoreCall::Delete {
            name: name.to_string(),
        })?;
        lock(&self.stale_current).remove(name);
        self.inner.delete_parameter(name).await
    }
}

/// Source and target stores plus the gateways over them.
pub struct StorePair {
    pub source: Arc<ScriptedStore>,
    pub target: Arc<ScriptedStore>,
}

impl StorePair {
    pub fn new() -> Self {
        Self {
            source: Arc::new(ScriptedStore::new("us-east-1")),
            target: Arc::new(ScriptedStore::new("eu-west-1")),
        }
    }

    pub fn source_gateway(&self) -> SourceGateway {
        SourceGateway::new(self.source.clone())
    }

    pub fn target_gateway(&self) -> TargetGateway {
        TargetGateway::new(self.target.clone())
    }
}

impl Default for StorePair {
    fn default() -> Self {
        Self::new()
    }
}
