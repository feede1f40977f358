//! Process-local parameter store with per-name version history.
//!
//! Values are held in plaintext. `with_decryption` is accepted for API parity
//! and has no effect; key material is not modelled.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{
    Parameter, ParameterStore, ParameterTier, ParameterType, PutRequest, PutResponse, StoreError,
};

/// On-disk form of an [`InMemoryStore`]: the current record of every name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub region: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

pub struct InMemoryStore {
    region: String,
    history: Mutex<BTreeMap<String, Vec<Parameter>>>,
}

impl InMemoryStore {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            history: Mutex::new(BTreeMap::new()),
        }
    }

    /// Builder-style seeding for tests and fixtures.
    pub fn with_parameter(
        self,
        name: &str,
        value: &str,
        param_type: ParameterType,
    ) -> Self {
        self.seed(name, value, param_type);
        self
    }

    /// Append a new version of `name` without going through the async API.
    pub fn seed(&self, name: &str, value: &str, param_type: ParameterType) -> Parameter {
        self.seed_request(PutRequest {
            name: name.to_string(),
            value: value.to_string(),
            param_type,
            tier: ParameterTier::Standard,
            overwrite: true,
        })
    }

    /// Like [`InMemoryStore::seed`], with full control over the written fields.
    pub fn seed_request(&self, req: PutRequest) -> Parameter {
        let mut history = lock_or_recover(&self.history);
        append_version(&self.region, &mut history, req)
    }

    /// Current record of `name`, if any.
    pub fn current(&self, name: &str) -> Option<Parameter> {
        lock_or_recover(&self.history)
            .get(name)
            .and_then(|versions| versions.last().cloned())
    }

    /// Number of names currently held.
    pub fn len(&self) -> usize {
        lock_or_recover(&self.history).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        let history = lock_or_recover(&self.history);
        StoreSnapshot {
            region: self.region.clone(),
            parameters: history
                .values()
                .filter_map(|versions| versions.last().cloned())
                .collect(),
        }
    }

    /// Build a store labelled `region` from a snapshot. Records without
    /// provenance (hand-written fixtures) get version 1 and a local ARN.
    /// Records from a snapshot of another region get a local ARN as well.
    pub fn from_snapshot(region: impl Into<String>, snapshot: StoreSnapshot) -> Self {
        let store = Self::new(region);
        let foreign = snapshot.region != store.region;
        if foreign {
            tracing::warn!(
                snapshot_region = %snapshot.region,
                region = %store.region,
                "snapshot region differs from store region; using store region"
            );
        }
        {
            let mut history = lock_or_recover(&store.history);
            for mut p in snapshot.parameters {
                if p.version <= 0 {
                    p.version = 1;
                }
                if foreign || p.arn.is_empty() {
                    p.arn = arn_for(&store.region, &p.name);
                }
                history.insert(p.name.clone(), vec![p]);
            }
        }
        store
    }

    pub fn load_snapshot(region: impl Into<String>, path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read store snapshot {}", path.display()))?;
        let snapshot: StoreSnapshot = serde_json::from_str(&raw)
            .with_context(|| format!("parse store snapshot {}", path.display()))?;
        Ok(Self::from_snapshot(region, snapshot))
    }

    /// Write the snapshot through a sibling temp file renamed over `path`, so
    /// an interrupted save leaves the previous snapshot intact.
    pub fn save_snapshot(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.snapshot())
            .context("serialize store snapshot")?;
        let dir = match path.parent() {
            Some(d) if !d.as_os_str().is_empty() => d,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .with_context(|| format!("create temp file in {}", dir.display()))?;
        tmp.write_all(json.as_bytes())
            .with_context(|| format!("write store snapshot {}", path.display()))?;
        tmp.as_file()
            .sync_all()
            .with_context(|| format!("sync store snapshot {}", path.display()))?;
        tmp.persist(path)
            .with_context(|| format!("replace store snapshot {}", path.display()))?;
        Ok(())
    }
}

/// A panic while holding the lock cannot leave a half-written history: every
/// mutation is a single push/insert/remove. Keep serving after poisoning.
fn lock_or_recover<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn arn_for(region: &str, name: &str) -> String {
    if name.starts_with('/') {
        format!("arn:psr:ssm:{region}:parameter{name}")
    } else {
        format!("arn:psr:ssm:{region}:parameter/{name}")
    }
}

fn append_version(
    region: &str,
    history: &mut BTreeMap<String, Vec<Parameter>>,
    req: PutRequest,
) -> Parameter {
    let versions = history.entry(req.name.clone()).or_default();
    let version = versions.last().map(|p| p.version + 1).unwrap_or(1);
    let param = Parameter {
        arn: arn_for(region, &req.name),
        name: req.name,
        value: req.value,
        param_type: req.param_type,
        tier: req.tier,
        version,
        last_modified: Utc::now(),
    };
    versions.push(param.clone());
    param
}

#[async_trait::async_trait]
impl ParameterStore for InMemoryStore {
    fn region(&self) -> &str {
        &self.region
    }

    async fn get_parameter(
        &self,
        name: &str,
        _with_decryption: bool,
    ) -> Result<Parameter, StoreError> {
        self.current(name).ok_or_else(|| StoreError::not_found(name))
    }

    async fn get_parameter_history(
        &self,
        name: &str,
        _with_decryption: bool,
    ) -> Result<Vec<Parameter>, StoreError> {
        lock_or_recover(&self.history)
            .get(name)
            .filter(|versions| !versions.is_empty())
            .cloned()
            .ok_or_else(|| StoreError::not_found(name))
    }

    async fn put_parameter(&self, req: PutRequest) -> Result<PutResponse, StoreError> {
        if req.name.trim().is_empty() {
            return Err(StoreError::invalid_request("parameter name must not be empty"));
        }
        let mut history = lock_or_recover(&self.history);
        if !req.overwrite && history.contains_key(&req.name) {
            return Err(StoreError::already_exists(&req.name));
        }
        let written = append_version(&self.region, &mut history, req);
        Ok(PutResponse {
            version: written.version,
            tier: written.tier,
        })
    }

    async fn delete_parameter(&self, name: &str) -> Result<(), StoreError> {
        match lock_or_recover(&self.history).remove(name) {
            Some(_) => Ok(()),
            None => Err(StoreError::not_found(name)),
        }
    }
}
