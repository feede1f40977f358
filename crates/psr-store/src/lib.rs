//! psr-store
//!
//! Parameter store boundary for replication.
//!
//! - `ParameterStore` is the raw store API (get / history / put / delete).
//! - `SourceGateway` and `TargetGateway` are the only handles the
//!   reconciliation core talks to. The source gateway exposes reads only, so
//!   the core cannot mutate the source store.
//! - `InMemoryStore` is a process-local `ParameterStore` with version history
//!   and JSON snapshot persistence.

mod error;
mod gateway;
mod memory;
mod store;
mod types;

pub use error::{StoreError, StoreErrorKind};
pub use gateway::{wants_decryption, RemoveOutcome, SourceGateway, TargetGateway};
pub use memory::{InMemoryStore, StoreSnapshot};
pub use store::ParameterStore;
pub use types::{Parameter, ParameterTier, ParameterType, PutRequest, PutResponse};
