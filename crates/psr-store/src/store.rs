use crate::{Parameter, PutRequest, PutResponse, StoreError};

/// Raw parameter store API.
///
/// Implementations are object-safe so callers can hold an
/// `Arc<dyn ParameterStore>` without knowing the concrete type, and
/// `Send + Sync` so one handle can serve concurrently dispatched events.
///
/// Absence is reported as an error of kind `NotFound`, exactly as the store
/// reports it. Turning absence into a normal outcome is the gateways' job.
#[async_trait::async_trait]
pub trait ParameterStore: Send + Sync {
    /// Region (or other label) this handle is bound to.
    fn region(&self) -> &str;

    /// Current value of `name`.
    async fn get_parameter(&self, name: &str, with_decryption: bool)
        -> Result<Parameter, StoreError>;

    /// Every retained version of `name`, oldest first.
    async fn get_parameter_history(
        &self,
        name: &str,
        with_decryption: bool,
    ) -> Result<Vec<Parameter>, StoreError>;

    async fn put_parameter(&self, req: PutRequest) -> Result<PutResponse, StoreError>;

    async fn delete_parameter(&self, name: &str) -> Result<(), StoreError>;
}
