use std::fmt;

/// What went wrong at the store boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreErrorKind {
    /// The named parameter does not exist.
    NotFound,
    /// Non-overwriting put on an existing name.
    AlreadyExists,
    /// The caller is not permitted to perform the operation.
    AccessDenied,
    /// The request was rejected as malformed.
    InvalidRequest,
    /// Rate limited by the store.
    Throttled,
    /// Network failure or server-side fault.
    Unavailable,
}

impl StoreErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreErrorKind::NotFound => "PARAMETER_NOT_FOUND",
            StoreErrorKind::AlreadyExists => "PARAMETER_ALREADY_EXISTS",
            StoreErrorKind::AccessDenied => "ACCESS_DENIED",
            StoreErrorKind::InvalidRequest => "INVALID_REQUEST",
            StoreErrorKind::Throttled => "THROTTLED",
            StoreErrorKind::Unavailable => "UNAVAILABLE",
        }
    }

    /// Default retry classification for the kind.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreErrorKind::Throttled | StoreErrorKind::Unavailable)
    }
}

/// Error returned by a [`crate::ParameterStore`] or gateway.
///
/// `retryable` is decided once, where the error is created. Callers read the
/// flag; they never re-derive it from `kind`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    pub kind: StoreErrorKind,
    pub retryable: bool,
    pub message: String,
}

impl StoreError {
    /// Explicit classification, for stores that learn retryability from the wire.
    pub fn new(kind: StoreErrorKind, retryable: bool, message: impl Into<String>) -> Self {
        Self {
            kind,
            retryable,
            message: message.into(),
        }
    }

    fn of_kind(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self::new(kind, kind.is_retryable(), message)
    }

    pub fn not_found(name: &str) -> Self {
        Self::of_kind(
            StoreErrorKind::NotFound,
            format!("parameter {name} not found"),
        )
    }

    pub fn already_exists(name: &str) -> Self {
        Self::of_kind(
            StoreErrorKind::AlreadyExists,
            format!("parameter {name} already exists and overwrite is false"),
        )
    }

    pub fn access_denied(message: impl Into<String>) -> Self {
        Self::of_kind(StoreErrorKind::AccessDenied, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::of_kind(StoreErrorKind::InvalidRequest, message)
    }

    pub fn throttled(message: impl Into<String>) -> Self {
        Self::of_kind(StoreErrorKind::Throttled, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::of_kind(StoreErrorKind::Unavailable, message)
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == StoreErrorKind::NotFound
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.as_str(), self.message)
    }
}

impl std::error::Error for StoreError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_classify_retryability_once() {
        assert!(StoreError::throttled("rate exceeded").retryable);
        assert!(StoreError::unavailable("connection reset").retryable);
        assert!(!StoreError::access_denied("no ssm:PutParameter").retryable);
        assert!(!StoreError::invalid_request("bad name").retryable);
        assert!(!StoreError::not_found("/a").retryable);
        assert!(!StoreError::already_exists("/a").retryable);
    }

    #[test]
    fn explicit_flag_overrides_kind_default() {
        let e = StoreError::new(StoreErrorKind::AccessDenied, true, "token expired");
        assert!(e.retryable);
        assert_eq!(e.kind, StoreErrorKind::AccessDenied);
    }

    #[test]
    fn display_carries_kind_code_and_message() {
        assert_eq!(
            StoreError::not_found("/app/x").to_string(),
            "PARAMETER_NOT_FOUND: parameter /app/x not found"
        );
        assert_eq!(
            StoreError::throttled("slow down").to_string(),
            "THROTTLED: slow down"
        );
    }
}
