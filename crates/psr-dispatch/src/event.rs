use psr_store::ParameterType;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Source-side change classification carried by an event.
///
/// Not a command to replay: Create and Update both mean "make target match
/// source". Unrecognised names are kept verbatim so they can be logged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operation {
    Create,
    Update,
    Delete,
    Other(String),
}

impl Operation {
    pub fn as_str(&self) -> &str {
        match self {
            Operation::Create => "Create",
            Operation::Update => "Update",
            Operation::Delete => "Delete",
            Operation::Other(s) => s,
        }
    }
}

impl From<String> for Operation {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Create" => Operation::Create,
            "Update" => Operation::Update,
            "Delete" => Operation::Delete,
            _ => Operation::Other(s),
        }
    }
}

impl From<Operation> for String {
    fn from(op: Operation) -> Self {
        match op {
            Operation::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeDetail {
    pub operation: Operation,
    pub name: String,
    /// Declared parameter type as sent, e.g. `"SecureString"`. Kept as raw
    /// JSON: an unexpected shape only affects decryption, never decoding.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub declared_type: Option<Value>,
}

/// One change notification.
///
/// Only `detail` is required; the envelope fields are accepted when the
/// notification bus provides them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "detail-type", default, skip_serializing_if = "Option::is_none")]
    pub detail_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    pub detail: ChangeDetail,
}

/// The event could not be interpreted at all. Terminal: redelivery cannot fix it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedEvent(pub String);

impl fmt::Display for MalformedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MALFORMED_EVENT: {}", self.0)
    }
}

impl std::error::Error for MalformedEvent {}

impl ChangeEvent {
    pub fn new(operation: &str, name: &str, declared_type: &str) -> Self {
        Self {
            id: None,
            detail_type: None,
            source: None,
            region: None,
            time: None,
            detail: ChangeDetail {
                operation: Operation::from(operation.to_string()),
                name: name.to_string(),
                declared_type: Some(Value::String(declared_type.to_string())),
            },
        }
    }

    pub fn from_value(raw: &Value) -> Result<Self, MalformedEvent> {
        let event: ChangeEvent =
            serde_json::from_value(raw.clone()).map_err(|e| MalformedEvent(e.to_string()))?;
        if event.detail.name.trim().is_empty() {
            return Err(MalformedEvent("detail.name is empty".to_string()));
        }
        Ok(event)
    }

    pub fn name(&self) -> &str {
        &self.detail.name
    }

    pub fn operation(&self) -> &Operation {
        &self.detail.operation
    }

    /// Declared type if it is a string naming a known parameter type.
    pub fn declared_type(&self) -> Option<ParameterType> {
        self.detail
            .declared_type
            .as_ref()
            .and_then(Value::as_str)
            .and_then(ParameterType::parse)
    }

    /// Compact JSON form for log lines.
    pub fn to_log_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{self:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_bus_envelope() {
        let raw = json!({
            "version": "0",
            "id": "6a7e8feb-b491-4cf7-a9f1-bf3703467718",
            "detail-type": "Parameter Store Change",
            "source": "aws.ssm",
            "account": "123456789012",
            "time": "2017-05-22T16:43:48Z",
            "region": "us-east-1",
            "resources": ["arn:aws:ssm:us-east-1:123456789012:parameter/foo"],
            "detail": {
                "operation": "Create",
                "name": "/foo",
                "type": "String",
                "description": "Sample Parameter"
            }
        });

        let ev = ChangeEvent::from_value(&raw).unwrap();
        assert_eq!(ev.operation(), &Operation::Create);
        assert_eq!(ev.name(), "/foo");
        assert_eq!(ev.declared_type(), Some(ParameterType::String));
        assert_eq!(
            ev.id.as_deref(),
            Some("6a7e8feb-b491-4cf7-a9f1-bf3703467718")
        );
        assert_eq!(ev.region.as_deref(), Some("us-east-1"));
    }

    #[test]
    fn decodes_minimal_detail_only_event() {
        let ev = ChangeEvent::from_value(&json!({
            "detail": { "operation": "Delete", "name": "/a" }
        }))
        .unwrap();
        assert_eq!(ev.operation(), &Operation::Delete);
        assert_eq!(ev.declared_type(), None);
    }

    #[test]
    fn unknown_operation_is_kept_verbatim() {
        let ev = ChangeEvent::new("Rename", "/a", "String");
        assert_eq!(ev.operation(), &Operation::Other("Rename".to_string()));
        assert_eq!(ev.operation().to_string(), "Rename");

        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["detail"]["operation"], "Rename");
    }

    #[test]
    fn operation_names_are_case_sensitive() {
        assert_eq!(
            Operation::from("create".to_string()),
            Operation::Other("create".to_string())
        );
    }

    #[test]
    fn unknown_declared_type_is_none() {
        let ev = ChangeEvent::new("Update", "/a", "Binary");
        assert_eq!(ev.declared_type(), None);
        assert_eq!(ev.detail.declared_type, Some(json!("Binary")));
    }

    #[test]
    fn non_string_declared_type_still_decodes() {
        for ty in [json!(5), json!(["SecureString"]), json!({ "t": 1 }), Value::Null] {
            let ev = ChangeEvent::from_value(&json!({
                "detail": { "operation": "Update", "name": "/a", "type": ty }
            }))
            .unwrap();
            assert_eq!(ev.operation(), &Operation::Update);
            assert_eq!(ev.declared_type(), None);
        }
    }

    #[test]
    fn missing_detail_is_malformed() {
        let err = ChangeEvent::from_value(&json!({ "id": "x" })).unwrap_err();
        assert!(err.to_string().starts_with("MALFORMED_EVENT"));
    }

    #[test]
    fn non_string_operation_is_malformed() {
        assert!(ChangeEvent::from_value(&json!({
            "detail": { "operation": 3, "name": "/a" }
        }))
        .is_err());
    }

    #[test]
    fn empty_name_is_malformed() {
        let err = ChangeEvent::from_value(&json!({
            "detail": { "operation": "Create", "name": " ", "type": "String" }
        }))
        .unwrap_err();
        assert_eq!(err, MalformedEvent("detail.name is empty".to_string()));
    }
}
