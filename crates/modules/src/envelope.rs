//! The standardized success/error wrapper every operation returns.

use {
    chrono::{SecondsFormat, Utc},
    serde::{Deserialize, Serialize},
    serde_json::{Value, json},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Uniform response shape handed back to the host for every query.
///
/// Hosts never need per-module exception handling: a failed handler, an
/// unknown operation, and a bad reference all come back as an `Error`
/// envelope with a human-readable message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub status: Status,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ResponseEnvelope {
    /// Wrap a handler's return value, stamping the operation name and an
    /// ISO-8601 timestamp.
    #[must_use]
    pub fn success(operation: &str, result: Value) -> Self {
        let data = json!({
            "demo_result": summarize(operation, &result),
            "operation": operation,
            "result": result,
            "timestamp": timestamp(),
        });
        Self {
            status: Status::Success,
            message: format!("Successfully processed {operation} operation"),
            data: Some(data),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: message.into(),
            data: None,
        }
    }

    #[must_use]
    pub fn error_with_data(message: impl Into<String>, data: Value) -> Self {
        Self {
            status: Status::Error,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Error envelope for an operation the registry does not know,
    /// listing the operations it does.
    #[must_use]
    pub fn unsupported_operation(operation: &str, supported: &[String]) -> Self {
        Self::error_with_data(
            format!("Unsupported operation: {operation}"),
            json!({
                "supported_operations": supported,
                "suggestion": "Try one of the supported operations",
            }),
        )
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// One-line human-readable result: `Operation: <output summary>`.
fn summarize(operation: &str, result: &Value) -> String {
    let mut heading: String = operation.to_string();
    if let Some(first) = heading.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    match result.get("output").and_then(Value::as_str) {
        Some(output) => format!("{heading}: {output}"),
        None => format!("{heading} completed"),
    }
}
