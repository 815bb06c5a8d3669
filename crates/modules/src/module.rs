//! The host-facing module contract.

use serde::{Deserialize, Serialize};

use crate::{context::Context, envelope::ResponseEnvelope};

/// Contract every wharf module implements.
///
/// `capabilities` is static and read once at discovery time. `process` is
/// the sole dynamic entry point; its signature is synchronous, and hosts
/// may call it from inside their own async call chains — the dispatcher's
/// [`crate::dispatch::Scheduler`] makes that safe.
pub trait Module: Send + Sync {
    fn capabilities(&self) -> Capabilities;
    fn process(&self, query: &str, context: Option<&Context>) -> ResponseEnvelope;
}

/// Static capability sheet a module advertises at discovery time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capabilities {
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub capabilities: Vec<String>,
    /// Operation names, in registration order.
    pub supported_operations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_files: Option<SupportedFiles>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub example_queries: Vec<String>,
}

/// File shapes a module is prepared to take.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportedFiles {
    pub local: Vec<String>,
    pub remote: Vec<String>,
    pub context: Vec<String>,
}
