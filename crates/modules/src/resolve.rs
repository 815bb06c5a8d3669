//! Content normalization: turning parsed query content into what handlers
//! actually receive.
//!
//! Content that carries a file or URL reference becomes a [`ResourceRef`]
//! with the reference split out; anything else stays a bare string. Local
//! references are resolved into the `files` storage area up front; remote
//! ones are left for the handler to fetch.

use std::path::PathBuf;

use serde::Serialize;

use wharf_common::{Result, StorageArea, file_path, refs};

/// Stand-in query text when stripping the reference leaves nothing behind.
pub const FALLBACK_QUERY: &str = "Please process this content";

/// A reference found in query content, with the residual query text.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceRef {
    /// The token as it appeared in the query.
    pub file_ref: String,
    /// Absolute path inside the `files` area; `None` for remote references.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,
    pub is_url: bool,
    /// Query text with the reference stripped.
    pub query: String,
}

/// What a handler receives as its content argument.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum NormalizedContent {
    Text(String),
    Resource(ResourceRef),
}

impl NormalizedContent {
    /// The query text regardless of shape.
    pub fn query_text(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Resource(resource) => &resource.query,
        }
    }

    pub fn resource(&self) -> Option<&ResourceRef> {
        match self {
            Self::Text(_) => None,
            Self::Resource(resource) => Some(resource),
        }
    }
}

/// Normalize parsed query content for handler invocation.
///
/// Resolution only computes a path; whether the file exists is the
/// handler's business. Fails only when a local reference would escape its
/// storage area.
pub fn normalize(content: &str) -> Result<NormalizedContent> {
    let Some(file_ref) = refs::extract_file_reference(content) else {
        return Ok(NormalizedContent::Text(content.trim().to_string()));
    };

    let is_url = refs::is_url(&file_ref);
    let resolved = if is_url {
        None
    } else {
        Some(file_path(&file_ref, StorageArea::Files)?)
    };

    let residual = content.replace(&file_ref, "");
    let residual = residual.trim();
    Ok(NormalizedContent::Resource(ResourceRef {
        file_ref,
        file_path: resolved,
        is_url,
        query: if residual.is_empty() {
            FALLBACK_QUERY.to_string()
        } else {
            residual.to_string()
        },
    }))
}
