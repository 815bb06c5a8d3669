//! Query parsing: `operation: content`.

use wharf_common::refs;

/// Operation used when a query names none.
pub const DEFAULT_OPERATION: &str = "process";

/// A query split into its operation keyword and remaining content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    pub operation: String,
    pub content: String,
}

/// Splits raw queries on the first `:`.
///
/// The head is trimmed and lower-cased; whether it names a real operation
/// is the registry's call, not the parser's. A query without a separator
/// (or with an empty head) is all content for the default operation, so an
/// empty query is not a parse error either.
#[derive(Debug, Clone)]
pub struct QueryParser {
    default_operation: String,
}

impl Default for QueryParser {
    fn default() -> Self {
        Self::new(DEFAULT_OPERATION)
    }
}

impl QueryParser {
    pub fn new(default_operation: impl Into<String>) -> Self {
        Self {
            default_operation: default_operation.into(),
        }
    }

    pub fn parse(&self, query: &str) -> ParsedQuery {
        match query.split_once(':') {
            Some((head, rest)) if !head.trim().is_empty() => ParsedQuery {
                operation: head.trim().to_lowercase(),
                content: rest.trim().to_string(),
            },
            Some((_, rest)) => ParsedQuery {
                operation: self.default_operation.clone(),
                content: rest.trim().to_string(),
            },
            None => ParsedQuery {
                operation: self.default_operation.clone(),
                content: query.trim().to_string(),
            },
        }
    }

    /// First file or URL reference inside `content`, if any.
    ///
    /// The input is left untouched; callers strip the token themselves
    /// when building normalized content.
    pub fn extract_file_reference(&self, content: &str) -> Option<String> {
        refs::extract_file_reference(content)
    }
}
