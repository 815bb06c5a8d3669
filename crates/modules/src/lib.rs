//! Operation dispatch and resource resolution for wharf plug-in modules.
//!
//! A module owns an immutable [`OperationRegistry`] built at construction
//! time, parses `operation: content` queries, resolves any file or URL
//! reference found in the content, and invokes the selected handler —
//! blocking or suspendable — behind one synchronous [`Module::process`]
//! entry point. Every per-query outcome, including handler failure, comes
//! back as a [`ResponseEnvelope`]; only a duplicate registration at
//! construction time escapes as an error.

pub mod bundled;
pub mod context;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod module;
pub mod query;
pub mod registry;
pub mod resolve;

#[cfg(test)]
mod testutil;

pub use {
    context::Context,
    dispatch::{Dispatcher, Scheduler},
    envelope::{ResponseEnvelope, Status},
    error::{Error, Result},
    module::{Capabilities, Module, SupportedFiles},
    query::{ParsedQuery, QueryParser},
    registry::{Invocable, OperationRegistry},
    resolve::{NormalizedContent, ResourceRef},
};
