//! Operation handlers and the per-module registry that owns them.

use std::collections::HashMap;

use futures::future::{BoxFuture, FutureExt};

use crate::{
    context::Context,
    error::{Error, Result},
    resolve::NormalizedContent,
};

/// What a handler produces: an arbitrary JSON payload, by convention with
/// an `output` summary field.
pub type HandlerOutput = anyhow::Result<serde_json::Value>;

type BlockingHandler =
    Box<dyn Fn(NormalizedContent, Option<Context>) -> HandlerOutput + Send + Sync>;
type SuspendableHandler =
    Box<dyn Fn(NormalizedContent, Option<Context>) -> BoxFuture<'static, HandlerOutput> + Send + Sync>;

/// A handler as a two-variant capability.
///
/// The dispatcher pattern-matches on the variant: `Blocking` is called in
/// place, `Suspendable` is driven to completion by the dispatcher's
/// scheduler. Module authors register whichever shape their operation
/// naturally has; callers of `process` cannot tell the difference.
pub enum Invocable {
    Blocking(BlockingHandler),
    Suspendable(SuspendableHandler),
}

impl Invocable {
    pub fn blocking<F>(handler: F) -> Self
    where
        F: Fn(NormalizedContent, Option<Context>) -> HandlerOutput + Send + Sync + 'static,
    {
        Self::Blocking(Box::new(handler))
    }

    pub fn suspendable<F, Fut>(handler: F) -> Self
    where
        F: Fn(NormalizedContent, Option<Context>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerOutput> + Send + 'static,
    {
        Self::Suspendable(Box::new(move |content, context| {
            handler(content, context).boxed()
        }))
    }

    pub fn is_suspendable(&self) -> bool {
        matches!(self, Self::Suspendable(_))
    }
}

impl std::fmt::Debug for Invocable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Blocking(_) => "Invocable::Blocking",
            Self::Suspendable(_) => "Invocable::Suspendable",
        })
    }
}

/// Mapping from operation name to handler, fixed at module construction.
///
/// Names are unique: a second registration under the same name is a
/// programming error surfaced immediately, never an overwrite. Lookup is
/// case-sensitive on the parser's lower-cased operation names.
#[derive(Debug, Default)]
pub struct OperationRegistry {
    order: Vec<String>,
    handlers: HashMap<String, Invocable>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, handler: Invocable) -> Result<()> {
        let name = name.into();
        if self.handlers.contains_key(&name) {
            return Err(Error::duplicate_operation(name));
        }
        self.order.push(name.clone());
        self.handlers.insert(name, handler);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&Invocable> {
        self.handlers.get(name)
    }

    /// Operation names in registration order.
    pub fn operation_names(&self) -> &[String] {
        &self.order
    }
}
