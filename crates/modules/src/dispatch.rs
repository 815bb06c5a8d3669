//! The dispatch pipeline: parse, look up, resolve, invoke, wrap.

use std::cell::Cell;

use {
    futures::executor,
    serde_json::json,
    tokio::runtime::{Handle, RuntimeFlavor},
    tracing::{debug, warn},
};

use crate::{
    context::Context,
    envelope::ResponseEnvelope,
    query::QueryParser,
    registry::{Invocable, OperationRegistry},
    resolve,
};

thread_local! {
    /// Set while this thread is already driving a suspendable handler.
    static DRIVING: Cell<bool> = const { Cell::new(false) };
}

/// Runs suspendable handlers to completion from synchronous call sites.
///
/// Inside a multi-thread tokio runtime the blocked worker hands its queue
/// back via `block_in_place` and the runtime drives the future. Everywhere
/// else — current-thread runtime, no runtime, or a nested call from a
/// handler that is itself being driven — the future is polled on the
/// current stack. Each nested call gets its own poll loop, so reentrant
/// dispatch never contends for a shared scheduler instance.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scheduler;

impl Scheduler {
    pub fn new() -> Self {
        Self
    }

    pub fn run<F: Future>(&self, future: F) -> F::Output {
        if DRIVING.with(Cell::get) {
            return executor::block_on(future);
        }
        DRIVING.with(|driving| driving.set(true));
        let output = match Handle::try_current() {
            Ok(handle) if matches!(handle.runtime_flavor(), RuntimeFlavor::MultiThread) => {
                tokio::task::block_in_place(|| handle.block_on(future))
            },
            _ => executor::block_on(future),
        };
        DRIVING.with(|driving| driving.set(false));
        output
    }
}

/// Invokes operation handlers with normalized content and caller context.
///
/// Construction fixes the parser, registry, and scheduler for the module's
/// lifetime; nothing is fetched from ambient global state at dispatch time.
pub struct Dispatcher {
    parser: QueryParser,
    registry: OperationRegistry,
    scheduler: Scheduler,
}

impl Dispatcher {
    pub fn new(parser: QueryParser, registry: OperationRegistry, scheduler: Scheduler) -> Self {
        Self {
            parser,
            registry,
            scheduler,
        }
    }

    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    /// Run one query to an envelope. Never fails: handler errors, unknown
    /// operations, and bad references all come back as error envelopes.
    pub fn dispatch(&self, query: &str, context: Option<&Context>) -> ResponseEnvelope {
        let parsed = self.parser.parse(query);
        debug!(operation = %parsed.operation, "dispatching");

        let Some(handler) = self.registry.lookup(&parsed.operation) else {
            debug!(operation = %parsed.operation, "unsupported operation");
            return ResponseEnvelope::unsupported_operation(
                &parsed.operation,
                self.registry.operation_names(),
            );
        };

        let content = match resolve::normalize(&parsed.content) {
            Ok(content) => content,
            Err(e) => {
                warn!(operation = %parsed.operation, error = %e, "reference resolution failed");
                return ResponseEnvelope::error_with_data(
                    e.to_string(),
                    json!({"error_type": "invalid_reference", "operation": parsed.operation}),
                );
            },
        };

        let outcome = match handler {
            Invocable::Blocking(handler) => handler(content, context.cloned()),
            Invocable::Suspendable(handler) => {
                self.scheduler.run(handler(content, context.cloned()))
            },
        };

        match outcome {
            Ok(result) => ResponseEnvelope::success(&parsed.operation, result),
            Err(e) => {
                warn!(operation = %parsed.operation, error = %e, "handler failed");
                ResponseEnvelope::error_with_data(
                    format!("An error occurred: {e}"),
                    json!({"error_type": "handler_failure", "operation": parsed.operation}),
                )
            },
        }
    }
}
