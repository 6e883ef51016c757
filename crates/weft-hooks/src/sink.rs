//! Exception sinks.
//!
//! A sink receives the failures the guard catches at the hook boundary.
//! Sinks are the only channel through which hook failures become visible;
//! from the instrumented call's perspective they are swallowed entirely.

use tracing::warn;

use crate::errors::HookError;

/// Receiver for failures raised by hook logic.
///
/// Implementations must never fail themselves.
pub trait ExceptionSink: Send + Sync {
    /// Handle one hook failure.
    fn handle(&self, failure: &HookError);
}

/// Sink that reports each failure as a structured warning.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ExceptionSink for LogSink {
    fn handle(&self, failure: &HookError) {
        warn!(error = %failure, "hook logic failed; isolated from the instrumented call");
    }
}
