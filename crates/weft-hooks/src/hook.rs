//! Hook contract.
//!
//! Defines the [`AroundHook`] trait all hook implementations must satisfy.
//! The instrumentation weaving calls `on_entry` before the instrumented call
//! and `on_exit` after it, on the same call stack, in strict LIFO pairing —
//! one `on_exit` per `on_entry`, even when the instrumented call fails.

use std::fmt;

use serde_json::Value;

use crate::errors::HookError;

/// Failure raised by the instrumented call itself.
///
/// Passed through untouched to exit hooks so they can observe the call's
/// outcome. Distinct from [`HookError`], which is a failure of hook logic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallFailure {
    /// Failure classification, e.g. the error type name at the call site.
    pub kind: String,
    /// Human-readable failure message.
    pub message: String,
}

impl CallFailure {
    /// Create a call failure.
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for CallFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Entry/exit hook around one instrumented call site.
///
/// `subject` is an opaque reference to the dispatching object of the
/// instrumented call; `args` are its positional arguments. Arity is fixed
/// per instrumentation site but otherwise arbitrary (zero or more values).
///
/// Everything here is synchronous: hooks run inline on the instrumented
/// call path and must not block. Errors returned from either operation are
/// caught by the wrapper and treated as hook failures (fail-open — they
/// never affect the instrumented call).
pub trait AroundHook: Send + Sync {
    /// Name identifying this hook in diagnostics and failure reports.
    fn name(&self) -> &str;

    /// Runs before the instrumented call.
    fn on_entry(&self, subject: &Value, args: &[Value]) -> Result<(), HookError>;

    /// Runs after the instrumented call.
    ///
    /// `result` is the produced value, if any; `failure` is present only if
    /// the instrumented call raised one.
    fn on_exit(
        &self,
        subject: &Value,
        args: &[Value],
        result: Option<&Value>,
        failure: Option<&CallFailure>,
    ) -> Result<(), HookError>;
}
