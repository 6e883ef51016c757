//! Scoped, exception-isolated hook wrapper.
//!
//! [`GuardedHook`] is the component actually installed at an instrumented
//! call site. It implements [`AroundHook`] itself, wrapping an inner hook
//! with a [`Scope`] + [`ExecutionPolicy`] admission check and an
//! [`ExceptionSink`] isolation boundary, so the weaving can install it
//! anywhere a plain hook would go.
//!
//! Two rules hold on every path through [`on_exit`](AroundHook::on_exit):
//! the guard's `leave` runs exactly once (via a drop guard, so hook
//! failures cannot skip it), and no failure of hook logic — error return or
//! panic — escapes to the caller.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;
use weft_scope::invocation::InvocationGuard;
use weft_scope::policy::ExecutionPolicy;
use weft_scope::scope::Scope;

use crate::errors::HookError;
use crate::hook::{AroundHook, CallFailure};
use crate::sink::ExceptionSink;

/// Releases depth bookkeeping when dropped, so `leave` runs on every exit
/// path of `on_exit` — admitted or skipped, hook failed or not.
struct LeaveOnExit<'a> {
    invocation: &'a InvocationGuard,
    policy: ExecutionPolicy,
}

impl Drop for LeaveOnExit<'_> {
    fn drop(&mut self) {
        self.invocation.leave(self.policy);
    }
}

/// Hook wrapper combining scope admission with exception isolation.
///
/// Immutable composition of the wrapped hook, its scope, the execution
/// policy, and the exception sink, all supplied at construction. Holds no
/// mutable state of its own; all per-call-stack state lives in the scope's
/// invocation guards.
pub struct GuardedHook {
    inner: Arc<dyn AroundHook>,
    scope: Arc<Scope>,
    policy: ExecutionPolicy,
    sink: Arc<dyn ExceptionSink>,
    diagnostics: bool,
}

impl GuardedHook {
    /// Wrap `inner` so it runs only when `policy` admits the current
    /// entry/exit at `scope`, with failures routed to `sink`.
    #[must_use]
    pub fn new(
        inner: Arc<dyn AroundHook>,
        scope: Arc<Scope>,
        policy: ExecutionPolicy,
        sink: Arc<dyn ExceptionSink>,
    ) -> Self {
        Self {
            inner,
            scope,
            policy,
            sink,
            diagnostics: false,
        }
    }

    /// Toggle the diagnostic records emitted when admission skips the hook.
    #[must_use]
    pub fn with_diagnostics(mut self, enabled: bool) -> Self {
        self.diagnostics = enabled;
        self
    }

    /// The policy in force at this call site.
    #[must_use]
    pub fn policy(&self) -> ExecutionPolicy {
        self.policy
    }

    /// The scope this hook coordinates through.
    #[must_use]
    pub fn scope(&self) -> &Arc<Scope> {
        &self.scope
    }

    /// Run hook logic inside the isolation boundary.
    ///
    /// Error returns and panics both become [`HookError`]s delivered to the
    /// sink; nothing propagates to the instrumented call path.
    fn run_isolated(&self, run: impl FnOnce() -> Result<(), HookError>) {
        let outcome = catch_unwind(AssertUnwindSafe(run)).unwrap_or_else(|payload| {
            Err(HookError::Panic {
                name: self.inner.name().to_string(),
                message: panic_message(payload.as_ref()),
            })
        });
        if let Err(failure) = outcome {
            self.sink.handle(&failure);
        }
    }
}

impl AroundHook for GuardedHook {
    fn name(&self) -> &str {
        self.inner.name()
    }

    /// Never returns `Err`; hook failures go to the sink.
    fn on_entry(&self, subject: &Value, args: &[Value]) -> Result<(), HookError> {
        let invocation = self.scope.current_invocation();
        if invocation.try_enter(self.policy) {
            self.run_isolated(|| self.inner.on_entry(subject, args));
        } else if self.diagnostics {
            debug!(
                hook = self.inner.name(),
                scope = %self.scope.name(),
                policy = %self.policy,
                state = %invocation,
                "entry not admitted, skipping hook"
            );
        }
        Ok(())
    }

    /// Never returns `Err`; hook failures go to the sink. `leave` runs as
    /// the final action whatever the admission outcome or hook result.
    fn on_exit(
        &self,
        subject: &Value,
        args: &[Value],
        result: Option<&Value>,
        failure: Option<&CallFailure>,
    ) -> Result<(), HookError> {
        let invocation = self.scope.current_invocation();
        let _leave = LeaveOnExit {
            invocation: &invocation,
            policy: self.policy,
        };
        if invocation.can_leave(self.policy) {
            self.run_isolated(|| self.inner.on_exit(subject, args, result, failure));
        } else if self.diagnostics {
            debug!(
                hook = self.inner.name(),
                scope = %self.scope.name(),
                policy = %self.policy,
                state = %invocation,
                "exit not admitted, skipping hook"
            );
        }
        Ok(())
    }
}

impl std::fmt::Debug for GuardedHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuardedHook")
            .field("hook", &self.inner.name())
            .field("scope", self.scope.name())
            .field("policy", &self.policy)
            .field("diagnostics", &self.diagnostics)
            .finish()
    }
}

/// Best-effort string form of a caught panic payload.
fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
