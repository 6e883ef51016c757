//! Per-(scope, call-stack) invocation state machine.
//!
//! An [`InvocationGuard`] is a depth counter with two legal operations —
//! increment on entry, decrement on exit — each consulted, but never
//! altered, by a pure [`ExecutionPolicy`] predicate. The guard has no
//! terminal state; it is reused for the life of its owning call stack's
//! activity at the scope.
//!
//! Depth counts *all* entries, admitted or not, so the matching
//! [`leave`](InvocationGuard::leave) always finds the correct nesting level.
//! If a `leave` were ever skipped, depth would drift upward permanently and
//! silently disable `Boundary`/`Internal` admission for every future call at
//! the scope on that stack — callers must pair every `try_enter` with
//! exactly one `leave`, in LIFO order, on every exit path.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{error, trace};

use crate::policy::ExecutionPolicy;

/// Opaque data a hook can park on the guard to pass context between an
/// outer and an inner hook invocation at the same scope. Never interpreted
/// by the guard itself.
pub type Attachment = Box<dyn Any + Send>;

#[derive(Default)]
struct InvocationState {
    depth: u32,
    attachment: Option<Attachment>,
}

/// Shared handle to one call stack's invocation state at one scope.
///
/// Cloning is cheap and clones observe the same state. The handle is only
/// ever mutated from its owning call stack's sequential execution; the
/// internal lock exists so handles can be held across the entry/exit pair
/// without aliasing restrictions, not for cross-stack sharing.
#[derive(Clone, Default)]
pub struct InvocationGuard {
    state: Arc<Mutex<InvocationState>>,
}

impl InvocationGuard {
    /// Create a fresh guard at depth 0 with no attachment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an entry and decide whether it is admitted.
    ///
    /// Depth is incremented unconditionally, whatever the policy decides.
    /// Returns whether the caller should run hook logic for this entry.
    pub fn try_enter(&self, policy: ExecutionPolicy) -> bool {
        let mut state = self.state.lock();
        state.depth += 1;
        let admitted = policy.admits(state.depth);
        trace!(policy = %policy, depth = state.depth, admitted, "enter");
        admitted
    }

    /// Whether the exit pairing the most recent entry is admitted.
    ///
    /// Evaluates the same predicate as the paired
    /// [`try_enter`](Self::try_enter), against depth before decrement, so
    /// admission is symmetric per nesting level. Does not mutate.
    #[must_use]
    pub fn can_leave(&self, policy: ExecutionPolicy) -> bool {
        policy.admits(self.state.lock().depth)
    }

    /// Record the exit pairing the most recent entry.
    ///
    /// Must be called exactly once per prior `try_enter`, admitted or not,
    /// even when hook logic failed. When depth returns to 0 (outermost
    /// exit) the attachment is cleared, resetting the guard to baseline.
    ///
    /// A call at depth 0 indicates an unpaired exit in the instrumentation
    /// weaving; the guard logs an error and stays at 0 rather than
    /// disrupting the instrumented call path.
    pub fn leave(&self, policy: ExecutionPolicy) {
        let mut state = self.state.lock();
        if state.depth == 0 {
            error!(policy = %policy, "leave() without a matching try_enter()");
            return;
        }
        state.depth -= 1;
        trace!(policy = %policy, depth = state.depth, "leave");
        if state.depth == 0 {
            state.attachment = None;
        }
    }

    /// Current nesting depth.
    #[must_use]
    pub fn depth(&self) -> u32 {
        self.state.lock().depth
    }

    /// Replace the attachment, returning the previous one. Last write wins.
    pub fn set_attachment(&self, attachment: Attachment) -> Option<Attachment> {
        self.state.lock().attachment.replace(attachment)
    }

    /// Remove and return the attachment.
    pub fn remove_attachment(&self) -> Option<Attachment> {
        self.state.lock().attachment.take()
    }

    /// Whether an attachment is currently set.
    #[must_use]
    pub fn has_attachment(&self) -> bool {
        self.state.lock().attachment.is_some()
    }

    /// Read the attachment through a closure.
    ///
    /// The guard cannot hand out references across its lock, so reads go
    /// through `f`; downcast inside the closure.
    pub fn with_attachment<R>(&self, f: impl FnOnce(Option<&(dyn Any + Send)>) -> R) -> R {
        let state = self.state.lock();
        f(state.attachment.as_deref())
    }

    /// Mutate the attachment through a closure, creating it first via
    /// `create` if absent. `create` runs only when no attachment is set.
    pub fn or_create_attachment<R>(
        &self,
        create: impl FnOnce() -> Attachment,
        f: impl FnOnce(&mut (dyn Any + Send)) -> R,
    ) -> R {
        let mut state = self.state.lock();
        let attachment = state.attachment.get_or_insert_with(create);
        f(&mut **attachment)
    }
}

impl fmt::Display for InvocationGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        write!(
            f,
            "InvocationGuard(depth={}, attachment={})",
            state.depth,
            if state.attachment.is_some() { "set" } else { "none" }
        )
    }
}

impl fmt::Debug for InvocationGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("InvocationGuard")
            .field("depth", &state.depth)
            .field("has_attachment", &state.attachment.is_some())
            .finish()
    }
}
