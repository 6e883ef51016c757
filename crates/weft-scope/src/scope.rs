//! Named scopes.
//!
//! A [`Scope`] is the shared coordination point for all hooks instrumenting
//! logically related call sites. It owns exactly one
//! [`InvocationGuard`] per call stack, resolved by [`StackToken`], with
//! lookup-or-create semantics — a resolution never fails and never leaks
//! guard state across unrelated stacks.

use dashmap::DashMap;

use crate::ids::{ScopeName, StackToken};
use crate::invocation::InvocationGuard;

/// Named, process-wide coordination point for scoped hooks.
///
/// Created once at setup (see
/// [`ScopeRegistry`](crate::registry::ScopeRegistry)) and never destroyed.
pub struct Scope {
    name: ScopeName,
    invocations: DashMap<StackToken, InvocationGuard>,
}

impl Scope {
    /// Create a scope with the given validated name.
    #[must_use]
    pub fn new(name: ScopeName) -> Self {
        Self {
            name,
            invocations: DashMap::new(),
        }
    }

    /// The scope's name.
    #[must_use]
    pub fn name(&self) -> &ScopeName {
        &self.name
    }

    /// Resolve the guard owned by the given call stack at this scope.
    ///
    /// Lazily creates a fresh guard (depth 0) the first time a stack
    /// touches this scope. Repeated calls with the same token observe the
    /// same state; distinct tokens never share state.
    #[must_use]
    pub fn invocation(&self, token: StackToken) -> InvocationGuard {
        self.invocations.entry(token).or_default().clone()
    }

    /// Resolve the guard for the calling thread's stack.
    #[must_use]
    pub fn current_invocation(&self) -> InvocationGuard {
        self.invocation(StackToken::current())
    }

    /// Drop the guard entry for a retired call stack.
    ///
    /// Thread-per-stack callers never need this; runtimes that mint their
    /// own tokens for short-lived logical stacks call it on retirement so
    /// the invocation table does not grow without bound. Returns `true` if
    /// an entry existed.
    pub fn detach(&self, token: StackToken) -> bool {
        self.invocations.remove(&token).is_some()
    }

    /// Number of call stacks currently holding a guard at this scope.
    #[must_use]
    pub fn tracked_stacks(&self) -> usize {
        self.invocations.len()
    }
}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("name", &self.name)
            .field("tracked_stacks", &self.invocations.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::policy::ExecutionPolicy;

    fn make_scope(name: &str) -> Scope {
        Scope::new(ScopeName::new(name).unwrap())
    }

    #[test]
    fn test_invocation_is_lazily_created_at_baseline() {
        let scope = make_scope("s");
        assert_eq!(scope.tracked_stacks(), 0);
        let guard = scope.invocation(StackToken::mint());
        assert_eq!(guard.depth(), 0);
        assert_eq!(scope.tracked_stacks(), 1);
    }

    #[test]
    fn test_same_token_resolves_same_state() {
        let scope = make_scope("s");
        let token = StackToken::mint();
        assert!(scope.invocation(token).try_enter(ExecutionPolicy::Always));
        assert_eq!(scope.invocation(token).depth(), 1);
    }

    #[test]
    fn test_distinct_tokens_do_not_share_state() {
        let scope = make_scope("s");
        let a = StackToken::mint();
        let b = StackToken::mint();
        assert!(scope.invocation(a).try_enter(ExecutionPolicy::Boundary));
        assert_eq!(scope.invocation(a).depth(), 1);
        assert_eq!(scope.invocation(b).depth(), 0);
        assert!(
            scope.invocation(b).try_enter(ExecutionPolicy::Boundary),
            "b's outermost entry must be admitted regardless of a's depth"
        );
    }

    #[test]
    fn test_detach_resets_stack_state() {
        let scope = make_scope("s");
        let token = StackToken::mint();
        assert!(scope.invocation(token).try_enter(ExecutionPolicy::Always));
        assert!(scope.detach(token));
        assert!(!scope.detach(token));
        assert_eq!(scope.invocation(token).depth(), 0);
    }

    /// Two call stacks touching the same scope concurrently never observe
    /// each other's depth.
    #[test]
    fn test_concurrent_stacks_are_isolated() {
        let scope = Arc::new(make_scope("shared"));
        let policy = ExecutionPolicy::Boundary;

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let scope = Arc::clone(&scope);
                std::thread::spawn(move || {
                    let guard = scope.current_invocation();
                    for _ in 0..100 {
                        assert!(guard.try_enter(policy), "outermost entry must admit");
                        assert!(!guard.try_enter(policy));
                        assert_eq!(guard.depth(), 2);
                        guard.leave(policy);
                        guard.leave(policy);
                        assert_eq!(guard.depth(), 0);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(scope.tracked_stacks(), 4);
    }

    #[test]
    fn test_debug_impl() {
        let scope = make_scope("db");
        let debug = format!("{scope:?}");
        assert!(debug.contains("Scope"));
        assert!(debug.contains("db"));
    }
}
