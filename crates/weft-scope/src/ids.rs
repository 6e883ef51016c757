//! Identity types for scopes and call stacks.
//!
//! [`ScopeName`] is the validated registry key for a named scope.
//! [`StackToken`] identifies one call stack — the isolation boundary for
//! guard state. Tokens are passed (or derived) explicitly rather than read
//! from ambient thread identity, so the design stays portable to runtimes
//! where "current thread" is not a meaningful isolation key.

use std::cell::Cell;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::errors::ScopeError;

/// Validated name of a [`Scope`](crate::scope::Scope).
///
/// Non-empty by construction, including through deserialization.
/// Serializes as a plain string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ScopeName(String);

impl ScopeName {
    /// Create a scope name, rejecting empty or all-whitespace input.
    pub fn new(name: impl Into<String>) -> Result<Self, ScopeError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ScopeError::EmptyScopeName);
        }
        Ok(Self(name))
    }

    /// Return the inner string as a slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume self and return the inner `String`.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for ScopeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScopeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ScopeName> for String {
    fn from(name: ScopeName) -> Self {
        name.0
    }
}

impl TryFrom<String> for ScopeName {
    type Error = ScopeError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Self::new(name)
    }
}

/// Next token value; 0 is reserved as the "unassigned" sentinel.
static NEXT_STACK_TOKEN: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static THREAD_TOKEN: Cell<u64> = const { Cell::new(0) };
}

/// Identity of one call stack.
///
/// Guard lookup is keyed on this token, not on mutual exclusion: each token
/// owns its guard state outright, so concurrent stacks never contend.
///
/// [`StackToken::current`] derives a stable token for the calling OS thread.
/// Cooperative-concurrency runtimes whose logical stacks migrate across
/// threads should instead [`mint`](StackToken::mint) a token per logical
/// stack and pass it explicitly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StackToken(u64);

impl StackToken {
    /// Mint a fresh, process-unique token.
    #[must_use]
    pub fn mint() -> Self {
        Self(NEXT_STACK_TOKEN.fetch_add(1, Ordering::Relaxed))
    }

    /// Token for the calling thread, assigned lazily on first use.
    ///
    /// Stable for the life of the thread; distinct across threads.
    #[must_use]
    pub fn current() -> Self {
        THREAD_TOKEN.with(|cell| {
            if cell.get() == 0 {
                cell.set(NEXT_STACK_TOKEN.fetch_add(1, Ordering::Relaxed));
            }
            Self(cell.get())
        })
    }
}

impl fmt::Display for StackToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stack#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- ScopeName ---

    #[test]
    fn test_scope_name_valid() {
        let name = ScopeName::new("http-client").unwrap();
        assert_eq!(name.as_str(), "http-client");
    }

    #[test]
    fn test_scope_name_empty_rejected() {
        assert_eq!(ScopeName::new(""), Err(ScopeError::EmptyScopeName));
    }

    #[test]
    fn test_scope_name_whitespace_rejected() {
        assert_eq!(ScopeName::new("   "), Err(ScopeError::EmptyScopeName));
    }

    #[test]
    fn test_scope_name_display() {
        let name = ScopeName::new("redis").unwrap();
        assert_eq!(name.to_string(), "redis");
    }

    #[test]
    fn test_scope_name_into_string() {
        let name = ScopeName::new("db").unwrap();
        let s: String = name.into();
        assert_eq!(s, "db");
    }

    #[test]
    fn test_scope_name_serde_plain_string() {
        let name = ScopeName::new("rpc").unwrap();
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"rpc\"");
        let back: ScopeName = serde_json::from_str(&json).unwrap();
        assert_eq!(back, name);
    }

    #[test]
    fn test_scope_name_deserialize_validates() {
        assert!(serde_json::from_str::<ScopeName>("\"\"").is_err());
    }

    // --- StackToken ---

    #[test]
    fn test_mint_is_unique() {
        let a = StackToken::mint();
        let b = StackToken::mint();
        assert_ne!(a, b);
    }

    #[test]
    fn test_current_is_stable_within_thread() {
        let a = StackToken::current();
        let b = StackToken::current();
        assert_eq!(a, b);
    }

    #[test]
    fn test_current_differs_across_threads() {
        let here = StackToken::current();
        let there = std::thread::spawn(StackToken::current).join().unwrap();
        assert_ne!(here, there);
    }

    #[test]
    fn test_token_display() {
        let token = StackToken::mint();
        assert!(token.to_string().starts_with("stack#"));
    }
}
