//! Scope error types.

use thiserror::Error;

/// Errors that can occur when configuring scopes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScopeError {
    /// A scope name was empty or all whitespace.
    ///
    /// Scope names identify process-wide coordination points and are the
    /// registry key, so an empty name is a configuration error raised at
    /// construction, never deferred.
    #[error("scope name must not be empty")]
    EmptyScopeName,
}
