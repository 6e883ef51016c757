//! Hook error types.

use thiserror::Error;

/// Failures raised by wrapped hook logic.
///
/// These are always caught at the [`GuardedHook`](crate::guarded::GuardedHook)
/// boundary and handed to the [`ExceptionSink`](crate::sink::ExceptionSink);
/// they never alter the instrumented call's own outcome.
#[derive(Debug, Error)]
pub enum HookError {
    /// Hook logic returned an error.
    #[error("hook '{name}' failed: {message}")]
    Handler {
        /// Name of the failing hook.
        name: String,
        /// Error message from the hook.
        message: String,
    },

    /// Hook logic panicked; the panic was caught at the guard boundary.
    #[error("hook '{name}' panicked: {message}")]
    Panic {
        /// Name of the panicking hook.
        name: String,
        /// Stringified panic payload.
        message: String,
    },

    /// Generic internal error.
    #[error("{0}")]
    Internal(String),
}

impl HookError {
    /// Build a [`HookError::Handler`] for the named hook.
    pub fn handler(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Handler {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Errors that can occur while loading guard settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Settings file exists but could not be read.
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file is not valid JSON.
    #[error("failed to parse settings file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_display() {
        let err = HookError::handler("span-open", "collector unavailable");
        assert_eq!(
            err.to_string(),
            "hook 'span-open' failed: collector unavailable"
        );
    }

    #[test]
    fn test_panic_display() {
        let err = HookError::Panic {
            name: "span-close".to_string(),
            message: "index out of bounds".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "hook 'span-close' panicked: index out of bounds"
        );
    }

    #[test]
    fn test_internal_display() {
        let err = HookError::Internal("oops".to_string());
        assert_eq!(err.to_string(), "oops");
    }
}
