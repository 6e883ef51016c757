//! Execution policies.
//!
//! A policy is a stateless admission rule evaluated against the guard's
//! nesting depth. The same predicate gates entry and exit, so an entry's
//! before/after pairing is always symmetric.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Admission rule deciding which entries/exits at a scope run hook logic.
///
/// `depth` counts all entries so far, including the one being evaluated, so
/// the outermost entry sees depth 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionPolicy {
    /// Admit every entry and exit. Disables filtering entirely, reducing the
    /// guard to a plain wrapper.
    Always,
    /// Admit only the outermost entry/exit pair. Used when a single
    /// observation per logical operation is wanted, regardless of recursion
    /// or re-entrant delegation through the same scope.
    #[default]
    Boundary,
    /// Admit only nested entries/exits — the converse of `Boundary`, for
    /// callers that care specifically about re-entrant occurrences.
    Internal,
}

impl ExecutionPolicy {
    /// Whether an entry or exit at the given depth is admitted.
    #[must_use]
    pub fn admits(self, depth: u32) -> bool {
        match self {
            Self::Always => true,
            Self::Boundary => depth == 1,
            Self::Internal => depth > 1,
        }
    }

    /// Returns all policy variants.
    #[must_use]
    pub fn all() -> &'static [ExecutionPolicy] {
        &[Self::Always, Self::Boundary, Self::Internal]
    }
}

impl fmt::Display for ExecutionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => write!(f, "always"),
            Self::Boundary => write!(f, "boundary"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

/// Error returned when a string names no [`ExecutionPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsePolicyError;

impl fmt::Display for ParsePolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected one of: always, boundary, internal")
    }
}

impl std::error::Error for ParsePolicyError {}

impl FromStr for ExecutionPolicy {
    type Err = ParsePolicyError;

    /// Case-insensitive parse of `always` / `boundary` / `internal`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "always" => Ok(Self::Always),
            "boundary" => Ok(Self::Boundary),
            "internal" => Ok(Self::Internal),
            _ => Err(ParsePolicyError),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_always_admits_any_depth() {
        for depth in [1, 2, 3, 100] {
            assert!(ExecutionPolicy::Always.admits(depth));
        }
    }

    #[test]
    fn test_boundary_admits_only_depth_one() {
        assert!(ExecutionPolicy::Boundary.admits(1));
        assert!(!ExecutionPolicy::Boundary.admits(2));
        assert!(!ExecutionPolicy::Boundary.admits(100));
    }

    #[test]
    fn test_internal_admits_only_nested() {
        assert!(!ExecutionPolicy::Internal.admits(1));
        assert!(ExecutionPolicy::Internal.admits(2));
        assert!(ExecutionPolicy::Internal.admits(100));
    }

    #[test]
    fn test_all_returns_three_variants() {
        assert_eq!(ExecutionPolicy::all().len(), 3);
    }

    #[test]
    fn test_display() {
        assert_eq!(ExecutionPolicy::Always.to_string(), "always");
        assert_eq!(ExecutionPolicy::Boundary.to_string(), "boundary");
        assert_eq!(ExecutionPolicy::Internal.to_string(), "internal");
    }

    #[test]
    fn test_from_str_case_insensitive() {
        assert_eq!("ALWAYS".parse(), Ok(ExecutionPolicy::Always));
        assert_eq!("Boundary".parse(), Ok(ExecutionPolicy::Boundary));
        assert_eq!("internal".parse(), Ok(ExecutionPolicy::Internal));
        assert_eq!("nested".parse::<ExecutionPolicy>(), Err(ParsePolicyError));
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&ExecutionPolicy::Boundary).unwrap(),
            "\"boundary\""
        );
        let back: ExecutionPolicy = serde_json::from_str("\"internal\"").unwrap();
        assert_eq!(back, ExecutionPolicy::Internal);
    }

    #[test]
    fn test_default_is_boundary() {
        assert_eq!(ExecutionPolicy::default(), ExecutionPolicy::Boundary);
    }
}
