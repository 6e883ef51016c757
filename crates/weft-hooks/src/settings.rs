//! Guard configuration.
//!
//! Loading flow:
//! 1. Start with compiled [`GuardSettings::default()`]
//! 2. If a settings file exists at the given path, its JSON values replace
//!    the defaults
//! 3. Apply environment variable overrides (highest priority)
//!
//! Env overrides use strict parsing; invalid values are silently ignored,
//! falling back to the file/default value:
//! - `WEFT_GUARD_DIAGNOSTICS`: `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`
//! - `WEFT_DEFAULT_POLICY`: `always` / `boundary` / `internal`

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;
use weft_scope::policy::ExecutionPolicy;

use crate::errors::SettingsError;

/// Configuration for guard construction at instrumentation setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GuardSettings {
    /// Emit a debug record whenever admission skips a hook.
    pub diagnostics: bool,
    /// Policy applied to scopes without an explicit override.
    pub default_policy: ExecutionPolicy,
    /// Per-scope policy overrides, keyed by scope name.
    pub scope_policies: HashMap<String, ExecutionPolicy>,
}

impl Default for GuardSettings {
    fn default() -> Self {
        Self {
            diagnostics: false,
            default_policy: ExecutionPolicy::Boundary,
            scope_policies: HashMap::new(),
        }
    }
}

impl GuardSettings {
    /// Load settings from a JSON file with env var overrides.
    ///
    /// A missing file yields defaults; invalid JSON is an error.
    pub fn load_from_path(path: &Path) -> Result<Self, SettingsError> {
        let mut settings = if path.exists() {
            debug!(?path, "loading guard settings from file");
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str(&content)?
        } else {
            debug!(?path, "guard settings file not found, using defaults");
            Self::default()
        };
        settings.apply_env_overrides();
        Ok(settings)
    }

    /// The policy in force for the named scope.
    #[must_use]
    pub fn policy_for(&self, scope_name: &str) -> ExecutionPolicy {
        self.scope_policies
            .get(scope_name)
            .copied()
            .unwrap_or(self.default_policy)
    }

    fn apply_env_overrides(&mut self) {
        if let Some(v) = read_env("WEFT_GUARD_DIAGNOSTICS", parse_bool) {
            self.diagnostics = v;
        }
        if let Some(v) = read_env("WEFT_DEFAULT_POLICY", parse_policy) {
            self.default_policy = v;
        }
    }
}

fn read_env<T>(key: &str, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
    std::env::var(key).ok().and_then(|raw| parse(&raw))
}

/// Boolean grammar accepted by env overrides.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_policy(raw: &str) -> Option<ExecutionPolicy> {
    raw.parse().ok()
}
