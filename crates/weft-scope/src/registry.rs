//! Process-wide registry of named scopes.
//!
//! Scopes are create-or-fetch by name and live for the process lifetime;
//! there is no teardown. Instrumentation setup resolves each scope once and
//! hands the `Arc` to every hook wrapper sharing that semantic boundary.

use std::sync::{Arc, LazyLock};

use dashmap::DashMap;
use tracing::debug;

use crate::ids::ScopeName;
use crate::scope::Scope;

static GLOBAL: LazyLock<ScopeRegistry> = LazyLock::new(ScopeRegistry::new);

/// Registry mapping scope names to shared [`Scope`] instances.
#[derive(Default)]
pub struct ScopeRegistry {
    scopes: DashMap<ScopeName, Arc<Scope>>,
}

impl ScopeRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            scopes: DashMap::new(),
        }
    }

    /// The process-wide registry.
    #[must_use]
    pub fn global() -> &'static ScopeRegistry {
        &GLOBAL
    }

    /// Fetch the scope with the given name, creating it on first use.
    ///
    /// All callers asking for the same name share one instance.
    #[must_use]
    pub fn get_or_create(&self, name: &ScopeName) -> Arc<Scope> {
        self.scopes
            .entry(name.clone())
            .or_insert_with(|| {
                debug!(scope = %name, "Creating scope");
                Arc::new(Scope::new(name.clone()))
            })
            .clone()
    }

    /// Fetch an existing scope by name.
    #[must_use]
    pub fn get(&self, name: &ScopeName) -> Option<Arc<Scope>> {
        self.scopes.get(name).map(|entry| Arc::clone(&entry))
    }

    /// Number of registered scopes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Whether the registry holds no scopes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

impl std::fmt::Debug for ScopeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopeRegistry")
            .field("scope_count", &self.scopes.len())
            .finish()
    }
}
