use std::collections::HashMap;

/// How list requests for a resource are served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMode {
    /// The backend supports query-level filtering and pagination; `page`,
    /// `limit`, `search` and filters are forwarded verbatim and the body is
    /// passed through.
    Backend,
    /// The backend returns an unfiltered collection; search and pagination
    /// are emulated client-side by the list post-processor.
    Emulated,
}

/// Per-resource dispatch policy, fixed at startup.
#[derive(Debug, Clone)]
pub struct ResourcePolicy {
    /// Public resources skip the bearer-token requirement.
    pub public: bool,
    pub default_limit: u64,
    pub list_mode: ListMode,
    /// String fields consulted by emulated search. Fixed per resource at
    /// compile time, not caller-configurable.
    pub search_fields: &'static [&'static str],
}

impl Default for ResourcePolicy {
    fn default() -> Self {
        Self {
            public: false,
            default_limit: 100,
            list_mode: ListMode::Backend,
            search_fields: &[],
        }
    }
}

/// Lookup table of per-resource policies with a default for resources that
/// have no explicit entry.
#[derive(Debug, Clone, Default)]
pub struct ResourceRegistry {
    policies: HashMap<&'static str, ResourcePolicy>,
    default_policy: ResourcePolicy,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose unregistered resources fall back to the given policy.
    pub fn with_default(default_policy: ResourcePolicy) -> Self {
        Self {
            policies: HashMap::new(),
            default_policy,
        }
    }

    pub fn register(mut self, resource: &'static str, policy: ResourcePolicy) -> Self {
        self.policies.insert(resource, policy);
        self
    }

    pub fn policy(&self, resource: &str) -> &ResourcePolicy {
        self.policies.get(resource).unwrap_or(&self.default_policy)
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}
