//! Route table resolved once at startup.
//!
//! Every resource resolves to a closed route kind: either the standard CRUD
//! path governed by a [`ResourcePolicy`], or a special handler that fully
//! overrides CRUD semantics. Keeping the resolution in one table avoids
//! string-keyed branching scattered through request handling.

use admingate_core::{ListMode, ResourcePolicy, ResourceRegistry};

use super::special::{SpecialHandlerFn, SpecialRegistry};
use crate::config::GatewaySettings;

pub enum RouteKind<'a> {
    Standard(&'a ResourcePolicy),
    Special(&'a SpecialHandlerFn),
}

pub struct RouteTable {
    policies: ResourceRegistry,
    specials: SpecialRegistry,
}

impl RouteTable {
    /// The built-in per-resource policies.
    ///
    /// Emulated resources are the small collections whose backend
    /// controllers return unfiltered arrays; search fields are fixed here,
    /// not caller-configurable. Everything unlisted gets the default policy:
    /// backend-delegated lists, bearer required.
    pub fn builtin(settings: &GatewaySettings) -> Self {
        let default_policy = ResourcePolicy {
            public: false,
            default_limit: settings.default_limit,
            list_mode: ListMode::Backend,
            search_fields: &[],
        };

        let policies = ResourceRegistry::with_default(default_policy.clone())
            .register(
                "users",
                ResourcePolicy {
                    list_mode: ListMode::Emulated,
                    search_fields: &["name", "email", "status"],
                    ..default_policy.clone()
                },
            )
            .register(
                "roles",
                ResourcePolicy {
                    list_mode: ListMode::Emulated,
                    search_fields: &["name", "namespace"],
                    ..default_policy.clone()
                },
            )
            .register(
                "countries",
                ResourcePolicy {
                    public: true,
                    list_mode: ListMode::Emulated,
                    search_fields: &["name", "code"],
                    ..default_policy.clone()
                },
            )
            .register(
                "iso-companies",
                ResourcePolicy {
                    default_limit: 25,
                    ..default_policy
                },
            );

        Self {
            policies,
            specials: SpecialRegistry::builtin(),
        }
    }

    /// Resolve a resource name. Specials win unconditionally.
    pub fn kind(&self, resource: &str) -> RouteKind<'_> {
        match self.specials.get(resource) {
            Some(handler) => RouteKind::Special(handler),
            None => RouteKind::Standard(self.policies.policy(resource)),
        }
    }
}
