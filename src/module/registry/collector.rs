//! Module collection
//!
//! Gathers raw contributions from the three origins (explicit registration,
//! override declarations, auto-discovery) into one flat list. Encounter order
//! is explicit, then override-declared, then auto-discovered; it only matters
//! for deduplication tie-breaks and trace output.

use std::fmt;

use indexmap::IndexSet;
use tracing::debug;

use crate::module::registry::discovery::ModuleDiscovery;
use crate::module::registry::identity::ModuleId;
use crate::module::registry::module_crate::{ModuleCrate, ModuleProvider};
use crate::module::traits::ModuleError;

/// Where a contribution came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleOrigin {
    /// Registered directly by the application
    Explicit,
    /// Registered through the override builder
    Override,
    /// Found by auto-discovery
    AutoLoad,
}

impl ModuleOrigin {
    /// Provider label stamped on crates that carry no provider name
    pub fn label(&self) -> &'static str {
        match self {
            ModuleOrigin::Explicit => "explicit",
            ModuleOrigin::Override => "override",
            ModuleOrigin::AutoLoad => "auto-load",
        }
    }
}

impl fmt::Display for ModuleOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Concatenate contributions in origin order, labelling each with its origin
/// unless it already names a provider.
pub fn collect(
    explicit: Vec<ModuleCrate>,
    override_declared: Vec<ModuleCrate>,
    auto_discovered: Vec<ModuleCrate>,
) -> Vec<ModuleCrate> {
    let mut collected =
        Vec::with_capacity(explicit.len() + override_declared.len() + auto_discovered.len());

    for (origin, crates) in [
        (ModuleOrigin::Explicit, explicit),
        (ModuleOrigin::Override, override_declared),
        (ModuleOrigin::AutoLoad, auto_discovered),
    ] {
        collected.extend(crates.into_iter().map(|c| c.or_provider_name(origin.label())));
    }

    collected
}

/// Identity used to skip providers that were already expanded.
///
/// Synthetic module ids are fresh on every build, so providers of closure
/// modules are keyed by the provider itself instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ProviderKey {
    Module(ModuleId),
    Provider(&'static str),
}

impl ProviderKey {
    fn of(provider: &dyn ModuleProvider, module_crate: &ModuleCrate) -> Self {
        if module_crate.id().is_synthetic() {
            ProviderKey::Provider(provider.provider_key())
        } else {
            ProviderKey::Module(module_crate.id().clone())
        }
    }
}

/// Accumulates contributions for one bootstrap
#[derive(Default)]
pub struct Collector {
    explicit: Vec<ModuleCrate>,
    override_declared: Vec<ModuleCrate>,
    discovery: Option<Box<dyn ModuleDiscovery>>,
    expanded_providers: IndexSet<ProviderKey>,
}

impl Collector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an explicit contribution
    pub fn add_explicit(&mut self, module_crate: ModuleCrate) {
        self.explicit.push(module_crate);
    }

    /// Register a contribution declared through the override builder
    pub fn add_override(&mut self, module_crate: ModuleCrate) {
        self.override_declared.push(module_crate);
    }

    /// Register a provider's module followed by its dependencies, depth first.
    ///
    /// A provider already expanded by this collector is not expanded again,
    /// so dependency loops terminate. Typed and named modules are matched by
    /// module id, closure modules by `ModuleProvider::provider_key`.
    pub fn add_provider(&mut self, provider: &dyn ModuleProvider) {
        let module_crate = provider.build_module();
        let key = ProviderKey::of(provider, &module_crate);
        if !self.expanded_providers.insert(key) {
            debug!(
                "Provider dependency '{}' already expanded, skipping",
                module_crate.module_name()
            );
            return;
        }

        self.explicit.push(module_crate);
        for dependency in provider.dependencies() {
            self.add_provider(dependency.as_ref());
        }
    }

    /// Set the auto-discovery collaborator
    pub fn set_discovery(&mut self, discovery: Box<dyn ModuleDiscovery>) {
        self.discovery = Some(discovery);
    }

    /// Run auto-discovery (once) and return every contribution in origin order
    pub fn collect(self) -> Result<Vec<ModuleCrate>, ModuleError> {
        let auto_discovered = match &self.discovery {
            Some(discovery) => {
                let found = discovery.discover()?;
                debug!("Auto-discovery found {} modules", found.len());
                found
            }
            None => Vec::new(),
        };

        Ok(collect(self.explicit, self.override_declared, auto_discovered))
    }
}
