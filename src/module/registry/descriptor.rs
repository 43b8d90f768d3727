//! Normalized module descriptors
//!
//! A `ModuleDescriptor` is the resolver's view of one deduplicated module:
//! every optional field of the contributing `ModuleCrate` is resolved to a
//! concrete value.

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};

use crate::module::registry::identity::ModuleId;
use crate::module::registry::module_crate::ModuleCrate;
use crate::module::traits::Module;

/// Provider label used when a crate reaches the resolver without one
pub const UNKNOWN_PROVIDER: &str = "<unknown>";

/// One deduplicated module and its metadata
#[derive(Clone)]
pub struct ModuleDescriptor {
    /// Identity (equality of descriptors is equality of identities)
    pub id: ModuleId,
    /// Human-readable name
    pub name: String,
    /// Origin that contributed this module
    pub provider_name: String,
    /// Optional free text
    pub description: Option<String>,
    /// Deprecation flag
    pub deprecated: bool,
    /// Identities this module claims to replace
    pub overrides: IndexSet<ModuleId>,
    /// Declared configuration paths and their type labels (metadata only)
    pub config_paths: IndexMap<String, String>,
    /// The module unit itself
    pub module: Arc<dyn Module>,
}

impl ModuleDescriptor {
    /// Normalize a raw crate into a descriptor
    pub fn from_crate(module_crate: &ModuleCrate) -> Self {
        Self {
            id: module_crate.id().clone(),
            name: module_crate.module_name(),
            provider_name: module_crate
                .provider_name()
                .unwrap_or(UNKNOWN_PROVIDER)
                .to_string(),
            description: module_crate.description().map(str::to_string),
            deprecated: module_crate.is_deprecated(),
            overrides: module_crate.overrides().clone(),
            config_paths: module_crate.configs().clone(),
            module: Arc::clone(module_crate.module()),
        }
    }
}

impl PartialEq for ModuleDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ModuleDescriptor {}

impl std::fmt::Debug for ModuleDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleDescriptor")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("provider_name", &self.provider_name)
            .field("deprecated", &self.deprecated)
            .field("overrides", &self.overrides)
            .finish_non_exhaustive()
    }
}
