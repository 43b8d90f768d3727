//! Raw module contributions
//!
//! A `ModuleCrate` packages one module unit with the metadata the resolver
//! needs: identity, display name, provider, description, deprecation flag,
//! override declarations and declared configuration paths. Crates are built
//! once per bootstrap and are never mutated afterwards.

use std::fmt;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};

use crate::module::binder::Binder;
use crate::module::registry::identity::ModuleId;
use crate::module::traits::Module;

/// A module unit plus its metadata, as contributed by one origin
#[derive(Clone)]
pub struct ModuleCrate {
    module: Arc<dyn Module>,
    id: ModuleId,
    name: Option<String>,
    provider_name: Option<String>,
    description: Option<String>,
    deprecated: bool,
    overrides: IndexSet<ModuleId>,
    configs: IndexMap<String, String>,
}

impl ModuleCrate {
    /// Start building a crate for a module type.
    ///
    /// The identity is derived from `M`, so two crates of the same type are
    /// the same module.
    pub fn of<M: Module + 'static>(module: M) -> ModuleCrateBuilder {
        let deprecated = module.is_deprecated();
        ModuleCrateBuilder::new(Arc::new(module), ModuleId::of::<M>(), deprecated)
    }

    /// Start building a crate for a one-off module built from a closure.
    pub fn from_fn<F>(name: impl Into<String>, configure: F) -> ModuleCrateBuilder
    where
        F: Fn(&mut Binder) + Send + Sync + 'static,
    {
        ModuleCrateBuilder::new(Arc::new(FnModule(configure)), ModuleId::synthetic(), false)
            .name(name)
    }

    /// Start building a crate for an already shared module of unknown type.
    ///
    /// No stable type is available to key on, so the identity is synthetic.
    pub fn from_shared(name: impl Into<String>, module: Arc<dyn Module>) -> ModuleCrateBuilder {
        let deprecated = module.is_deprecated();
        ModuleCrateBuilder::new(module, ModuleId::synthetic(), deprecated).name(name)
    }

    /// Start building a crate with an explicit identity.
    pub fn with_id(id: ModuleId, module: Arc<dyn Module>) -> ModuleCrateBuilder {
        let deprecated = module.is_deprecated();
        ModuleCrateBuilder::new(module, id, deprecated)
    }

    /// Clone this crate into a builder so some properties can be changed
    pub fn to_builder(&self) -> ModuleCrateBuilder {
        ModuleCrateBuilder {
            module: Arc::clone(&self.module),
            id: self.id.clone(),
            name: self.name.clone(),
            provider_name: self.provider_name.clone(),
            description: self.description.clone(),
            deprecated: Some(self.deprecated),
            overrides: self.overrides.clone(),
            configs: self.configs.clone(),
        }
    }

    /// Set the provider name unless one was already given
    pub fn or_provider_name(mut self, name: &str) -> Self {
        if self.provider_name.is_none() {
            self.provider_name = Some(name.to_string());
        }
        self
    }

    pub fn module(&self) -> &Arc<dyn Module> {
        &self.module
    }

    pub fn id(&self) -> &ModuleId {
        &self.id
    }

    /// Explicit display name, if one was given
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Display name, falling back to the identity's default name
    pub fn module_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.id.default_name())
    }

    pub fn provider_name(&self) -> Option<&str> {
        self.provider_name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecated
    }

    pub fn overrides(&self) -> &IndexSet<ModuleId> {
        &self.overrides
    }

    pub fn configs(&self) -> &IndexMap<String, String> {
        &self.configs
    }
}

impl fmt::Debug for ModuleCrate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleCrate")
            .field("id", &self.id)
            .field("name", &self.module_name())
            .field("provider_name", &self.provider_name)
            .field("deprecated", &self.deprecated)
            .field("overrides", &self.overrides)
            .finish_non_exhaustive()
    }
}

/// Builder for `ModuleCrate`
pub struct ModuleCrateBuilder {
    module: Arc<dyn Module>,
    id: ModuleId,
    name: Option<String>,
    provider_name: Option<String>,
    description: Option<String>,
    deprecated: Option<bool>,
    overrides: IndexSet<ModuleId>,
    configs: IndexMap<String, String>,
}

impl ModuleCrateBuilder {
    fn new(module: Arc<dyn Module>, id: ModuleId, type_deprecated: bool) -> Self {
        Self {
            module,
            id,
            name: None,
            provider_name: None,
            description: None,
            deprecated: type_deprecated.then_some(true),
            overrides: IndexSet::new(),
            configs: IndexMap::new(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.provider_name = Some(name.into());
        self
    }

    pub fn deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = Some(deprecated);
        self
    }

    /// Declare that this module overrides module type `M`
    pub fn overrides<M: Module + 'static>(mut self) -> Self {
        self.overrides.insert(ModuleId::of::<M>());
        self
    }

    /// Declare that this module overrides the module with identity `id`
    pub fn overrides_id(mut self, id: ModuleId) -> Self {
        self.overrides.insert(id);
        self
    }

    pub fn overrides_all(mut self, ids: impl IntoIterator<Item = ModuleId>) -> Self {
        self.overrides.extend(ids);
        self
    }

    /// Declare a configuration path read by this module, typed as `T`
    pub fn config<T: ?Sized>(self, path: impl Into<String>) -> Self {
        self.config_type(path, std::any::type_name::<T>())
    }

    /// Declare a configuration path with an explicit type label
    pub fn config_type(mut self, path: impl Into<String>, type_label: impl Into<String>) -> Self {
        self.configs.insert(path.into(), type_label.into());
        self
    }

    pub fn build(self) -> ModuleCrate {
        ModuleCrate {
            module: self.module,
            id: self.id,
            name: self.name,
            provider_name: self.provider_name,
            description: self.description,
            deprecated: self.deprecated.unwrap_or(false),
            overrides: self.overrides,
            configs: self.configs,
        }
    }
}

/// A module whose `configure` is a closure
pub struct FnModule<F>(pub F);

impl<F> Module for FnModule<F>
where
    F: Fn(&mut Binder) + Send + Sync,
{
    fn configure(&self, binder: &mut Binder) {
        (self.0)(binder)
    }
}

/// A provider of a module and, optionally, of the modules it depends on.
///
/// Lets an application pull in a module together with its dependencies
/// without relying on auto-loading.
pub trait ModuleProvider: Send + Sync {
    /// Build the crate for this provider's module
    fn build_module(&self) -> ModuleCrate;

    /// Providers of modules this provider's module depends on
    fn dependencies(&self) -> Vec<Box<dyn ModuleProvider>> {
        Vec::new()
    }

    /// Stable key for this provider, used to stop dependency expansion
    /// from visiting it twice. Defaults to the provider's type name.
    fn provider_key(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CoreModule;
    impl Module for CoreModule {
        fn configure(&self, binder: &mut Binder) {
            binder.bind("core", true);
        }
    }

    struct LegacyModule;
    impl Module for LegacyModule {
        fn configure(&self, _binder: &mut Binder) {}
        fn is_deprecated(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_defaults_from_type() {
        let c = ModuleCrate::of(CoreModule).build();
        assert_eq!(c.module_name(), "CoreModule");
        assert!(c.provider_name().is_none());
        assert!(!c.is_deprecated());
        assert!(c.overrides().is_empty());
        assert_eq!(c.id(), &ModuleId::of::<CoreModule>());
    }

    #[test]
    fn test_deprecated_marker_and_explicit_flag() {
        assert!(ModuleCrate::of(LegacyModule).build().is_deprecated());
        assert!(!ModuleCrate::of(LegacyModule).deprecated(false).build().is_deprecated());
        assert!(ModuleCrate::of(CoreModule).deprecated(true).build().is_deprecated());
    }

    #[test]
    fn test_builder_metadata() {
        let c = ModuleCrate::of(CoreModule)
            .name("core")
            .description("core services")
            .provider_name("app")
            .overrides::<LegacyModule>()
            .config::<String>("core.name")
            .build();

        assert_eq!(c.name(), Some("core"));
        assert_eq!(c.description(), Some("core services"));
        assert_eq!(c.provider_name(), Some("app"));
        assert!(c.overrides().contains(&ModuleId::of::<LegacyModule>()));
        assert_eq!(
            c.configs().get("core.name").map(String::as_str),
            Some(std::any::type_name::<String>())
        );
    }

    #[test]
    fn test_closure_modules_are_never_the_same_module() {
        let a = ModuleCrate::from_fn("props", |b| {
            b.bind("x", 1);
        })
        .build();
        let b = ModuleCrate::from_fn("props", |b| {
            b.bind("x", 1);
        })
        .build();

        assert_ne!(a.id(), b.id());
        assert_eq!(a.module_name(), "props");

        let mut binder = Binder::new();
        a.module().configure(&mut binder);
        assert_eq!(binder.get("x"), Some(&serde_json::json!(1)));
    }

    #[test]
    fn test_to_builder_keeps_identity() {
        let c = ModuleCrate::of(CoreModule).build();
        let renamed = c.to_builder().name("renamed").build();
        assert_eq!(c.id(), renamed.id());
        assert_eq!(renamed.module_name(), "renamed");
    }
}
