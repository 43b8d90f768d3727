//! Application bootstrap
//!
//! `Bootstrap` is the entry point an application uses to declare its modules
//! and obtain the resolved, ordered module list (or the bindings it
//! produces). It holds no global state: every `resolve` call collects,
//! deduplicates, validates, sorts and folds from scratch.
//!
//! ```rust
//! use modweave::{Binder, Bootstrap, Module};
//!
//! #[derive(Default)]
//! struct Logging;
//! impl Module for Logging {
//!     fn configure(&self, binder: &mut Binder) {
//!         binder.bind("log.level", "info");
//!     }
//! }
//!
//! struct VerboseLogging;
//! impl Module for VerboseLogging {
//!     fn configure(&self, binder: &mut Binder) {
//!         binder.bind("log.level", "debug");
//!     }
//! }
//!
//! let bindings = Bootstrap::new()
//!     .module(Logging)
//!     .override_::<Logging>()
//!     .with(VerboseLogging)
//!     .build_bindings()
//!     .unwrap();
//! assert_eq!(bindings.get_str("log.level"), Some("debug"));
//! ```

use std::marker::PhantomData;
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::BootstrapConfig;
use crate::module::binder::Binder;
use crate::module::compose::EffectiveModule;
use crate::module::registry::collector::Collector;
use crate::module::registry::discovery::{
    ChainedDiscovery, DirectoryDiscovery, InventoryDiscovery, ModuleDiscovery,
};
use crate::module::registry::identity::ModuleId;
use crate::module::registry::module_crate::{ModuleCrate, ModuleProvider};
use crate::module::resolver::ModuleResolver;
use crate::module::trace::{TraceEvent, TraceSink, TracingSink};
use crate::module::traits::{Module, ModuleError};

/// Builder collecting module contributions for one application
pub struct Bootstrap {
    collector: Collector,
    discoveries: ChainedDiscovery,
    sink: Option<Arc<dyn TraceSink>>,
    report_deprecated: bool,
}

impl Default for Bootstrap {
    fn default() -> Self {
        Self::new()
    }
}

impl Bootstrap {
    /// Create an empty bootstrap reporting decisions through `tracing`
    pub fn new() -> Self {
        Self {
            collector: Collector::new(),
            discoveries: ChainedDiscovery::new(),
            sink: Some(Arc::new(TracingSink)),
            report_deprecated: true,
        }
    }

    /// Create a bootstrap from configuration.
    ///
    /// With `auto_load` on, both link-time registered modules and manifest
    /// modules under `modules_dir` are discovered.
    pub fn from_config(config: &BootstrapConfig) -> Self {
        let mut bootstrap = Self::new();
        bootstrap.report_deprecated = config.modules.report_deprecated;

        if config.modules.auto_load {
            bootstrap = bootstrap
                .auto_load_modules()
                .discovery(DirectoryDiscovery::new(&config.modules.modules_dir));
        }
        bootstrap
    }

    /// Register a module explicitly
    pub fn module<M: Module + 'static>(self, module: M) -> Self {
        self.crate_(ModuleCrate::of(module).build())
    }

    /// Register a prepared module crate explicitly
    pub fn crate_(mut self, module_crate: ModuleCrate) -> Self {
        self.collector.add_explicit(module_crate);
        self
    }

    /// Register a provider's module and everything it depends on
    pub fn provider(mut self, provider: impl ModuleProvider) -> Self {
        self.collector.add_provider(&provider);
        self
    }

    /// Start declaring a module that overrides module type `T`
    pub fn override_<T: Module + 'static>(self) -> OverrideBuilder<T> {
        OverrideBuilder {
            bootstrap: self,
            target: PhantomData,
        }
    }

    /// Discover modules registered with `auto_module!`
    pub fn auto_load_modules(self) -> Self {
        self.discovery(InventoryDiscovery)
    }

    /// Add an auto-discovery source. Sources run in the order added.
    pub fn discovery(mut self, discovery: impl ModuleDiscovery + 'static) -> Self {
        self.discoveries.push(Box::new(discovery));
        self
    }

    /// Report resolution decisions to `sink` instead of `tracing`
    pub fn trace_sink(mut self, sink: Arc<dyn TraceSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Drop all resolution diagnostics
    pub fn silent(mut self) -> Self {
        self.sink = None;
        self
    }

    /// Collect and resolve every module into the ordered effective list
    pub fn resolve(self) -> Result<Vec<EffectiveModule>, ModuleError> {
        let Bootstrap {
            mut collector,
            discoveries,
            sink,
            report_deprecated,
        } = self;

        if !discoveries.is_empty() {
            collector.set_discovery(Box::new(discoveries));
        }
        let collected = collector.collect()?;
        debug!("Collected {} module contributions", collected.len());

        let filtered = sink.as_deref().map(|inner| FilteredSink {
            inner,
            report_deprecated,
        });
        let resolver = ModuleResolver::new(filtered.as_ref().map(|s| s as &dyn TraceSink));
        resolver.resolve(collected)
    }

    /// Resolve and configure every effective module, in order, into one binder
    pub fn build_bindings(self) -> Result<Binder, ModuleError> {
        let effective = self.resolve()?;

        let mut binder = Binder::new();
        for module in &effective {
            module.configure(&mut binder);
        }
        info!(
            "Configured {} effective modules into {} bindings",
            effective.len(),
            binder.len()
        );
        Ok(binder)
    }
}

/// Declares the module that overrides `T`
pub struct OverrideBuilder<T> {
    bootstrap: Bootstrap,
    target: PhantomData<fn() -> T>,
}

impl<T: Module + 'static> OverrideBuilder<T> {
    /// Override `T` with `module`
    pub fn with<M: Module + 'static>(self, module: M) -> Bootstrap {
        self.with_crate(ModuleCrate::of(module).build())
    }

    /// Override `T` with a prepared crate
    pub fn with_crate(self, module_crate: ModuleCrate) -> Bootstrap {
        let mut bootstrap = self.bootstrap;
        bootstrap.collector.add_override(
            module_crate
                .to_builder()
                .overrides_id(ModuleId::of::<T>())
                .build(),
        );
        bootstrap
    }
}

struct FilteredSink<'a> {
    inner: &'a dyn TraceSink,
    report_deprecated: bool,
}

impl TraceSink for FilteredSink<'_> {
    fn event(&self, event: &TraceEvent) {
        if !self.report_deprecated && matches!(event, TraceEvent::Deprecated { .. }) {
            return;
        }
        self.inner.event(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::trace::RecordingSink;

    #[derive(Default)]
    struct Core;
    impl Module for Core {
        fn configure(&self, binder: &mut Binder) {
            binder.bind("core", true);
        }
    }

    struct Legacy;
    impl Module for Legacy {
        fn configure(&self, _binder: &mut Binder) {}
        fn is_deprecated(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_override_builder_labels_origin() {
        let effective = Bootstrap::new()
            .silent()
            .module(Core)
            .override_::<Core>()
            .with_crate(ModuleCrate::from_fn("core-test", |b| {
                b.bind("core", false);
            }).build())
            .resolve()
            .unwrap();

        assert_eq!(effective.len(), 1);
        assert_eq!(effective[0].name, "core-test");
        assert_eq!(effective[0].provider_name, "override");
        assert_eq!(effective[0].layers(), vec!["Core", "core-test"]);
    }

    #[test]
    fn test_deprecation_alerts_can_be_disabled() {
        let sink = RecordingSink::new();
        let mut config = BootstrapConfig::default();
        config.modules.auto_load = false;
        config.modules.report_deprecated = false;

        Bootstrap::from_config(&config)
            .trace_sink(sink.clone())
            .module(Legacy)
            .resolve()
            .unwrap();

        assert_eq!(sink.count(|e| matches!(e, TraceEvent::Deprecated { .. })), 0);
        assert_eq!(sink.count(|e| matches!(e, TraceEvent::Accepted { .. })), 1);
    }
}
