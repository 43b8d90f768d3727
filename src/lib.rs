//! modweave - module composition and override resolution for application bootstrap
//!
//! An application assembles its behavior from modules. Modules are registered
//! explicitly, declared as overrides of other modules, or auto-discovered
//! (link-time registration via [`auto_module!`] or `module.toml` manifests in
//! a modules directory). Before a dependency-injection container is built,
//! modweave resolves them into one deterministic, ordered list of effective
//! modules:
//!
//! 1. collect contributions from every origin
//! 2. keep one module per identity (first registered wins)
//! 3. build the override graph
//! 4. reject modules overridden more than once
//! 5. sort (override cycles are rejected here)
//! 6. fold each override chain into one effective module
//!
//! Structural problems are returned as [`ModuleError`]; nothing is partially
//! resolved.

pub mod bootstrap;
pub mod config;
pub mod module;
pub mod utils;

pub use bootstrap::{Bootstrap, OverrideBuilder};
pub use config::{BootstrapConfig, LoggingConfig, ModuleConfig};
pub use module::{
    Binder, Composition, CycleError, DiscoveryError, DoubleOverrideError, EffectiveModule,
    Module, ModuleCrate, ModuleDiscovery, ModuleError, ModuleId, ModuleProvider, ModuleResolver,
    RecordingSink, TraceEvent, TraceSink, TracingSink,
};

// used by `auto_module!` expansions in downstream crates
#[doc(hidden)]
pub use inventory;
