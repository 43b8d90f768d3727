//! Module registry
//!
//! Raw contributions, identity, collection, discovery and the override
//! graph with its load order.

pub mod collector;
pub mod dedup;
pub mod dependencies;
pub mod descriptor;
pub mod discovery;
pub mod graph;
pub mod identity;
pub mod manifest;
pub mod module_crate;

pub use collector::{collect, Collector, ModuleOrigin};
pub use dedup::dedupe;
pub use dependencies::ModuleDependencies;
pub use descriptor::{ModuleDescriptor, UNKNOWN_PROVIDER};
pub use discovery::{
    discovery_fn, ChainedDiscovery, DirectoryDiscovery, DiscoveredManifest, DiscoveryFn,
    InventoryDiscovery, ModuleDiscovery, ModuleProviderReg,
};
pub use graph::{build_graph, OverrideGraph};
pub use identity::ModuleId;
pub use manifest::{ManifestModule, ModuleManifest};
pub use module_crate::{FnModule, ModuleCrate, ModuleCrateBuilder, ModuleProvider};
