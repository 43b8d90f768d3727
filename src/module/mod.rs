//! Module system
//!
//! Collects module contributions from every origin and resolves them into
//! the ordered list of effective modules a container is built from.
//!
//! ## Pipeline
//!
//! - **Collect**: explicit, override-declared, then auto-discovered crates
//! - **Dedup**: one descriptor per identity, first registered wins
//! - **Graph**: an edge per override whose target is loaded
//! - **Validate**: at most one overrider per module
//! - **Sort**: Kahn's algorithm, reversed so bases come first (cycles fail here)
//! - **Fold**: each override chain collapses into one effective module

pub mod binder;
pub mod compose;
pub mod registry;
pub mod resolver;
pub mod trace;
pub mod traits;
pub mod validation;

pub use binder::Binder;
pub use compose::{Composition, EffectiveModule};
pub use registry::{ModuleCrate, ModuleDiscovery, ModuleId, ModuleProvider};
pub use resolver::ModuleResolver;
pub use trace::{RecordingSink, TraceEvent, TraceSink, TracingSink};
pub use traits::{CycleError, DiscoveryError, DoubleOverrideError, Module, ModuleError};
