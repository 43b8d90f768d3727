//! Module system traits and error types
//!
//! Defines the contract a module unit implements and the errors the resolution
//! pipeline can produce.

use std::path::PathBuf;
use thiserror::Error;

use crate::module::binder::Binder;

/// A unit of configuration contributed to the application container.
///
/// The resolution engine never looks inside a module: it only orders and
/// layers modules. `configure` is invoked by whoever builds the container,
/// once per effective module, bases first.
pub trait Module: Send + Sync {
    /// Contribute bindings to the container.
    fn configure(&self, binder: &mut Binder);

    /// Deprecation marker for the implementation type.
    ///
    /// Used as the default for `ModuleCrate::deprecated` when the builder does
    /// not set it explicitly.
    fn is_deprecated(&self) -> bool {
        false
    }
}

/// A module participating in an ambiguous override, as reported in errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverridingModule {
    /// Module name
    pub name: String,
    /// Provider that contributed the module
    pub provider: String,
}

/// Two or more modules claim to override the same base module.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Module '{target}' provided by '{target_provider}' is overridden more than once by {}",
    describe_overriders(.overriders)
)]
pub struct DoubleOverrideError {
    /// Name of the module targeted by more than one override
    pub target: String,
    /// Provider of the targeted module
    pub target_provider: String,
    /// Every module overriding the target, in discovery order
    pub overriders: Vec<OverridingModule>,
}

fn describe_overriders(overriders: &[OverridingModule]) -> String {
    let described: Vec<String> = overriders
        .iter()
        .map(|o| format!("'{}' (provided by '{}')", o.name, o.provider))
        .collect();

    match described.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{} and {}", rest.join(", "), last),
        Some((last, _)) => last.clone(),
        None => String::new(),
    }
}

/// Override declarations form a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Circular override dependency between DI modules: {}", .path.join(" -> "))]
pub struct CycleError {
    /// Closed cycle path in override direction (first name repeated at the end)
    pub path: Vec<String>,
    /// Every module the sort could not place, in discovery order
    pub unresolved: Vec<String>,
}

/// Auto-discovery collaborator failure
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Failed to read modules directory {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid module manifest {path:?}: {reason}")]
    InvalidManifest { path: PathBuf, reason: String },

    #[error("{0}")]
    Other(String),
}

/// Module resolution errors
///
/// All variants are fatal: bootstrap stops and no container may be built.
#[derive(Debug, Error)]
pub enum ModuleError {
    #[error(transparent)]
    DoubleOverride(#[from] DoubleOverrideError),

    #[error(transparent)]
    Cycle(#[from] CycleError),

    #[error("Module auto-discovery failed: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("Invalid module manifest: {0}")]
    InvalidManifest(String),
}

impl ModuleError {
    /// Process exit status a hosting binary should use for this error
    pub fn exit_code(&self) -> i32 {
        1
    }

    /// Whether the error comes from the shape of the override graph
    pub fn is_structural(&self) -> bool {
        matches!(self, ModuleError::DoubleOverride(_) | ModuleError::Cycle(_))
    }
}
