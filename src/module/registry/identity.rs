//! Module identity
//!
//! Two contributions denote the same module iff their `ModuleId`s are equal.
//!
//! - Module types get a stable identity derived from their `TypeId`.
//! - Manifest-declared modules are keyed by their manifest name.
//! - One-off modules (closures, shared trait objects of unknown type) get a
//!   fresh random identity every time they are built. They therefore never
//!   deduplicate against anything, and no override declaration made elsewhere
//!   can target them.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

use uuid::Uuid;

/// Identity of a module contribution
#[derive(Clone, Debug)]
pub enum ModuleId {
    /// Derived from the module implementation type
    Type { id: TypeId, name: &'static str },
    /// Declared by name (manifest modules)
    Named(String),
    /// Fresh per build; never equal to another build's identity
    Synthetic(Uuid),
}

impl ModuleId {
    /// Identity of module type `M`
    pub fn of<M: 'static>() -> Self {
        ModuleId::Type {
            id: TypeId::of::<M>(),
            name: std::any::type_name::<M>(),
        }
    }

    /// Identity of a manifest-declared module
    pub fn named(name: impl Into<String>) -> Self {
        ModuleId::Named(name.into())
    }

    /// A new synthetic identity
    pub fn synthetic() -> Self {
        ModuleId::Synthetic(Uuid::new_v4())
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self, ModuleId::Synthetic(_))
    }

    /// Human-readable default name for this identity.
    ///
    /// For types this is the last path segment with generic arguments
    /// stripped: `app::logging::LoggingModule<T>` becomes `LoggingModule`.
    pub fn default_name(&self) -> String {
        match self {
            ModuleId::Type { name, .. } => simple_type_name(name).to_string(),
            ModuleId::Named(name) => name.clone(),
            ModuleId::Synthetic(uuid) => format!("module-{}", uuid.simple()),
        }
    }
}

fn simple_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

impl PartialEq for ModuleId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ModuleId::Type { id: a, .. }, ModuleId::Type { id: b, .. }) => a == b,
            (ModuleId::Named(a), ModuleId::Named(b)) => a == b,
            (ModuleId::Synthetic(a), ModuleId::Synthetic(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for ModuleId {}

impl Hash for ModuleId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            ModuleId::Type { id, .. } => id.hash(state),
            ModuleId::Named(name) => name.hash(state),
            ModuleId::Synthetic(uuid) => uuid.hash(state),
        }
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleId::Type { name, .. } => write!(f, "{}", name),
            ModuleId::Named(name) => write!(f, "{}", name),
            ModuleId::Synthetic(uuid) => write!(f, "<synthetic {}>", uuid),
        }
    }
}
