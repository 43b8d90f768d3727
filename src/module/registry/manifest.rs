//! Module manifest parsing
//!
//! Handles parsing `module.toml` manifests into declarative modules. A
//! manifest module is keyed by its `name`, binds the values of its
//! `[bindings]` table when configured, and may override other manifest
//! modules by name.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::module::binder::Binder;
use crate::module::registry::identity::ModuleId;
use crate::module::registry::module_crate::ModuleCrate;
use crate::module::traits::{Module, ModuleError};
use std::sync::Arc;

/// Module manifest (module.toml structure)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModuleManifest {
    /// Module name (unique identifier)
    pub name: String,
    /// Human-readable description
    pub description: Option<String>,
    /// Whether the module is deprecated
    #[serde(default)]
    pub deprecated: bool,
    /// Names of manifest modules this module overrides
    #[serde(default)]
    pub overrides: Vec<String>,
    /// Configuration paths read by the module (path -> type label)
    #[serde(default)]
    pub configs: IndexMap<String, String>,
    /// Bindings contributed when the module is configured
    #[serde(default)]
    pub bindings: IndexMap<String, toml::Value>,
}

impl ModuleManifest {
    /// Load manifest from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ModuleError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ModuleError::InvalidManifest(format!("Failed to read manifest file: {}", e))
        })?;

        Self::parse(&contents)
    }

    /// Parse manifest from TOML text
    pub fn parse(contents: &str) -> Result<Self, ModuleError> {
        let manifest: ModuleManifest = toml::from_str(contents).map_err(|e| {
            ModuleError::InvalidManifest(format!("Failed to parse manifest TOML: {}", e))
        })?;

        if manifest.name.is_empty() {
            return Err(ModuleError::InvalidManifest(
                "Module name cannot be empty".to_string(),
            ));
        }

        Ok(manifest)
    }

    /// Convert to a module crate carrying a `ManifestModule`
    pub fn to_crate(&self) -> Result<ModuleCrate, ModuleError> {
        let mut bindings = IndexMap::with_capacity(self.bindings.len());
        for (key, value) in &self.bindings {
            let value = serde_json::to_value(value).map_err(|e| {
                ModuleError::InvalidManifest(format!(
                    "Binding '{}' of module {} is not representable: {}",
                    key, self.name, e
                ))
            })?;
            bindings.insert(key.clone(), value);
        }

        let mut builder = ModuleCrate::with_id(
            ModuleId::named(&self.name),
            Arc::new(ManifestModule { bindings }),
        )
        .name(&self.name)
        .deprecated(self.deprecated)
        .overrides_all(self.overrides.iter().map(ModuleId::named));

        if let Some(description) = &self.description {
            builder = builder.description(description);
        }
        for (path, type_label) in &self.configs {
            builder = builder.config_type(path, type_label);
        }

        Ok(builder.build())
    }
}

/// Declarative module built from a manifest
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestModule {
    bindings: IndexMap<String, Value>,
}

impl Module for ManifestModule {
    fn configure(&self, binder: &mut Binder) {
        for (key, value) in &self.bindings {
            binder.bind(key.clone(), value.clone());
        }
    }
}
