//! Manifest validation
//!
//! Validates module manifests for structure before they are turned into
//! module crates.

use tracing::{debug, warn};

use crate::module::registry::manifest::ModuleManifest;

/// Validation result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Manifest is valid
    Valid,
    /// Manifest is invalid with specific errors
    Invalid(Vec<String>),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}

/// Manifest validator
pub struct ManifestValidator {
    /// Maximum module name length
    max_name_len: usize,
}

impl ManifestValidator {
    /// Create a new manifest validator
    pub fn new() -> Self {
        Self { max_name_len: 64 }
    }

    /// Validate a module manifest
    pub fn validate(&self, manifest: &ModuleManifest) -> ValidationResult {
        let mut errors = Vec::new();

        if manifest.name.is_empty() {
            errors.push("Module name cannot be empty".to_string());
        } else if !self.is_valid_name(&manifest.name) {
            errors.push(format!(
                "Invalid module name: {} (must be alphanumeric with dashes/underscores)",
                manifest.name
            ));
        }

        if let Err(override_errors) = self.validate_overrides(manifest) {
            errors.extend(override_errors);
        }

        if let Err(config_errors) = self.validate_configs(manifest) {
            errors.extend(config_errors);
        }

        for key in manifest.bindings.keys() {
            if key.trim().is_empty() {
                errors.push("Binding key cannot be empty".to_string());
            }
        }

        if errors.is_empty() {
            debug!("Manifest validation passed for module: {}", manifest.name);
            ValidationResult::Valid
        } else {
            warn!(
                "Manifest validation failed for module {}: {:?}",
                manifest.name, errors
            );
            ValidationResult::Invalid(errors)
        }
    }

    /// Validate module name format
    #[inline]
    fn is_valid_name(&self, name: &str) -> bool {
        if name.is_empty() || name.len() > self.max_name_len {
            return false;
        }

        // Must start with alphanumeric
        if !name.chars().next().map_or(false, |c| c.is_alphanumeric()) {
            return false;
        }

        name.chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    }

    /// Validate override targets
    fn validate_overrides(&self, manifest: &ModuleManifest) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        for target in &manifest.overrides {
            if !self.is_valid_name(target) {
                errors.push(format!("Invalid override target name: {}", target));
            } else if *target == manifest.name {
                errors.push(format!("Module {} cannot override itself", target));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate declared configuration paths (dot-separated, non-empty segments)
    fn validate_configs(&self, manifest: &ModuleManifest) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        for (path, type_label) in &manifest.configs {
            if path.is_empty() || path.split('.').any(|segment| segment.trim().is_empty()) {
                errors.push(format!("Invalid config path: '{}'", path));
            }
            if type_label.trim().is_empty() {
                errors.push(format!("Config path '{}' has no declared type", path));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl Default for ManifestValidator {
    fn default() -> Self {
        Self::new()
    }
}
