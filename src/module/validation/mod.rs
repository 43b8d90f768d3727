//! Module validation
//!
//! Structural checks on the override graph and shape checks on manifests
//! found by directory discovery.

pub mod manifest_validator;
pub mod override_validator;

pub use manifest_validator::{ManifestValidator, ValidationResult};
pub use override_validator::validate_single_override;
