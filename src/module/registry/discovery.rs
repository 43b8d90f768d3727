//! Module auto-discovery
//!
//! Locates modules the application did not register explicitly. Discovery
//! runs once per bootstrap; any failure is fatal and is reported as a
//! `DiscoveryError`.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::module::registry::manifest::ModuleManifest;
use crate::module::registry::module_crate::ModuleCrate;
use crate::module::traits::{DiscoveryError, ModuleError};
use crate::module::validation::{ManifestValidator, ValidationResult};

/// Manifest file looked up in each module directory
pub const MANIFEST_FILE: &str = "module.toml";

/// Auto-discovery collaborator
pub trait ModuleDiscovery: Send + Sync {
    /// Return every module this source can find, in no particular order
    fn discover(&self) -> Result<Vec<ModuleCrate>, DiscoveryError>;
}

/// Discovery backed by a closure
pub struct DiscoveryFn<F>(F);

/// Wrap a closure as a `ModuleDiscovery`
pub fn discovery_fn<F>(f: F) -> DiscoveryFn<F>
where
    F: Fn() -> Result<Vec<ModuleCrate>, DiscoveryError> + Send + Sync,
{
    DiscoveryFn(f)
}

impl<F> ModuleDiscovery for DiscoveryFn<F>
where
    F: Fn() -> Result<Vec<ModuleCrate>, DiscoveryError> + Send + Sync,
{
    fn discover(&self) -> Result<Vec<ModuleCrate>, DiscoveryError> {
        (self.0)()
    }
}

/// Link-time registration of an auto-loadable module.
///
/// Submitted with the [`auto_module!`](crate::auto_module) macro.
pub struct ModuleProviderReg {
    /// Provider label reported for the module
    pub provider: &'static str,
    /// Builds the module crate
    pub build: fn() -> ModuleCrate,
}

impl ModuleProviderReg {
    pub const fn new(provider: &'static str, build: fn() -> ModuleCrate) -> Self {
        Self { provider, build }
    }
}

inventory::collect!(ModuleProviderReg);

/// Discovers modules registered with `auto_module!` anywhere in the binary
#[derive(Debug, Clone, Copy, Default)]
pub struct InventoryDiscovery;

impl ModuleDiscovery for InventoryDiscovery {
    fn discover(&self) -> Result<Vec<ModuleCrate>, DiscoveryError> {
        let mut registrations: Vec<&ModuleProviderReg> =
            inventory::iter::<ModuleProviderReg>.into_iter().collect();
        // link order is not meaningful; sort for stable output
        registrations.sort_by_key(|reg| reg.provider);

        let modules: Vec<ModuleCrate> = registrations
            .into_iter()
            .map(|reg| (reg.build)().or_provider_name(reg.provider))
            .collect();

        debug!("Found {} registered auto-load modules", modules.len());
        Ok(modules)
    }
}

/// A validated manifest and the file it was read from
#[derive(Debug, Clone)]
pub struct DiscoveredManifest {
    pub path: PathBuf,
    pub manifest: ModuleManifest,
}

/// Scans a modules directory for `*/module.toml` manifests
#[derive(Debug, Clone)]
pub struct DirectoryDiscovery {
    /// Base directory to scan for modules
    modules_dir: PathBuf,
}

impl DirectoryDiscovery {
    /// Create a new directory scanner
    pub fn new<P: AsRef<Path>>(modules_dir: P) -> Self {
        Self {
            modules_dir: modules_dir.as_ref().to_path_buf(),
        }
    }

    pub fn modules_dir(&self) -> &Path {
        &self.modules_dir
    }

    /// Find, parse and validate every manifest under the modules directory
    pub fn discover_manifests(&self) -> Result<Vec<DiscoveredManifest>, DiscoveryError> {
        info!("Discovering modules in {:?}", self.modules_dir);

        if !self.modules_dir.exists() {
            debug!("Modules directory does not exist: {:?}", self.modules_dir);
            return Ok(Vec::new());
        }

        let io_error = |source| DiscoveryError::Io {
            path: self.modules_dir.clone(),
            source,
        };

        let mut module_dirs = Vec::new();
        for entry in fs::read_dir(&self.modules_dir).map_err(io_error)? {
            let path = entry.map_err(io_error)?.path();
            if path.is_dir() {
                module_dirs.push(path);
            }
        }
        // directory iteration order is platform dependent
        module_dirs.sort();

        let validator = ManifestValidator::new();
        let mut manifests = Vec::new();

        for dir in module_dirs {
            let manifest_path = dir.join(MANIFEST_FILE);
            if !manifest_path.exists() {
                debug!("No {} found in {:?}, skipping", MANIFEST_FILE, dir);
                continue;
            }

            let manifest = ModuleManifest::from_file(&manifest_path).map_err(|e| {
                DiscoveryError::InvalidManifest {
                    path: manifest_path.clone(),
                    reason: manifest_reason(e),
                }
            })?;

            if let ValidationResult::Invalid(errors) = validator.validate(&manifest) {
                return Err(DiscoveryError::InvalidManifest {
                    path: manifest_path,
                    reason: errors.join("; "),
                });
            }

            manifests.push(DiscoveredManifest {
                path: manifest_path,
                manifest,
            });
        }

        info!("Discovered {} modules", manifests.len());
        Ok(manifests)
    }
}

impl ModuleDiscovery for DirectoryDiscovery {
    fn discover(&self) -> Result<Vec<ModuleCrate>, DiscoveryError> {
        let provider = format!("manifest:{}", self.modules_dir.display());

        self.discover_manifests()?
            .into_iter()
            .map(|found| {
                found
                    .manifest
                    .to_crate()
                    .map(|c| c.or_provider_name(&provider))
                    .map_err(|e| DiscoveryError::InvalidManifest {
                        path: found.path,
                        reason: manifest_reason(e),
                    })
            })
            .collect()
    }
}

fn manifest_reason(error: ModuleError) -> String {
    match error {
        ModuleError::InvalidManifest(reason) => reason,
        other => other.to_string(),
    }
}

/// Runs several discovery sources in order and concatenates their output
#[derive(Default)]
pub struct ChainedDiscovery {
    sources: Vec<Box<dyn ModuleDiscovery>>,
}

impl ChainedDiscovery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, source: impl ModuleDiscovery + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn push(&mut self, source: Box<dyn ModuleDiscovery>) {
        self.sources.push(source);
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl ModuleDiscovery for ChainedDiscovery {
    fn discover(&self) -> Result<Vec<ModuleCrate>, DiscoveryError> {
        let mut modules = Vec::new();
        for source in &self.sources {
            modules.extend(source.discover()?);
        }
        Ok(modules)
    }
}

/// Register a module type for auto-loading.
///
/// `auto_module!(MyModule)` registers `MyModule::default()`. A custom builder
/// can be given as `auto_module!("provider-label", build_fn)` where
/// `build_fn: fn() -> ModuleCrate`.
#[macro_export]
macro_rules! auto_module {
    ($module:ty) => {
        $crate::inventory::submit! {
            $crate::module::registry::ModuleProviderReg::new(
                concat!(module_path!(), "::", stringify!($module)),
                || {
                    $crate::module::registry::ModuleCrate::of(
                        <$module as ::core::default::Default>::default(),
                    )
                    .build()
                },
            )
        }
    };
    ($provider:expr, $build:expr) => {
        $crate::inventory::submit! {
            $crate::module::registry::ModuleProviderReg::new($provider, $build)
        }
    };
}
