//! Auto-discovery: manifest directories, custom sources and failures

mod common;

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use common::*;
use modweave::module::registry::{discovery_fn, DirectoryDiscovery};
use modweave::{Bootstrap, BootstrapConfig, DiscoveryError, ModuleCrate, ModuleError};
use tempfile::TempDir;

fn write_manifest(root: &Path, dir: &str, contents: &str) {
    let module_dir = root.join(dir);
    fs::create_dir_all(&module_dir).unwrap();
    fs::write(module_dir.join("module.toml"), contents).unwrap();
}

fn manifest_config(dir: &Path) -> BootstrapConfig {
    let mut config = BootstrapConfig::default();
    config.modules.modules_dir = dir.display().to_string();
    config
}

#[test]
fn manifest_modules_resolve_with_overrides() {
    let temp = TempDir::new().unwrap();
    write_manifest(
        temp.path(),
        "jetty",
        r#"
        name = "jetty"
        description = "HTTP server"

        [configs]
        "jetty.port" = "u16"

        [bindings]
        "jetty.port" = 8080
        "jetty.host" = "0.0.0.0"
        "#,
    );
    write_manifest(
        temp.path(),
        "jetty-test",
        r#"
        name = "jetty-test"
        overrides = ["jetty"]

        [bindings]
        "jetty.port" = 0
        "#,
    );

    let bindings = Bootstrap::from_config(&manifest_config(temp.path()))
        .silent()
        .module(Core)
        .build_bindings()
        .unwrap();

    assert_eq!(bindings.get("jetty.port"), Some(&serde_json::json!(0)));
    assert_eq!(bindings.get_str("jetty.host"), Some("0.0.0.0"));
    assert!(bindings.contains("core.enabled"));
}

#[test]
fn manifest_provider_label_names_directory() {
    let temp = TempDir::new().unwrap();
    write_manifest(temp.path(), "solo", "name = \"solo\"\ndeprecated = true");

    let effective = Bootstrap::from_config(&manifest_config(temp.path()))
        .silent()
        .resolve()
        .unwrap();

    assert_eq!(names(&effective), vec!["solo"]);
    assert!(effective[0].deprecated);
    assert!(effective[0].provider_name.starts_with("manifest:"));
}

#[test]
fn explicit_module_beats_discovered_module() {
    let temp = TempDir::new().unwrap();
    write_manifest(temp.path(), "dup", "name = \"dup\"\n[bindings]\nsource = \"manifest\"");

    let explicit = ModuleCrate::with_id(
        modweave::ModuleId::named("dup"),
        Arc::new(modweave::module::registry::FnModule(|b: &mut modweave::Binder| {
            b.bind("source", "explicit");
        })),
    )
    .build();

    let bindings = Bootstrap::from_config(&manifest_config(temp.path()))
        .silent()
        .crate_(explicit)
        .build_bindings()
        .unwrap();
    assert_eq!(bindings.get_str("source"), Some("explicit"));
}

#[test]
fn broken_manifest_aborts_bootstrap() {
    let temp = TempDir::new().unwrap();
    write_manifest(temp.path(), "broken", "name = ");

    let err = Bootstrap::from_config(&manifest_config(temp.path()))
        .silent()
        .module(Core)
        .resolve()
        .unwrap_err();
    assert!(matches!(
        err,
        ModuleError::Discovery(DiscoveryError::InvalidManifest { .. })
    ));
}

#[test]
fn missing_modules_dir_discovers_nothing() {
    let temp = TempDir::new().unwrap();
    let effective = Bootstrap::from_config(&manifest_config(&temp.path().join("nope")))
        .silent()
        .module(Core)
        .resolve()
        .unwrap();
    assert_eq!(names(&effective), vec!["Core"]);
}

#[test]
fn custom_discovery_runs_exactly_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let effective = Bootstrap::new()
        .silent()
        .module(Logging)
        .discovery(discovery_fn(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(vec![ModuleCrate::of(LoggingOverride)
                .overrides::<Logging>()
                .build()])
        }))
        .resolve()
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(effective.len(), 1);
    assert_eq!(effective[0].provider_name, "auto-load");
    assert_eq!(effective[0].layers(), vec!["Logging", "LoggingOverride"]);
}

#[test]
fn discovery_failure_is_wrapped() {
    let err = Bootstrap::new()
        .silent()
        .discovery(discovery_fn(|| {
            Err(DiscoveryError::Other("classpath scan failed".to_string()))
        }))
        .resolve()
        .unwrap_err();

    assert!(matches!(err, ModuleError::Discovery(_)));
    assert_eq!(
        err.to_string(),
        "Module auto-discovery failed: classpath scan failed"
    );
}

#[test]
fn directory_discovery_standalone() {
    let temp = TempDir::new().unwrap();
    write_manifest(temp.path(), "z", "name = \"zeta\"");
    write_manifest(temp.path(), "a", "name = \"alpha\"\noverrides = [\"zeta\"]");

    let manifests = DirectoryDiscovery::new(temp.path())
        .discover_manifests()
        .unwrap();
    let found: Vec<&str> = manifests.iter().map(|m| m.manifest.name.as_str()).collect();
    assert_eq!(found, vec!["alpha", "zeta"]);
}
