//! Environment overrides for bootstrap configuration

use modweave::config::{ENV_AUTO_LOAD, ENV_LOG, ENV_MODULES_DIR};
use modweave::BootstrapConfig;
use serial_test::serial;

fn clear_env() {
    for key in [ENV_AUTO_LOAD, ENV_MODULES_DIR, ENV_LOG] {
        std::env::remove_var(key);
    }
}

#[test]
#[serial]
fn env_overrides_apply() {
    clear_env();
    std::env::set_var(ENV_AUTO_LOAD, "off");
    std::env::set_var(ENV_MODULES_DIR, "/opt/app/modules");
    std::env::set_var(ENV_LOG, "modweave=trace");

    let mut config = BootstrapConfig::default();
    config.apply_env_overrides();
    clear_env();

    assert!(!config.modules.auto_load);
    assert_eq!(config.modules.modules_dir, "/opt/app/modules");
    assert_eq!(
        config.logging.and_then(|l| l.filter).as_deref(),
        Some("modweave=trace")
    );
}

#[test]
#[serial]
fn unparseable_flag_is_ignored() {
    clear_env();
    std::env::set_var(ENV_AUTO_LOAD, "sometimes");

    let mut config = BootstrapConfig::default();
    config.apply_env_overrides();
    clear_env();

    assert!(config.modules.auto_load);
    assert!(config.logging.is_none());
}
