//! Shared fixtures for integration tests
#![allow(dead_code)]

use std::sync::Arc;

use modweave::module::registry::FnModule;
use modweave::{Binder, EffectiveModule, Module, ModuleCrate, ModuleId};

macro_rules! binding_module {
    ($name:ident, $key:expr, $value:expr) => {
        #[derive(Debug, Default, Clone, Copy)]
        pub struct $name;

        impl Module for $name {
            fn configure(&self, binder: &mut Binder) {
                binder.bind($key, $value);
            }
        }
    };
}

binding_module!(Core, "core.enabled", true);
binding_module!(Logging, "log.level", "info");
binding_module!(LoggingOverride, "log.level", "debug");
binding_module!(A, "a", "A");
binding_module!(B, "b", "B");
binding_module!(C, "c", "C");
binding_module!(M, "m", "M");

/// A manifest-style module keyed by `name` that binds `name = true`
pub fn named_module(name: &str, overrides: &[&str]) -> ModuleCrate {
    let key = name.to_string();
    ModuleCrate::with_id(
        ModuleId::named(name),
        Arc::new(FnModule(move |binder: &mut Binder| {
            binder.bind(key.clone(), true);
        })),
    )
    .name(name)
    .overrides_all(overrides.iter().map(|o| ModuleId::named(*o)))
    .build()
}

/// Outermost names of effective modules, in order
pub fn names(modules: &[EffectiveModule]) -> Vec<String> {
    modules.iter().map(|m| m.name.clone()).collect()
}

/// Layer names of every effective module, in order
pub fn layers(modules: &[EffectiveModule]) -> Vec<Vec<String>> {
    modules
        .iter()
        .map(|m| m.layers().into_iter().map(str::to_string).collect())
        .collect()
}
