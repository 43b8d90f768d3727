//! Composition folding
//!
//! Collapses every override chain into one effective module. Modules that
//! nobody overrides are emitted as they are; an overridden module is never
//! emitted on its own but becomes the base layer of whoever overrides it.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::module::binder::Binder;
use crate::module::registry::descriptor::ModuleDescriptor;
use crate::module::registry::graph::OverrideGraph;
use crate::module::traits::Module;

/// Layering of module units inside one effective module
#[derive(Clone)]
pub enum Composition {
    /// A single unit
    Leaf { name: String, module: Arc<dyn Module> },
    /// `with` layered over every base it overrides
    Override {
        base: Vec<Composition>,
        name: String,
        with: Arc<dyn Module>,
    },
}

impl Composition {
    /// Name of the outermost unit
    pub fn name(&self) -> &str {
        match self {
            Composition::Leaf { name, .. } | Composition::Override { name, .. } => name,
        }
    }

    /// Configure bases first so the outer unit's bindings win
    pub fn configure(&self, binder: &mut Binder) {
        match self {
            Composition::Leaf { module, .. } => module.configure(binder),
            Composition::Override { base, with, .. } => {
                for layer in base {
                    layer.configure(binder);
                }
                with.configure(binder);
            }
        }
    }

    fn visit<'a>(&'a self, f: &mut impl FnMut(&'a str, &'a Arc<dyn Module>)) {
        match self {
            Composition::Leaf { name, module } => f(name, module),
            Composition::Override { base, name, with } => {
                for layer in base {
                    layer.visit(f);
                }
                f(name, with);
            }
        }
    }
}

impl fmt::Debug for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Composition::Leaf { name, .. } => write!(f, "{}", name),
            Composition::Override { base, name, .. } => {
                write!(f, "{} over ", name)?;
                f.debug_list().entries(base).finish()
            }
        }
    }
}

/// A resolved module, ready for container construction
#[derive(Clone)]
pub struct EffectiveModule {
    /// Name of the outermost (winning) module
    pub name: String,
    pub provider_name: String,
    pub description: Option<String>,
    pub deprecated: bool,
    /// Config paths of every layer; overriding layers win on conflicts
    pub config_paths: IndexMap<String, String>,
    pub composition: Composition,
}

impl EffectiveModule {
    fn leaf(descriptor: &ModuleDescriptor) -> Self {
        Self {
            name: descriptor.name.clone(),
            provider_name: descriptor.provider_name.clone(),
            description: descriptor.description.clone(),
            deprecated: descriptor.deprecated,
            config_paths: descriptor.config_paths.clone(),
            composition: Composition::Leaf {
                name: descriptor.name.clone(),
                module: Arc::clone(&descriptor.module),
            },
        }
    }

    fn layered(descriptor: &ModuleDescriptor, bases: Vec<EffectiveModule>) -> Self {
        let mut config_paths = IndexMap::new();
        let mut base = Vec::with_capacity(bases.len());
        for layer in bases {
            config_paths.extend(layer.config_paths);
            base.push(layer.composition);
        }
        config_paths.extend(
            descriptor
                .config_paths
                .iter()
                .map(|(path, type_label)| (path.clone(), type_label.clone())),
        );

        Self {
            name: descriptor.name.clone(),
            provider_name: descriptor.provider_name.clone(),
            description: descriptor.description.clone(),
            deprecated: descriptor.deprecated,
            config_paths,
            composition: Composition::Override {
                base,
                name: descriptor.name.clone(),
                with: Arc::clone(&descriptor.module),
            },
        }
    }

    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    /// Whether this module layers an override over one or more bases
    pub fn is_composite(&self) -> bool {
        matches!(self.composition, Composition::Override { .. })
    }

    /// Names of every layer, bases first
    pub fn layers(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.composition.visit(&mut |name, _| names.push(name));
        names
    }

    /// Module units of every layer, bases first
    pub fn units(&self) -> Vec<Arc<dyn Module>> {
        let mut units = Vec::new();
        self.composition
            .visit(&mut |_, module| units.push(Arc::clone(module)));
        units
    }

    /// Contribute the bindings of every layer, bases first
    pub fn configure(&self, binder: &mut Binder) {
        self.composition.configure(binder);
    }
}

impl fmt::Debug for EffectiveModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectiveModule")
            .field("name", &self.name)
            .field("provider_name", &self.provider_name)
            .field("deprecated", &self.deprecated)
            .field("composition", &self.composition)
            .finish_non_exhaustive()
    }
}

/// Fold modules in load order into effective modules.
///
/// `order` must place every overridden module before its overrider, which
/// is what `ModuleDependencies::load_order` produces.
pub fn fold(graph: &OverrideGraph, order: &[usize]) -> Vec<EffectiveModule> {
    let mut pending: Vec<Option<EffectiveModule>> = vec![None; graph.len()];
    let mut effective = Vec::new();

    for &index in order {
        let descriptor = graph.node(index);
        let bases: Vec<EffectiveModule> = graph
            .successors(index)
            .iter()
            .filter_map(|&overridden| pending[overridden].take())
            .collect();

        let folded = if bases.is_empty() {
            EffectiveModule::leaf(descriptor)
        } else {
            EffectiveModule::layered(descriptor, bases)
        };

        if graph.is_overridden(index) {
            pending[index] = Some(folded);
        } else {
            effective.push(folded);
        }
    }

    effective
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::registry::dedup::dedupe;
    use crate::module::registry::dependencies::ModuleDependencies;
    use crate::module::registry::graph::build_graph;
    use crate::module::registry::module_crate::ModuleCrate;
    use crate::module::trace::Tracer;

    struct Base;
    impl Module for Base {
        fn configure(&self, binder: &mut Binder) {
            binder.bind("level", "info").bind("target", "stdout");
        }
    }

    struct Middle;
    impl Module for Middle {
        fn configure(&self, binder: &mut Binder) {
            binder.bind("level", "debug");
        }
    }

    struct Top;
    impl Module for Top {
        fn configure(&self, binder: &mut Binder) {
            binder.bind("format", "json");
        }
    }

    fn resolve(crates: Vec<ModuleCrate>) -> Vec<EffectiveModule> {
        let graph = build_graph(dedupe(crates, Tracer::silent()), Tracer::silent());
        let order = ModuleDependencies::load_order(&graph).unwrap();
        fold(&graph, &order)
    }

    #[test]
    fn test_chain_folds_bottom_up() {
        let effective = resolve(vec![
            ModuleCrate::of(Top).overrides::<Middle>().build(),
            ModuleCrate::of(Base).config::<String>("log.level").build(),
            ModuleCrate::of(Middle)
                .overrides::<Base>()
                .config::<u8>("log.level")
                .build(),
        ]);

        assert_eq!(effective.len(), 1);
        let top = &effective[0];
        assert_eq!(top.name, "Top");
        assert_eq!(top.layers(), vec!["Base", "Middle", "Top"]);
        assert_eq!(top.units().len(), 3);
        assert_eq!(
            top.config_paths.get("log.level").map(String::as_str),
            Some(std::any::type_name::<u8>())
        );

        let mut binder = Binder::new();
        top.configure(&mut binder);
        assert_eq!(binder.get_str("level"), Some("debug"));
        assert_eq!(binder.get_str("target"), Some("stdout"));
        assert_eq!(binder.get_str("format"), Some("json"));
    }

    #[test]
    fn test_module_overriding_two_bases() {
        let effective = resolve(vec![
            ModuleCrate::of(Base).build(),
            ModuleCrate::of(Middle).build(),
            ModuleCrate::of(Top)
                .overrides::<Base>()
                .overrides::<Middle>()
                .build(),
        ]);

        assert_eq!(effective.len(), 1);
        assert!(effective[0].is_composite());
        assert_eq!(effective[0].layers(), vec!["Base", "Middle", "Top"]);
    }
}
