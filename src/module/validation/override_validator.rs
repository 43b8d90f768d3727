//! Override graph validation
//!
//! A module may be replaced by at most one other module. This check runs
//! before sorting; cycles are detected by the sort itself.

use tracing::debug;

use crate::module::registry::graph::OverrideGraph;
use crate::module::traits::{DoubleOverrideError, OverridingModule};

/// Reject graphs in which any module has more than one incoming override edge.
///
/// Nodes are checked in discovery order, so the first offending target is
/// the one reported. All overriders of that target are named, in discovery
/// order.
pub fn validate_single_override(graph: &OverrideGraph) -> Result<(), DoubleOverrideError> {
    for index in 0..graph.len() {
        let overriders = graph.incoming(index);
        if overriders.len() <= 1 {
            continue;
        }

        let target = graph.node(index);
        let mut ordered = overriders.to_vec();
        ordered.sort_unstable();

        return Err(DoubleOverrideError {
            target: target.name.clone(),
            target_provider: target.provider_name.clone(),
            overriders: ordered
                .into_iter()
                .map(|i| OverridingModule {
                    name: graph.node(i).name.clone(),
                    provider: graph.node(i).provider_name.clone(),
                })
                .collect(),
        });
    }

    debug!("Override graph passed single-override check");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::binder::Binder;
    use crate::module::registry::dedup::dedupe;
    use crate::module::registry::graph::build_graph;
    use crate::module::registry::module_crate::ModuleCrate;
    use crate::module::trace::Tracer;
    use crate::module::traits::Module;

    struct A;
    struct B;
    struct C;
    impl Module for A {
        fn configure(&self, _binder: &mut Binder) {}
    }
    impl Module for B {
        fn configure(&self, _binder: &mut Binder) {}
    }
    impl Module for C {
        fn configure(&self, _binder: &mut Binder) {}
    }

    fn graph_of(crates: Vec<ModuleCrate>) -> OverrideGraph {
        build_graph(dedupe(crates, Tracer::silent()), Tracer::silent())
    }

    #[test]
    fn test_double_override_names_target_and_overriders() {
        let graph = graph_of(vec![
            ModuleCrate::of(A).provider_name("explicit").overrides::<B>().build(),
            ModuleCrate::of(B).provider_name("auto-load").build(),
            ModuleCrate::of(C).provider_name("override").overrides::<B>().build(),
        ]);

        let err = validate_single_override(&graph).unwrap_err();
        assert_eq!(err.target, "B");
        assert_eq!(err.target_provider, "auto-load");
        let names: Vec<&str> = err.overriders.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
    }

    #[test]
    fn test_chain_is_valid() {
        let graph = graph_of(vec![
            ModuleCrate::of(A).build(),
            ModuleCrate::of(B).overrides::<A>().build(),
            ModuleCrate::of(C).overrides::<B>().build(),
        ]);
        assert!(validate_single_override(&graph).is_ok());
    }
}
