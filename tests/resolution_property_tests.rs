//! Property tests for resolution invariants

mod common;

use std::collections::HashSet;

use common::*;
use modweave::{Bootstrap, EffectiveModule, ModuleCrate};
use proptest::prelude::*;

fn resolve(crates: Vec<ModuleCrate>) -> Vec<EffectiveModule> {
    crates
        .into_iter()
        .fold(Bootstrap::new().silent(), Bootstrap::crate_)
        .resolve()
        .unwrap()
}

/// Acyclic override declarations with at most one overrider per module:
/// module `i` may only override a module with a smaller index.
fn acyclic_overrides(max_nodes: usize) -> impl Strategy<Value = Vec<Option<usize>>> {
    (1..max_nodes).prop_flat_map(|n| {
        (0..n)
            .map(|i| {
                if i == 0 {
                    Just(None).boxed()
                } else {
                    proptest::option::of(0..i).boxed()
                }
            })
            .collect::<Vec<_>>()
    })
}

fn build_crates(targets: &[Option<usize>]) -> Vec<ModuleCrate> {
    let mut claimed = HashSet::new();
    targets
        .iter()
        .enumerate()
        .map(|(i, target)| {
            let name = format!("m{}", i);
            match target.filter(|t| claimed.insert(*t)) {
                Some(t) => {
                    let target_name = format!("m{}", t);
                    named_module(&name, &[target_name.as_str()])
                }
                None => named_module(&name, &[]),
            }
        })
        .collect()
}

proptest! {
    #[test]
    fn no_overrides_keeps_dedup_order(ids in proptest::collection::vec(0usize..8, 0..20)) {
        let crates: Vec<ModuleCrate> = ids
            .iter()
            .map(|i| named_module(&format!("m{}", i), &[]))
            .collect();

        let mut expected: Vec<String> = Vec::new();
        for i in &ids {
            let name = format!("m{}", i);
            if !expected.contains(&name) {
                expected.push(name);
            }
        }

        let effective = resolve(crates);
        prop_assert_eq!(names(&effective), expected);
    }

    #[test]
    fn acyclic_graphs_cover_every_module_once(targets in acyclic_overrides(16)) {
        let crates = build_crates(&targets);
        let total = crates.len();
        let overridden: HashSet<String> = crates
            .iter()
            .flat_map(|c| c.overrides().iter().map(|id| id.default_name()))
            .collect();

        let effective = resolve(crates);

        let all_layers: Vec<String> = layers(&effective).into_iter().flatten().collect();
        let unique: HashSet<&String> = all_layers.iter().collect();
        prop_assert_eq!(all_layers.len(), total);
        prop_assert_eq!(unique.len(), total);
        prop_assert_eq!(effective.len(), total - overridden.len());

        for module in &effective {
            prop_assert!(!overridden.contains(&module.name));
        }
    }

    #[test]
    fn resolution_is_deterministic(targets in acyclic_overrides(12)) {
        let first = layers(&resolve(build_crates(&targets)));
        let second = layers(&resolve(build_crates(&targets)));
        prop_assert_eq!(first, second);
    }
}
