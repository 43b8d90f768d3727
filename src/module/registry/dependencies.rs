//! Override load order
//!
//! Topological sort of the override graph (Kahn's algorithm). The resulting
//! order places every overridden module before the module overriding it.

use tracing::debug;

use crate::module::registry::graph::OverrideGraph;
use crate::module::traits::CycleError;

/// Load-order resolver over an override graph
pub struct ModuleDependencies;

impl ModuleDependencies {
    /// Resolve the load order as node indices.
    ///
    /// Fails with `CycleError` as soon as the sort cannot consume every node;
    /// no partial order is ever returned.
    pub fn load_order(graph: &OverrideGraph) -> Result<Vec<usize>, CycleError> {
        let mut order = Self::topological_sort(graph)?;
        // overriders come out first; flip so bases precede them
        order.reverse();

        debug!(
            "Override load order: {:?}",
            order
                .iter()
                .map(|&i| graph.node(i).name.as_str())
                .collect::<Vec<_>>()
        );
        Ok(order)
    }

    /// Kahn's algorithm with a LIFO work list seeded in insertion order
    fn topological_sort(graph: &OverrideGraph) -> Result<Vec<usize>, CycleError> {
        let mut in_degree: Vec<usize> = (0..graph.len())
            .map(|i| graph.incoming(i).len())
            .collect();

        let mut stack: Vec<usize> = (0..graph.len()).filter(|&i| in_degree[i] == 0).collect();
        let mut result = Vec::with_capacity(graph.len());

        while let Some(index) = stack.pop() {
            result.push(index);

            for &overridden in graph.successors(index) {
                in_degree[overridden] -= 1;
                if in_degree[overridden] == 0 {
                    stack.push(overridden);
                }
            }
        }

        if result.len() != graph.len() {
            return Err(Self::cycle_error(graph, &in_degree));
        }

        Ok(result)
    }

    /// Describe the cycle among nodes the sort could not consume.
    ///
    /// Every unconsumed node still has an unconsumed overrider, so walking
    /// overriders from any of them must revisit a node.
    fn cycle_error(graph: &OverrideGraph, in_degree: &[usize]) -> CycleError {
        let remaining: Vec<usize> = (0..graph.len()).filter(|&i| in_degree[i] > 0).collect();
        let unresolved: Vec<String> = remaining
            .iter()
            .map(|&i| graph.node(i).name.clone())
            .collect();

        let mut walk: Vec<usize> = Vec::new();
        let mut current = remaining.first().copied();
        while let Some(index) = current {
            if let Some(position) = walk.iter().position(|&seen| seen == index) {
                walk.drain(..position);
                break;
            }
            walk.push(index);
            current = graph
                .incoming(index)
                .iter()
                .copied()
                .find(|&overrider| in_degree[overrider] > 0);
        }

        // the walk follows edges backwards
        walk.reverse();
        if let Some(start) = walk
            .iter()
            .enumerate()
            .min_by_key(|&(_, &index)| index)
            .map(|(position, _)| position)
        {
            walk.rotate_left(start);
        }

        let mut path: Vec<String> = walk.iter().map(|&i| graph.node(i).name.clone()).collect();
        if let Some(first) = path.first().cloned() {
            path.push(first);
        }

        CycleError { path, unresolved }
    }
}
