//! Override graph
//!
//! Nodes are the deduplicated descriptors, stored in an arena in dedup
//! insertion order and addressed by index. An edge `a -> b` means "a
//! overrides b". The graph is built fresh for every resolution and never
//! mutated after `build_graph` returns.

use indexmap::IndexMap;
use tracing::debug;

use crate::module::registry::descriptor::ModuleDescriptor;
use crate::module::registry::identity::ModuleId;
use crate::module::trace::{TraceEvent, Tracer};

/// Directed override graph over deduplicated modules
#[derive(Debug)]
pub struct OverrideGraph {
    nodes: Vec<ModuleDescriptor>,
    /// Outgoing edges per node: the modules it overrides
    successors: Vec<Vec<usize>>,
    /// Incoming edges per node: the modules overriding it, in discovery order
    incoming: Vec<Vec<usize>>,
}

impl OverrideGraph {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, index: usize) -> &ModuleDescriptor {
        &self.nodes[index]
    }

    /// Modules overridden by `index`
    pub fn successors(&self, index: usize) -> &[usize] {
        &self.successors[index]
    }

    /// Modules overriding `index`
    pub fn incoming(&self, index: usize) -> &[usize] {
        &self.incoming[index]
    }

    pub fn is_overridden(&self, index: usize) -> bool {
        !self.incoming[index].is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.successors.iter().map(Vec::len).sum()
    }
}

/// Build the override graph from deduplicated modules.
///
/// Every module becomes a node. An override declaration whose target is not
/// loaded adds no edge and is reported as `IgnoredOverride`.
pub fn build_graph(
    modules: IndexMap<ModuleId, ModuleDescriptor>,
    tracer: Tracer<'_>,
) -> OverrideGraph {
    let count = modules.len();
    let mut successors = vec![Vec::new(); count];
    let mut incoming = vec![Vec::new(); count];

    for (source, descriptor) in modules.values().enumerate() {
        for target_id in &descriptor.overrides {
            match modules.get_full(target_id) {
                Some((target, _, target_descriptor)) => {
                    tracer.emit(TraceEvent::OverrideApplied {
                        module: descriptor.name.clone(),
                        provider: descriptor.provider_name.clone(),
                        overrides: target_descriptor.name.clone(),
                    });
                    successors[source].push(target);
                    incoming[target].push(source);
                }
                None => {
                    tracer.emit(TraceEvent::IgnoredOverride {
                        module: descriptor.name.clone(),
                        target: target_id.default_name(),
                    });
                }
            }
        }
    }

    let graph = OverrideGraph {
        nodes: modules.into_values().collect(),
        successors,
        incoming,
    };
    debug!(
        "Built override graph with {} nodes and {} edges",
        graph.len(),
        graph.edge_count()
    );
    graph
}
