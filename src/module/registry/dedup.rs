//! Identity deduplication
//!
//! Keeps exactly one descriptor per module identity. The first contribution
//! wins; later ones are dropped with a `SkippedDuplicate` trace event.

use indexmap::map::Entry;
use indexmap::IndexMap;
use tracing::debug;

use crate::module::registry::descriptor::ModuleDescriptor;
use crate::module::registry::identity::ModuleId;
use crate::module::registry::module_crate::ModuleCrate;
use crate::module::trace::{TraceEvent, Tracer};

/// Fold collected crates into an insertion-ordered map keyed by identity
pub fn dedupe(
    collected: Vec<ModuleCrate>,
    tracer: Tracer<'_>,
) -> IndexMap<ModuleId, ModuleDescriptor> {
    let mut modules: IndexMap<ModuleId, ModuleDescriptor> =
        IndexMap::with_capacity(collected.len());

    for module_crate in &collected {
        let descriptor = ModuleDescriptor::from_crate(module_crate);

        match modules.entry(descriptor.id.clone()) {
            Entry::Occupied(retained) => {
                tracer.emit(TraceEvent::SkippedDuplicate {
                    module: descriptor.name,
                    provider: descriptor.provider_name,
                    retained_provider: retained.get().provider_name.clone(),
                });
            }
            Entry::Vacant(slot) => {
                tracer.emit(TraceEvent::Accepted {
                    module: descriptor.name.clone(),
                    provider: descriptor.provider_name.clone(),
                });
                if descriptor.deprecated {
                    tracer.emit(TraceEvent::Deprecated {
                        module: descriptor.name.clone(),
                        description: descriptor.description.clone(),
                    });
                }
                slot.insert(descriptor);
            }
        }
    }

    debug!(
        "Deduplicated {} contributions into {} modules",
        collected.len(),
        modules.len()
    );
    modules
}
