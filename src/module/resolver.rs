//! Resolution pipeline
//!
//! Runs dedup, graph construction, validation, sorting and folding over one
//! collected module list. A resolver holds no state between calls; every
//! intermediate structure is allocated per call and dropped on return.

use tracing::{debug, info};

use crate::module::compose::{fold, EffectiveModule};
use crate::module::registry::dedup::dedupe;
use crate::module::registry::dependencies::ModuleDependencies;
use crate::module::registry::graph::build_graph;
use crate::module::registry::module_crate::ModuleCrate;
use crate::module::trace::{TraceEvent, TraceSink, Tracer};
use crate::module::traits::ModuleError;
use crate::module::validation::validate_single_override;

/// Turns collected contributions into the ordered effective module list
#[derive(Clone, Copy, Default)]
pub struct ModuleResolver<'a> {
    tracer: Tracer<'a>,
}

impl<'a> ModuleResolver<'a> {
    /// Create a resolver reporting to `sink`, if any
    pub fn new(sink: Option<&'a dyn TraceSink>) -> Self {
        Self {
            tracer: Tracer::new(sink),
        }
    }

    /// Resolve `collected` into effective modules.
    ///
    /// Structural errors are reported to the sink as `ValidationFailed` and
    /// then returned; nothing partial is ever returned.
    pub fn resolve(&self, collected: Vec<ModuleCrate>) -> Result<Vec<EffectiveModule>, ModuleError> {
        let contributed = collected.len();
        let modules = dedupe(collected, self.tracer);
        let graph = build_graph(modules, self.tracer);

        if let Err(e) = validate_single_override(&graph) {
            return Err(self.fail(e.into()));
        }

        let order = match ModuleDependencies::load_order(&graph) {
            Ok(order) => order,
            Err(e) => return Err(self.fail(e.into())),
        };

        let effective = fold(&graph, &order);
        info!(
            "Resolved {} module contributions into {} effective modules",
            contributed,
            effective.len()
        );
        Ok(effective)
    }

    fn fail(&self, error: ModuleError) -> ModuleError {
        debug!("Module resolution failed: {}", error);
        self.tracer.emit(TraceEvent::ValidationFailed {
            message: error.to_string(),
        });
        error
    }
}
