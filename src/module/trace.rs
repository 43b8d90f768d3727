//! Resolution diagnostics
//!
//! Every collector decision and every validation failure can be reported to
//! an optional `TraceSink`. The resolver works the same with or without a
//! sink; only the terminal error is guaranteed to reach the caller.

use std::sync::{Arc, Mutex};
use tracing::{debug, trace, warn};

/// A single resolution decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    /// A module was kept after deduplication
    Accepted { module: String, provider: String },
    /// A module with an already-seen identity was discarded (first one wins)
    SkippedDuplicate {
        module: String,
        provider: String,
        retained_provider: String,
    },
    /// An override edge was added to the graph
    OverrideApplied {
        module: String,
        provider: String,
        overrides: String,
    },
    /// An override target is not among the loaded modules; the declaration is inert
    IgnoredOverride { module: String, target: String },
    /// A deprecated module was loaded
    Deprecated {
        module: String,
        description: Option<String>,
    },
    /// Resolution failed structurally
    ValidationFailed { message: String },
}

impl TraceEvent {
    /// Human-readable rendering of the event
    pub fn message(&self) -> String {
        match self {
            TraceEvent::Accepted { module, provider } => {
                format!("Loading module '{}' provided by '{}'", module, provider)
            }
            TraceEvent::SkippedDuplicate {
                module,
                provider,
                retained_provider,
            } => format!(
                "Skipping module '{}' provided by '{}' (already provided by '{}')...",
                module, provider, retained_provider
            ),
            TraceEvent::OverrideApplied {
                module,
                provider,
                overrides,
            } => format!(
                "Loading module '{}' provided by '{}', overrides '{}'",
                module, provider, overrides
            ),
            TraceEvent::IgnoredOverride { module, target } => format!(
                "Module '{}' overrides '{}' which is not loaded, ignoring",
                module, target
            ),
            TraceEvent::Deprecated {
                module,
                description: Some(description),
            } => format!("** Deprecation alert - {}: {}", module, description),
            TraceEvent::Deprecated {
                module,
                description: None,
            } => format!("** Deprecation alert - {}.", module),
            TraceEvent::ValidationFailed { message } => message.clone(),
        }
    }

    /// Whether this event is the duplicate-module warning
    pub fn is_duplicate_warning(&self) -> bool {
        matches!(self, TraceEvent::SkippedDuplicate { .. })
    }
}

/// Receiver of resolution diagnostics
pub trait TraceSink: Send + Sync {
    fn event(&self, event: &TraceEvent);
}

/// Forwards events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn event(&self, event: &TraceEvent) {
        match event {
            TraceEvent::Accepted { .. } | TraceEvent::OverrideApplied { .. } => {
                trace!("{}", event.message())
            }
            TraceEvent::SkippedDuplicate { .. } | TraceEvent::IgnoredOverride { .. } => {
                debug!("{}", event.message())
            }
            TraceEvent::Deprecated { .. } | TraceEvent::ValidationFailed { .. } => {
                warn!("{}", event.message())
            }
        }
    }
}

/// Collects events in memory
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<TraceEvent>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Snapshot of recorded events, in emission order
    pub fn events(&self) -> Vec<TraceEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Number of recorded events matching `predicate`
    pub fn count(&self, predicate: impl Fn(&TraceEvent) -> bool) -> usize {
        self.events().iter().filter(|&e| predicate(e)).count()
    }
}

impl TraceSink for RecordingSink {
    fn event(&self, event: &TraceEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

/// Optional sink handle threaded through the pipeline stages
#[derive(Clone, Copy, Default)]
pub struct Tracer<'a> {
    sink: Option<&'a dyn TraceSink>,
}

impl<'a> Tracer<'a> {
    pub fn new(sink: Option<&'a dyn TraceSink>) -> Self {
        Self { sink }
    }

    /// A tracer that drops every event
    pub fn silent() -> Self {
        Self { sink: None }
    }

    pub fn emit(&self, event: TraceEvent) {
        if let Some(sink) = self.sink {
            sink.event(&event);
        }
    }
}
