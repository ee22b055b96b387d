//! Per-mode choice between the flowed break and the original one.

use crate::config::{ModeSet, is_reflow_mode};
use crate::flowed::breaker::BreakStrategy;
use crate::flowed::reflow::ReflowEngine;
use crate::text::Document;
use tracing::trace;

/// Where the dispatcher looks up the reflow modes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ModeSource {
    /// The process-wide set, read on every call.
    #[default]
    Global,
    /// A set fixed at construction.
    Fixed(ModeSet),
}

/// Routes break insertion to the [`ReflowEngine`] for documents whose mode
/// is in the reflow set, and to the original strategy for everything else.
///
/// Outside the set the original is called exactly as it would have been
/// without the dispatcher, and its result is returned unchanged.
pub struct ModeDispatcher {
    original: Box<dyn BreakStrategy>,
    reflow: ReflowEngine,
    modes: ModeSource,
}

impl std::fmt::Debug for ModeDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModeDispatcher")
            .field("reflow", &self.reflow)
            .field("modes", &self.modes)
            .finish_non_exhaustive()
    }
}

impl ModeDispatcher {
    /// Wrap `original`, consulting the process-wide reflow modes.
    pub fn new(original: impl BreakStrategy + 'static) -> Self {
        Self::from_boxed(Box::new(original))
    }

    /// Wrap an already boxed strategy.
    #[must_use]
    pub fn from_boxed(original: Box<dyn BreakStrategy>) -> Self {
        Self {
            original,
            reflow: ReflowEngine::new(),
            modes: ModeSource::Global,
        }
    }

    /// Unwrap, handing back the original strategy.
    #[must_use]
    pub fn into_original(self) -> Box<dyn BreakStrategy> {
        self.original
    }

    /// Use a fixed mode set instead of the process-wide one.
    #[must_use]
    pub fn with_modes(self, modes: ModeSet) -> Self {
        self.with_mode_source(ModeSource::Fixed(modes))
    }

    #[must_use]
    pub fn with_mode_source(mut self, modes: ModeSource) -> Self {
        self.modes = modes;
        self
    }

    /// Replace the reflow engine (e.g. for a custom spacing policy).
    #[must_use]
    pub fn with_reflow(mut self, reflow: ReflowEngine) -> Self {
        self.reflow = reflow;
        self
    }

    #[must_use]
    pub fn mode_source(&self) -> &ModeSource {
        &self.modes
    }

    /// Whether documents in `mode` get flowed breaks.
    #[must_use]
    pub fn applies_to(&self, mode: &str) -> bool {
        match &self.modes {
            ModeSource::Global => is_reflow_mode(mode),
            ModeSource::Fixed(set) => set.contains(mode),
        }
    }

    /// Break the line at the cursor with whichever strategy the document's
    /// mode selects.
    pub fn dispatch(&self, doc: &mut Document) -> usize {
        if self.applies_to(doc.mode()) {
            trace!(mode = doc.mode(), "dispatching to reflow");
            self.reflow.insert_break(doc)
        } else {
            self.original.insert_break(doc)
        }
    }
}

impl BreakStrategy for ModeDispatcher {
    fn insert_break(&self, doc: &mut Document) -> usize {
        self.dispatch(doc)
    }
}
