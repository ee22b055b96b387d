//! Re-annotates breaks after every edit.

use crate::flowed::annotate::{AnnotateStats, NewlineAnnotator};
use crate::text::{Document, EditRegion};
use tracing::debug;

/// Consumes a document's change notifications and keeps break markers in
/// sync with the `hard` flags.
///
/// Each region is annotated exactly as reported. The cursor and mark are
/// saved around the scan and restored on every exit path.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChangeTracker {
    annotator: NewlineAnnotator,
}

impl ChangeTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_annotator(annotator: NewlineAnnotator) -> Self {
        Self { annotator }
    }

    #[must_use]
    pub fn annotator(&self) -> &NewlineAnnotator {
        &self.annotator
    }

    /// Handle one edit notification covering `region`.
    pub fn on_edit(&self, doc: &mut Document, region: EditRegion) {
        let mut doc = doc.save_excursion();
        self.annotator.annotate(&mut doc, region.start, region.end);
    }

    /// Drain the document's pending notifications and handle each one.
    /// Returns the number of regions processed.
    pub fn flush(&self, doc: &mut Document) -> usize {
        let changes = doc.take_changes();
        for region in &changes {
            self.on_edit(doc, *region);
        }
        if !changes.is_empty() {
            debug!(regions = changes.len(), revision = doc.revision(), "flushed edits");
        }
        changes.len()
    }

    /// Annotate the whole document, e.g. when the mode is switched on.
    pub fn annotate_all(&self, doc: &mut Document) -> AnnotateStats {
        let len = doc.len_chars();
        let mut doc = doc.save_excursion();
        self.annotator.annotate(&mut doc, 0, len)
    }
}
