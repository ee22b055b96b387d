//! Visible markers for hard line breaks.

use crate::text::{Document, RenderValue};
use tracing::trace;

/// Default glyph drawn before a hard break.
pub const DEFAULT_MARKER: char = '¶';

/// Counts from one annotation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnnotateStats {
    /// Hard breaks given a fresh marker.
    pub marked: usize,
    /// Soft breaks left without an override.
    pub cleared: usize,
}

/// Sets a display override on every hard break in a range and clears it on
/// every soft one.
///
/// Only break characters are touched; everything else in the range keeps
/// its metadata. The `hard` flag itself is never written here.
#[derive(Clone, Copy, Debug)]
pub struct NewlineAnnotator {
    marker: char,
}

impl Default for NewlineAnnotator {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER,
        }
    }
}

impl NewlineAnnotator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different marker glyph.
    #[must_use]
    pub fn with_marker(marker: char) -> Self {
        Self { marker }
    }

    #[must_use]
    pub fn marker(&self) -> char {
        self.marker
    }

    /// Annotate every break in `[beg, end)`.
    ///
    /// Hard breaks always receive a newly allocated [`RenderValue`], even
    /// when they already carry one that draws the same thing, so the renderer
    /// sees the change and redraws. Bounds are clamped to the document; an
    /// empty range touches nothing.
    pub fn annotate(&self, doc: &mut Document, beg: usize, end: usize) -> AnnotateStats {
        let end = end.min(doc.len_chars());
        let mut stats = AnnotateStats::default();
        if beg >= end {
            return stats;
        }

        let mut pos = beg;
        while let Some(at) = doc.find_break(pos..end) {
            if doc.is_hard(at) {
                doc.set_display(at, Some(RenderValue::marked_break(self.marker)));
                stats.marked += 1;
            } else {
                doc.set_display(at, None);
                stats.cleared += 1;
            }
            pos = at + 1;
        }

        trace!(beg, end, marked = stats.marked, cleared = stats.cleared, "annotated breaks");
        stats
    }

    /// Remove every display override from the document's breaks.
    pub fn clear(&self, doc: &mut Document) {
        for at in doc.breaks(0..doc.len_chars()) {
            doc.set_display(at, None);
        }
    }
}
