//! Host-facing buffer that keeps annotation in step with editing.

use crate::error::Result;
use crate::flowed::annotate::AnnotateStats;
use crate::flowed::breaker::{BreakStrategy, PlainBreaker};
use crate::flowed::dispatch::{ModeDispatcher, ModeSource};
use crate::flowed::fill;
use crate::flowed::tracker::ChangeTracker;
use crate::text::Document;
use std::ops::Range;
use tracing::debug;

enum Breaking {
    Original(Box<dyn BreakStrategy>),
    Dispatched(ModeDispatcher),
}

impl Breaking {
    fn strategy(&self) -> &dyn BreakStrategy {
        match self {
            Self::Original(original) => original.as_ref(),
            Self::Dispatched(dispatcher) => dispatcher,
        }
    }
}

/// A [`Document`] plus the machinery that reacts to its edits.
///
/// Every mutating method flushes the document's change queue before it
/// returns, so break annotation is never observed out of date. Edits made
/// through [`document_mut`](Self::document_mut) are picked up by the next
/// mutating call or an explicit [`flush`](Self::flush).
pub struct FlowedBuffer {
    doc: Document,
    tracker: ChangeTracker,
    tracking: bool,
    breaking: Breaking,
}

impl std::fmt::Debug for FlowedBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowedBuffer")
            .field("doc", &self.doc)
            .field("tracking", &self.tracking)
            .field("reflow", &self.is_reflow_enabled())
            .finish_non_exhaustive()
    }
}

impl FlowedBuffer {
    /// Wrap `doc`, breaking lines with the [`PlainBreaker`].
    #[must_use]
    pub fn new(doc: Document) -> Self {
        Self::with_strategy(doc, PlainBreaker)
    }

    /// Wrap `doc` with a custom original break routine.
    pub fn with_strategy(doc: Document, strategy: impl BreakStrategy + 'static) -> Self {
        Self {
            doc,
            tracker: ChangeTracker::new(),
            tracking: false,
            breaking: Breaking::Original(Box::new(strategy)),
        }
    }

    /// Use a different tracker (e.g. one with another marker glyph).
    #[must_use]
    pub fn with_tracker(mut self, tracker: ChangeTracker) -> Self {
        self.tracker = tracker;
        self
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Direct access to the document. Pending edits are annotated on the
    /// next flush.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    #[must_use]
    pub fn into_document(self) -> Document {
        self.doc
    }

    #[must_use]
    pub fn tracker(&self) -> &ChangeTracker {
        &self.tracker
    }

    // ------------------------------------------------------------------
    // Activation
    // ------------------------------------------------------------------

    /// Start preserving typed breaks as hard and showing markers for them.
    pub fn enable_hard_newlines(&mut self) -> AnnotateStats {
        self.doc.settings_mut().hard_newlines = true;
        self.tracking = true;
        self.doc.take_changes();
        let stats = self.tracker.annotate_all(&mut self.doc);
        debug!(marked = stats.marked, "hard newlines enabled");
        stats
    }

    /// Stop tracking and drop every marker. `hard` flags are kept.
    pub fn disable_hard_newlines(&mut self) {
        self.doc.settings_mut().hard_newlines = false;
        self.tracking = false;
        self.doc.take_changes();
        self.tracker.annotator().clear(&mut self.doc);
        debug!("hard newlines disabled");
    }

    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    /// Route line breaking through a [`ModeDispatcher`] and turn off the
    /// document's own auto-fill. Calling it again only swaps the mode
    /// source.
    pub fn enable_reflow(&mut self, modes: ModeSource) {
        let current = std::mem::replace(
            &mut self.breaking,
            Breaking::Original(Box::new(PlainBreaker)),
        );
        self.breaking = match current {
            Breaking::Original(original) => {
                Breaking::Dispatched(ModeDispatcher::from_boxed(original).with_mode_source(modes))
            }
            Breaking::Dispatched(dispatcher) => {
                Breaking::Dispatched(dispatcher.with_mode_source(modes))
            }
        };
        self.doc.settings_mut().auto_fill = false;
        debug!(mode = self.doc.mode(), "reflow enabled");
    }

    /// Go back to the original break routine.
    pub fn disable_reflow(&mut self) {
        let current = std::mem::replace(
            &mut self.breaking,
            Breaking::Original(Box::new(PlainBreaker)),
        );
        self.breaking = match current {
            Breaking::Dispatched(dispatcher) => Breaking::Original(dispatcher.into_original()),
            original @ Breaking::Original(_) => original,
        };
    }

    #[must_use]
    pub fn is_reflow_enabled(&self) -> bool {
        matches!(self.breaking, Breaking::Dispatched(_))
    }

    pub fn set_auto_fill(&mut self, enabled: bool) {
        self.doc.settings_mut().auto_fill = enabled;
    }

    // ------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------

    pub fn set_cursor(&mut self, offset: usize) {
        self.doc.set_cursor(offset);
    }

    /// Move the cursor, failing instead of clamping.
    pub fn try_set_cursor(&mut self, offset: usize) -> Result<()> {
        self.doc.check_offset(offset)?;
        self.doc.set_cursor(offset);
        Ok(())
    }

    /// Type `text` at the cursor, auto-filling if enabled.
    pub fn insert(&mut self, text: &str) {
        self.doc.insert(text);
        if self.doc.settings().auto_fill {
            fill::auto_fill(&mut self.doc, self.breaking.strategy());
        }
        self.flush();
    }

    /// Type a newline: hard when hard newlines are on, soft otherwise.
    pub fn newline(&mut self) {
        if self.doc.settings().hard_newlines {
            self.doc.insert_hard_break();
        } else {
            self.doc.insert("\n");
        }
        self.flush();
    }

    /// Break the line at the cursor the way wrapping would.
    pub fn insert_break(&mut self) -> usize {
        let brk = self.breaking.strategy().insert_break(&mut self.doc);
        self.flush();
        brk
    }

    /// Delete up to `count` characters before the cursor.
    pub fn delete_backward(&mut self, count: usize) -> String {
        let end = self.doc.cursor();
        let removed = self.doc.remove(end.saturating_sub(count)..end);
        self.flush();
        removed
    }

    pub fn delete_range(&mut self, range: Range<usize>) -> String {
        let removed = self.doc.remove(range);
        self.flush();
        removed
    }

    pub fn fill_paragraph(&mut self) -> usize {
        let inserted = fill::fill_paragraph(&mut self.doc, self.breaking.strategy());
        self.flush();
        inserted
    }

    pub fn fill_region(&mut self, range: Range<usize>) -> usize {
        let inserted = fill::fill_region(&mut self.doc, range, self.breaking.strategy());
        self.flush();
        inserted
    }

    pub fn unflow_region(&mut self, range: Range<usize>) -> usize {
        let joined = fill::unflow_region(&mut self.doc, range);
        self.flush();
        joined
    }

    /// Process pending edit notifications. Without tracking they are
    /// discarded. Returns the number of regions annotated.
    pub fn flush(&mut self) -> usize {
        if self.tracking {
            self.tracker.flush(&mut self.doc)
        } else {
            self.doc.take_changes();
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FillOptions, ModeSet};
    use crate::error::Error;
    use crate::text::CharFlags;

    fn text_mode(text: &str) -> FlowedBuffer {
        let mut buf = FlowedBuffer::new(Document::with_text(text).with_mode("text-mode"));
        buf.enable_reflow(ModeSource::Fixed(ModeSet::parse("text-mode").unwrap()));
        buf
    }

    #[test]
    fn test_hard_newline_gets_marker() {
        let mut buf = FlowedBuffer::new(Document::with_text("abc"));
        buf.enable_hard_newlines();
        buf.set_cursor(3);
        buf.newline();
        buf.insert("def");
        let doc = buf.document();
        assert_eq!(doc.text(), "abc\ndef");
        assert!(doc.is_hard(3));
        assert!(doc.display_at(3).is_some());
        assert!(!doc.has_pending_changes());
    }

    #[test]
    fn test_soft_newline_without_hard_newlines() {
        let mut buf = FlowedBuffer::new(Document::with_text("abc"));
        buf.set_cursor(3);
        buf.newline();
        assert!(!buf.document().is_hard(3));
        assert!(buf.document().display_at(3).is_none());
    }

    #[test]
    fn test_enable_marks_existing_and_disable_clears() {
        let mut doc = Document::with_text("a\nb\nc");
        doc.set_hard(1, true);
        let mut buf = FlowedBuffer::new(doc);
        let stats = buf.enable_hard_newlines();
        assert_eq!(stats.marked, 1);
        assert!(buf.is_tracking());

        buf.disable_hard_newlines();
        assert!(buf.document().display_at(1).is_none());
        assert!(buf.document().is_hard(1));
        assert!(!buf.is_tracking());
    }

    #[test]
    fn test_deleting_text_before_break_keeps_marker() {
        let mut buf = FlowedBuffer::new(Document::with_text("ab"));
        buf.enable_hard_newlines();
        buf.set_cursor(2);
        buf.newline();
        buf.set_cursor(1);
        assert_eq!(buf.delete_backward(1), "a");
        let doc = buf.document();
        assert_eq!(doc.text(), "b\n");
        assert!(doc.display_at(1).is_some());
    }

    #[test]
    fn test_reflow_break_in_configured_mode() {
        let mut buf = text_mode("word1 word2");
        buf.enable_hard_newlines();
        buf.set_cursor(6);
        assert_eq!(buf.insert_break(), 6);
        let doc = buf.document();
        assert_eq!(doc.text(), "word1 \nword2");
        assert!(!doc.is_hard(6));
        assert!(doc.display_at(6).is_none());
    }

    #[test]
    fn test_enable_reflow_turns_off_auto_fill() {
        let mut buf = FlowedBuffer::new(Document::with_text(""));
        buf.set_auto_fill(true);
        buf.enable_reflow(ModeSource::Global);
        assert!(buf.is_reflow_enabled());
        assert!(!buf.document().settings().auto_fill);

        buf.disable_reflow();
        assert!(!buf.is_reflow_enabled());
    }

    #[test]
    fn test_auto_fill_while_typing() {
        let fill = FillOptions::new().fill_column(10).unwrap();
        let mut buf = FlowedBuffer::new(Document::with_text("").with_fill(fill));
        buf.set_auto_fill(true);
        buf.insert("one two three");
        assert_eq!(buf.document().text(), "one two\nthree");
        assert_eq!(buf.document().cursor(), 13);
    }

    #[test]
    fn test_fill_paragraph_then_unflow() {
        let fill = FillOptions::new().fill_column(7).unwrap();
        let mut buf = text_mode("aaa bbb ccc ddd");
        buf.document_mut().settings_mut().fill = fill;
        assert_eq!(buf.fill_paragraph(), 1);
        assert_eq!(buf.document().text(), "aaa bbb \nccc ddd");
        assert_eq!(buf.unflow_region(0..16), 1);
        assert_eq!(buf.document().text(), "aaa bbb ccc ddd");
    }

    #[test]
    fn test_hard_newline_after_prefix_survives_fill() {
        let fill = FillOptions::new().fill_prefix("> ");
        let doc = Document::with_text("> aa bb").with_mode("text-mode").with_fill(fill);
        let mut buf = FlowedBuffer::new(doc);
        buf.enable_reflow(ModeSource::Fixed(ModeSet::parse("text-mode").unwrap()));
        buf.enable_hard_newlines();

        buf.set_cursor(5);
        buf.insert_break();
        assert_eq!(buf.document().text(), "> aa \n> bb");
        assert_eq!(buf.document().cursor(), 8);
        buf.newline();
        assert_eq!(buf.document().text(), "> aa \n> \nbb");
        assert!(buf.document().is_hard(8));
        assert!(!buf.document().attrs_at(8).flags.contains(CharFlags::FILL_PREFIX));

        buf.set_cursor(0);
        buf.fill_paragraph();
        let doc = buf.document();
        assert_eq!(doc.text(), "> aa \n> \nbb");
        assert!(doc.is_hard(8));
        assert!(doc.display_at(8).is_some());
    }

    #[test]
    fn test_try_set_cursor_out_of_bounds() {
        let mut buf = FlowedBuffer::new(Document::with_text("abc"));
        assert_eq!(
            buf.try_set_cursor(10),
            Err(Error::OutOfBounds { offset: 10, len: 3 })
        );
        assert!(buf.try_set_cursor(3).is_ok());
        assert_eq!(buf.document().cursor(), 3);
    }
}
