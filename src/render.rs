//! Drawing a document with its display overrides, and deciding what to redraw.
//!
//! [`Redisplay`] keeps the last frame it drew and compares display
//! overrides by identity. A break that was re-annotated with a fresh
//! [`RenderValue`] is reported dirty even when its glyph did not change.

use crate::text::{Document, RenderValue};
use std::ops::Range;
use tracing::trace;

/// Render the document as it would be drawn: overrides replace their
/// character, invisible characters are skipped.
#[must_use]
pub fn render_text(doc: &Document) -> String {
    let mut out = String::with_capacity(doc.len_chars());
    for (offset, ch) in doc.rope().slice(0..doc.len_chars()).chars().enumerate() {
        let Some(props) = doc.props(offset) else {
            out.push(ch);
            continue;
        };
        if props.attrs.is_invisible() {
            continue;
        }
        match &props.display {
            Some(value) => out.push_str(value.text()),
            None => out.push(ch),
        }
    }
    out
}

#[derive(Clone, Debug, PartialEq)]
struct Shown {
    ch: char,
    display: Option<RenderValue>,
    hidden: bool,
}

/// Result of comparing a document against the last drawn frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RedrawDiff {
    /// Offsets whose drawing changed, ascending.
    pub changed: Vec<usize>,
    /// `changed` merged into contiguous ranges.
    pub dirty_ranges: Vec<Range<usize>>,
}

impl RedrawDiff {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }

    #[must_use]
    pub fn change_count(&self) -> usize {
        self.changed.len()
    }

    fn push(&mut self, offset: usize) {
        self.changed.push(offset);
        match self.dirty_ranges.last_mut() {
            Some(last) if last.end == offset => last.end = offset + 1,
            _ => self.dirty_ranges.push(offset..offset + 1),
        }
    }
}

/// Tracks the last drawn frame of a document.
#[derive(Clone, Debug, Default)]
pub struct Redisplay {
    frame: Vec<Shown>,
}

impl Redisplay {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare `doc` with the last frame, remember it as the new frame and
    /// report the offsets that need redrawing. Offsets past the end of the
    /// shorter frame are always dirty.
    pub fn update(&mut self, doc: &Document) -> RedrawDiff {
        let next = snapshot(doc);
        let mut diff = RedrawDiff::default();
        for offset in 0..next.len().max(self.frame.len()) {
            if self.frame.get(offset) != next.get(offset) {
                diff.push(offset);
            }
        }
        trace!(
            changed = diff.change_count(),
            ranges = diff.dirty_ranges.len(),
            "redisplay"
        );
        self.frame = next;
        diff
    }

    /// Forget the last frame so the next update redraws everything.
    pub fn invalidate(&mut self) {
        self.frame.clear();
    }
}

fn snapshot(doc: &Document) -> Vec<Shown> {
    doc.rope()
        .slice(0..doc.len_chars())
        .chars()
        .enumerate()
        .map(|(offset, ch)| {
            let props = doc.props(offset);
            Shown {
                ch,
                display: props.and_then(|p| p.display.clone()),
                hidden: props.is_some_and(|p| p.attrs.is_invisible()),
            }
        })
        .collect()
}
