//! The document model: rope text plus a per-character metadata table.
//!
//! [`Document`] keeps a [`CharProps`] record for every character in lock-step
//! with the rope. Content mutations queue an [`EditRegion`] describing the
//! touched span in post-edit offsets; metadata writes never do. Consumers
//! drain the queue with [`Document::take_changes`].

// if-let-else is clearer than map_or for the clamping logic
#![allow(clippy::option_if_let_else)]

use crate::config::FillOptions;
use crate::error::{Error, Result};
use crate::text::props::{CharAttrs, CharProps, RenderValue};
use crate::text::rope::RopeWrapper;
use crate::unicode::display_width_char;
use std::ops::{Deref, DerefMut, Range};

/// Line break character.
pub const BREAK: char = '\n';

/// Default tab stop width used for column computation.
pub const DEFAULT_TAB_WIDTH: u8 = 8;

/// Whether `ch` is a line break.
#[inline]
#[must_use]
pub fn is_break(ch: char) -> bool {
    ch == BREAK
}

/// Whether `ch` is horizontal whitespace.
#[inline]
#[must_use]
pub fn is_hspace(ch: char) -> bool {
    ch == ' ' || ch == '\t'
}

/// Half-open `[start, end)` span touched by one edit, in post-edit offsets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EditRegion {
    pub start: usize,
    pub end: usize,
}

impl EditRegion {
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Region after `len` chars were inserted at `at`.
    #[must_use]
    pub fn after_insert(self, at: usize, len: usize) -> Self {
        if at <= self.start {
            Self::new(self.start + len, self.end + len)
        } else if at < self.end {
            Self::new(self.start, self.end + len)
        } else {
            self
        }
    }

    /// Region after the chars in `removed` were deleted.
    #[must_use]
    pub fn after_remove(self, removed: Range<usize>) -> Self {
        let map = |pos: usize| {
            if pos <= removed.start {
                pos
            } else if pos >= removed.end {
                pos - (removed.end - removed.start)
            } else {
                removed.start
            }
        };
        Self::new(map(self.start), map(self.end))
    }
}

/// Handle to a position that follows edits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MarkerId(usize);

#[derive(Clone, Copy, Debug)]
struct MarkerState {
    pos: usize,
    /// Move past text inserted exactly at `pos`.
    advances: bool,
}

/// Document-local settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentSettings {
    /// Active editing mode identifier.
    pub mode: String,
    /// Breaks typed by the user are inserted hard.
    pub hard_newlines: bool,
    /// The host's own auto-wrap pass runs while typing.
    pub auto_fill: bool,
    pub tab_width: u8,
    pub fill: FillOptions,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            mode: "fundamental-mode".to_string(),
            hard_newlines: false,
            auto_fill: false,
            tab_width: DEFAULT_TAB_WIDTH,
            fill: FillOptions::default(),
        }
    }
}

/// Editable text with per-character metadata, a cursor, markers and change
/// notification.
///
/// Offsets are character offsets. Mutators clamp out-of-range offsets
/// instead of panicking; use [`check_offset`](Self::check_offset) when a
/// caller wants an error instead.
#[derive(Clone, Debug, Default)]
pub struct Document {
    rope: RopeWrapper,
    props: Vec<CharProps>,
    cursor: usize,
    mark: Option<usize>,
    markers: Vec<Option<MarkerState>>,
    pending: Vec<EditRegion>,
    settings: DocumentSettings,
    revision: u64,
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document with initial text and default metadata.
    #[must_use]
    pub fn with_text(text: &str) -> Self {
        let rope = RopeWrapper::from_str(text);
        let props = vec![CharProps::default(); rope.len_chars()];
        Self {
            rope,
            props,
            ..Self::default()
        }
    }

    /// Set the editing mode (builder pattern).
    #[must_use]
    pub fn with_mode(mut self, mode: &str) -> Self {
        self.settings.mode = mode.to_string();
        self
    }

    /// Set fill options (builder pattern).
    #[must_use]
    pub fn with_fill(mut self, fill: FillOptions) -> Self {
        self.settings.fill = fill;
        self
    }

    /// Replace the whole text. Metadata resets, markers and cursor move to 0.
    pub fn set_text(&mut self, text: &str) {
        let old_len = self.len_chars();
        self.rope.replace(text);
        self.props = vec![CharProps::default(); self.rope.len_chars()];
        self.cursor = 0;
        self.mark = None;
        for marker in self.markers.iter_mut().flatten() {
            marker.pos = 0;
        }
        self.pending.clear();
        if old_len > 0 || !self.props.is_empty() {
            self.pending.push(EditRegion::new(0, self.props.len()));
        }
        self.bump_revision();
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    #[must_use]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    #[must_use]
    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rope.is_empty()
    }

    /// Content revision, bumped on every content change.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub fn rope(&self) -> &RopeWrapper {
        &self.rope
    }

    #[must_use]
    pub fn char_at(&self, offset: usize) -> Option<char> {
        self.rope.char_at(offset)
    }

    /// Text in `range` (clamped).
    #[must_use]
    pub fn slice(&self, range: Range<usize>) -> String {
        self.rope.slice(range).to_string()
    }

    /// Error unless `offset` is a valid position (`0..=len`).
    pub fn check_offset(&self, offset: usize) -> Result<()> {
        let len = self.len_chars();
        if offset > len {
            return Err(Error::OutOfBounds { offset, len });
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Metadata
    // ------------------------------------------------------------------

    #[must_use]
    pub fn props(&self, offset: usize) -> Option<&CharProps> {
        self.props.get(offset)
    }

    /// Attributes at `offset`; absent positions read as plain.
    #[must_use]
    pub fn attrs_at(&self, offset: usize) -> CharAttrs {
        self.props.get(offset).map_or(CharAttrs::NONE, |p| p.attrs)
    }

    #[must_use]
    pub fn is_break_at(&self, offset: usize) -> bool {
        self.char_at(offset).is_some_and(is_break)
    }

    /// Whether `offset` holds a hard break. False for anything else.
    #[must_use]
    pub fn is_hard(&self, offset: usize) -> bool {
        self.is_break_at(offset) && self.props.get(offset).is_some_and(|p| p.hard)
    }

    #[must_use]
    pub fn display_at(&self, offset: usize) -> Option<&RenderValue> {
        self.props.get(offset).and_then(|p| p.display.as_ref())
    }

    #[must_use]
    pub fn fill_space_at(&self, offset: usize) -> Option<&str> {
        self.props.get(offset).and_then(|p| p.fill_space.as_deref())
    }

    /// Classify the character at `offset`. Used by host insertion paths.
    pub fn set_hard(&mut self, offset: usize, hard: bool) {
        if let Some(props) = self.props.get_mut(offset) {
            props.hard = hard;
        }
    }

    /// Set or clear the display override at `offset`.
    pub fn set_display(&mut self, offset: usize, display: Option<RenderValue>) {
        if let Some(props) = self.props.get_mut(offset) {
            props.display = display;
        }
    }

    /// Set or clear the fill-space tag at `offset`.
    pub fn set_fill_space(&mut self, offset: usize, fill_space: Option<String>) {
        if let Some(props) = self.props.get_mut(offset) {
            props.fill_space = fill_space;
        }
    }

    /// Overwrite the attributes of every character in `range`.
    pub fn set_attrs(&mut self, range: Range<usize>, attrs: CharAttrs) {
        let end = range.end.min(self.props.len());
        let start = range.start.min(end);
        for props in &mut self.props[start..end] {
            props.attrs = attrs;
        }
    }

    /// Edit the attributes at `offset` in place.
    pub fn update_attrs(&mut self, offset: usize, f: impl FnOnce(&mut CharAttrs)) {
        if let Some(props) = self.props.get_mut(offset) {
            f(&mut props.attrs);
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// First break in `range`.
    #[must_use]
    pub fn find_break(&self, range: Range<usize>) -> Option<usize> {
        self.rope.find_char(range, BREAK)
    }

    /// All breaks in `range`, in document order.
    #[must_use]
    pub fn breaks(&self, range: Range<usize>) -> Vec<usize> {
        let end = range.end.min(self.len_chars());
        let mut pos = range.start.min(end);
        let mut found = Vec::new();
        while let Some(at) = self.find_break(pos..end) {
            found.push(at);
            pos = at + 1;
        }
        found
    }

    /// Offset of the start of the line containing `offset`.
    #[must_use]
    pub fn line_start(&self, offset: usize) -> usize {
        let line = self.rope.char_to_line(offset);
        self.rope.line_to_char(line)
    }

    /// Offset of the break ending the line containing `offset`, or the
    /// document end.
    #[must_use]
    pub fn line_end(&self, offset: usize) -> usize {
        let len = self.len_chars();
        self.find_break(offset.min(len)..len).unwrap_or(len)
    }

    /// Display column of `offset` within its line. Tabs advance to the next
    /// tab stop.
    #[must_use]
    pub fn column_at(&self, offset: usize) -> usize {
        let offset = offset.min(self.len_chars());
        let start = self.line_start(offset);
        let tab = usize::from(self.settings.tab_width.max(1));
        self.rope
            .slice(start..offset)
            .chars()
            .fold(0, |col, ch| match ch {
                '\t' => (col / tab + 1) * tab,
                _ => col + display_width_char(ch),
            })
    }

    // ------------------------------------------------------------------
    // Cursor, mark, markers
    // ------------------------------------------------------------------

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the cursor, clamping to the document.
    pub fn set_cursor(&mut self, offset: usize) {
        self.cursor = offset.min(self.len_chars());
    }

    #[must_use]
    pub fn mark(&self) -> Option<usize> {
        self.mark
    }

    pub fn set_mark(&mut self, mark: Option<usize>) {
        self.mark = mark.map(|m| m.min(self.len_chars()));
    }

    /// Create a marker. An advancing marker moves past text inserted at its
    /// position; a plain one stays before it.
    pub fn create_marker(&mut self, pos: usize, advances: bool) -> MarkerId {
        let state = MarkerState {
            pos: pos.min(self.len_chars()),
            advances,
        };
        if let Some(idx) = self.markers.iter().position(Option::is_none) {
            self.markers[idx] = Some(state);
            MarkerId(idx)
        } else {
            self.markers.push(Some(state));
            MarkerId(self.markers.len() - 1)
        }
    }

    #[must_use]
    pub fn marker_position(&self, id: MarkerId) -> Option<usize> {
        self.markers.get(id.0).copied().flatten().map(|m| m.pos)
    }

    pub fn remove_marker(&mut self, id: MarkerId) {
        if let Some(slot) = self.markers.get_mut(id.0) {
            *slot = None;
        }
    }

    /// Save cursor and mark; they are restored when the guard drops.
    pub fn save_excursion(&mut self) -> Excursion<'_> {
        Excursion::new(self)
    }

    // ------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------

    #[must_use]
    pub fn mode(&self) -> &str {
        &self.settings.mode
    }

    pub fn set_mode(&mut self, mode: &str) {
        self.settings.mode = mode.to_string();
    }

    #[must_use]
    pub fn settings(&self) -> &DocumentSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut DocumentSettings {
        &mut self.settings
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Insert at the cursor with plain metadata; the cursor moves past it.
    pub fn insert(&mut self, text: &str) {
        let at = self.cursor;
        self.splice_insert(at, text, &CharProps::default(), Insertion::AtCursor);
    }

    /// Insert at `offset` with plain metadata.
    pub fn insert_at(&mut self, offset: usize, text: &str) {
        self.splice_insert(offset, text, &CharProps::default(), Insertion::Plain);
    }

    /// Insert at `offset`; every new character gets a copy of `props`.
    pub fn insert_with_props(&mut self, offset: usize, text: &str, props: &CharProps) {
        self.splice_insert(offset, text, props, Insertion::Plain);
    }

    /// Insert at `offset`, inheriting attributes from the neighbouring text.
    pub fn insert_and_inherit_at(&mut self, offset: usize, text: &str) {
        let props = CharProps::inherit(self.inherited_attrs(offset));
        self.splice_insert(offset, text, &props, Insertion::Plain);
    }

    /// Insert at `offset`, inheriting attributes, and move every marker
    /// (and the cursor) sitting exactly at `offset` past the new text.
    pub fn insert_before_markers_and_inherit(&mut self, offset: usize, text: &str) {
        let props = CharProps::inherit(self.inherited_attrs(offset));
        self.splice_insert(offset, text, &props, Insertion::BeforeMarkers);
    }

    /// Insert at `offset` with a copy of `props` per character, moving every
    /// marker (and the cursor) sitting exactly at `offset` past the new text.
    pub fn insert_before_markers_with_props(
        &mut self,
        offset: usize,
        text: &str,
        props: &CharProps,
    ) {
        self.splice_insert(offset, text, props, Insertion::BeforeMarkers);
    }

    /// Insert a hard break at the cursor. This is the host's
    /// "preserve newline" path and the only place breaks become hard.
    pub fn insert_hard_break(&mut self) {
        let at = self.cursor;
        let props = CharProps::hard_break(self.inherited_attrs(at));
        self.splice_insert(at, "\n", &props, Insertion::AtCursor);
    }

    /// Remove `range` and return the removed text.
    pub fn remove(&mut self, range: Range<usize>) -> String {
        let len = self.len_chars();
        let end = range.end.min(len);
        let start = range.start.min(end);
        if start == end {
            return String::new();
        }
        let removed = self.slice(start..end);
        self.rope.remove(start..end);
        self.props.drain(start..end);

        let map = |pos: usize| {
            if pos <= start {
                pos
            } else if pos >= end {
                pos - (end - start)
            } else {
                start
            }
        };
        self.cursor = map(self.cursor);
        self.mark = self.mark.map(map);
        for marker in self.markers.iter_mut().flatten() {
            marker.pos = map(marker.pos);
        }
        for region in &mut self.pending {
            *region = region.after_remove(start..end);
        }
        self.pending.push(EditRegion::new(start, start));
        self.bump_revision();
        removed
    }

    /// Drain queued change notifications, oldest first.
    pub fn take_changes(&mut self) -> Vec<EditRegion> {
        std::mem::take(&mut self.pending)
    }

    #[must_use]
    pub fn has_pending_changes(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Attributes new text at `offset` inherits: the preceding character's,
    /// or the following one's at the document start.
    fn inherited_attrs(&self, offset: usize) -> CharAttrs {
        let offset = offset.min(self.len_chars());
        let attrs = if offset > 0 {
            self.attrs_at(offset - 1)
        } else {
            self.attrs_at(0)
        };
        attrs.inheritable()
    }

    fn splice_insert(&mut self, offset: usize, text: &str, props: &CharProps, how: Insertion) {
        let at = offset.min(self.len_chars());
        let n = text.chars().count();
        if n == 0 {
            return;
        }
        self.rope.insert(at, text);
        self.props
            .splice(at..at, std::iter::repeat_n(props.clone(), n));

        let moves_at_offset = !matches!(how, Insertion::Plain);
        if self.cursor > at || (self.cursor == at && moves_at_offset) {
            self.cursor += n;
        }
        if let Some(mark) = self.mark.as_mut() {
            if *mark > at || (*mark == at && how == Insertion::BeforeMarkers) {
                *mark += n;
            }
        }
        for marker in self.markers.iter_mut().flatten() {
            if marker.pos > at
                || (marker.pos == at && (marker.advances || how == Insertion::BeforeMarkers))
            {
                marker.pos += n;
            }
        }
        for region in &mut self.pending {
            *region = region.after_insert(at, n);
        }
        self.pending.push(EditRegion::new(at, at + n));
        self.bump_revision();
    }

    fn bump_revision(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Insertion {
    /// Cursor stays before text inserted at its position.
    Plain,
    /// Cursor moves past the text.
    AtCursor,
    /// Cursor, mark and all markers at the offset move past the text.
    BeforeMarkers,
}

/// Scoped guard restoring cursor and mark on drop.
///
/// The saved positions are held as markers, so content edits made inside
/// the scope shift them like any other position.
pub struct Excursion<'a> {
    doc: &'a mut Document,
    cursor: MarkerId,
    mark: Option<MarkerId>,
}

impl<'a> Excursion<'a> {
    fn new(doc: &'a mut Document) -> Self {
        let cursor = doc.create_marker(doc.cursor, false);
        let mark = doc.mark.map(|m| doc.create_marker(m, false));
        Self { doc, cursor, mark }
    }
}

impl Deref for Excursion<'_> {
    type Target = Document;

    fn deref(&self) -> &Document {
        self.doc
    }
}

impl DerefMut for Excursion<'_> {
    fn deref_mut(&mut self) -> &mut Document {
        self.doc
    }
}

impl Drop for Excursion<'_> {
    fn drop(&mut self) {
        if let Some(pos) = self.doc.marker_position(self.cursor) {
            self.doc.set_cursor(pos);
        }
        self.doc.remove_marker(self.cursor);
        let mark = self.mark.and_then(|id| {
            let pos = self.doc.marker_position(id);
            self.doc.remove_marker(id);
            pos
        });
        self.doc.set_mark(mark);
    }
}
