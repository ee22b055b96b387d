//! Generic paragraph fill and its inverse.
//!
//! Fill joins the soft breaks of a region back into running text and then
//! breaks each line greedily at the last whitespace run that keeps it within
//! the fill column. Where the break goes is decided here; how it is inserted
//! is up to the [`BreakStrategy`], which is where the flowed and plain
//! breakers differ. Hard breaks are paragraph boundaries and are never
//! joined.

use crate::flowed::breaker::{BreakStrategy, leading_hspace_end, trailing_hspace_start};
use crate::text::{CharFlags, Document, is_break, is_hspace};
use std::ops::Range;
use tracing::debug;

/// Join every soft break in `range` with the line that follows it.
///
/// A flowed break (one preceded by a space) collapses into its recorded
/// `fill_space` when it has one, otherwise into the space already in front
/// of it. A plain soft break becomes a single space. The following line's
/// indentation and fill prefix are dropped. Breaks that border an empty
/// line separate paragraphs and are kept. Returns the number of breaks
/// joined.
pub fn unflow_region(doc: &mut Document, range: Range<usize>) -> usize {
    let mut joined = 0;
    for brk in doc.breaks(range).into_iter().rev() {
        if !doc.is_hard(brk) && join_break(doc, brk) {
            joined += 1;
        }
    }
    if joined > 0 {
        debug!(joined, "unflowed region");
    }
    joined
}

fn join_break(doc: &mut Document, brk: usize) -> bool {
    if doc.line_start(brk) == brk {
        return false;
    }
    let next = content_start(doc, brk + 1);
    if doc.char_at(next).is_none_or(is_break) {
        return false;
    }

    let flowed = brk > 0 && doc.char_at(brk - 1) == Some(' ');
    match doc.fill_space_at(brk).map(str::to_owned) {
        Some(space) if flowed => {
            doc.remove(brk - 1..next);
            doc.insert_and_inherit_at(brk - 1, &space);
        }
        _ if flowed => {
            doc.remove(brk..next);
        }
        _ => {
            doc.remove(brk..next);
            doc.insert_and_inherit_at(brk, " ");
        }
    }
    true
}

/// First offset of a line's content: past its indentation and any
/// fill-prefix characters, never past the line's own break.
fn content_start(doc: &Document, line_start: usize) -> usize {
    let mut pos = line_start;
    while let Some(ch) = doc.char_at(pos) {
        let prefix = doc.attrs_at(pos).flags.contains(CharFlags::FILL_PREFIX);
        if is_break(ch) || !(is_hspace(ch) || prefix) {
            break;
        }
        pos += 1;
    }
    pos
}

/// Where to break a line whose content spans `[content, limit)`.
///
/// Candidates are starts of whitespace runs with text after them. The last
/// one at or before the fill column wins; a line whose first word is
/// already too long breaks after that word.
fn break_candidate(doc: &Document, content: usize, limit: usize) -> Option<usize> {
    let fill_column = doc.settings().fill.fill_column;
    let mut first = None;
    let mut best = None;
    let mut pos = content;
    while pos < limit {
        if doc.char_at(pos).is_some_and(is_hspace) {
            let run_end = leading_hspace_end(doc, pos);
            if run_end >= limit {
                break;
            }
            first.get_or_insert(pos);
            if doc.column_at(pos) <= fill_column {
                best = Some(pos);
            } else {
                break;
            }
            pos = run_end;
        } else {
            pos += 1;
        }
    }
    best.or(first)
}

/// Fill every line touching `range`, breaking with `strategy`.
///
/// Soft breaks in the range are joined first, so refilling already-filled
/// text is stable. The cursor and mark are restored afterwards. Returns the
/// number of breaks inserted.
pub fn fill_region(doc: &mut Document, range: Range<usize>, strategy: &dyn BreakStrategy) -> usize {
    let mut doc = doc.save_excursion();
    let end_marker = doc.create_marker(range.end, false);
    let start = doc.line_start(range.start.min(doc.len_chars()));
    let end = doc.marker_position(end_marker).unwrap_or(start);
    unflow_region(&mut doc, start..end);

    let fill_column = doc.settings().fill.fill_column;
    let mut inserted = 0;
    let mut pos = start;
    loop {
        let end = doc.marker_position(end_marker).unwrap_or(pos);
        let line_end = doc.line_end(pos);
        let content = content_start(&doc, pos);
        let text_end = trailing_hspace_start(&doc, line_end).max(content);

        let candidate = if doc.column_at(text_end) > fill_column {
            break_candidate(&doc, content, line_end)
        } else {
            None
        };
        match candidate {
            Some(run) => {
                let run_end = leading_hspace_end(&doc, run);
                doc.set_cursor(run_end);
                pos = strategy.insert_break(&mut doc) + 1;
                inserted += 1;
            }
            None if line_end >= end || line_end >= doc.len_chars() => break,
            None => pos = line_end + 1,
        }
    }

    doc.remove_marker(end_marker);
    debug!(start, inserted, fill_column, "filled region");
    inserted
}

/// Bounds of the paragraph containing `offset`: the run of non-empty lines
/// joined by soft breaks. The range ends before the terminating break.
#[must_use]
pub fn paragraph_bounds(doc: &Document, offset: usize) -> Range<usize> {
    let offset = offset.min(doc.len_chars());
    let mut start = doc.line_start(offset);
    let mut end = doc.line_end(offset);
    if start == end {
        return start..end;
    }
    while start > 0 {
        let brk = start - 1;
        let prev = doc.line_start(brk);
        if doc.is_hard(brk) || prev == brk {
            break;
        }
        start = prev;
    }
    while end < doc.len_chars() && !doc.is_hard(end) {
        let next_end = doc.line_end(end + 1);
        if next_end == end + 1 {
            break;
        }
        end = next_end;
    }
    start..end
}

/// Fill the paragraph around the cursor.
pub fn fill_paragraph(doc: &mut Document, strategy: &dyn BreakStrategy) -> usize {
    let bounds = paragraph_bounds(doc, doc.cursor());
    fill_region(doc, bounds, strategy)
}

/// Break the cursor's line while text before the cursor runs past the fill
/// column. Called after typing. Returns the offset of the last break
/// inserted, if any. The cursor stays after the typed text.
pub fn auto_fill(doc: &mut Document, strategy: &dyn BreakStrategy) -> Option<usize> {
    let fill_column = doc.settings().fill.fill_column;
    let mut last = None;
    let typed = doc.create_marker(doc.cursor(), false);
    while let Some(cursor) = doc.marker_position(typed) {
        if doc.column_at(cursor) <= fill_column {
            break;
        }
        let content = content_start(doc, doc.line_start(cursor));
        let Some(run) = break_candidate(doc, content, cursor) else {
            break;
        };
        doc.set_cursor(leading_hspace_end(doc, run));
        last = Some(strategy.insert_break(doc));
    }
    if let Some(pos) = doc.marker_position(typed) {
        doc.set_cursor(pos);
    }
    doc.remove_marker(typed);
    if let Some(at) = last {
        debug!(at, fill_column, "auto-filled line");
    }
    last
}
