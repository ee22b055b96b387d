//! Break-insertion strategies and the line-finishing steps they share.

use crate::text::{CharAttrs, CharFlags, CharProps, Document, is_hspace};
use tracing::trace;

/// Breaks the current line at the cursor.
///
/// The wrapping algorithm decides where a line breaks, moves the cursor
/// there, and asks a strategy to do the insertion. Implementations return
/// the offset of the inserted break and leave the cursor at the start of the
/// new line's content.
pub trait BreakStrategy {
    fn insert_break(&self, doc: &mut Document) -> usize;
}

impl<F> BreakStrategy for F
where
    F: Fn(&mut Document) -> usize,
{
    fn insert_break(&self, doc: &mut Document) -> usize {
        self(doc)
    }
}

/// The generic break: trailing whitespace becomes a bare newline.
///
/// This is the routine the mode dispatcher falls back to outside the
/// reflow modes.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainBreaker;

impl BreakStrategy for PlainBreaker {
    fn insert_break(&self, doc: &mut Document) -> usize {
        let point = doc.cursor();
        let ws_start = trailing_hspace_start(doc, point);
        let attrs = replaced_attrs(doc, ws_start, point);
        doc.insert_before_markers_with_props(point, "\n", &CharProps::inherit(attrs));
        doc.remove(ws_start..point);
        finish_line(doc, ws_start);
        trace!(at = ws_start, "plain break");
        ws_start
    }
}

/// Start of the run of horizontal whitespace ending at `pos`.
pub(crate) fn trailing_hspace_start(doc: &Document, pos: usize) -> usize {
    let mut start = pos.min(doc.len_chars());
    while start > 0 && doc.char_at(start - 1).is_some_and(is_hspace) {
        start -= 1;
    }
    start
}

/// End of the run of horizontal whitespace starting at `pos`.
pub(crate) fn leading_hspace_end(doc: &Document, pos: usize) -> usize {
    let mut end = pos;
    while doc.char_at(end).is_some_and(is_hspace) {
        end += 1;
    }
    end
}

/// Attributes a break inherits when it replaces `[ws_start, point)`.
///
/// The replaced whitespace wins; with nothing replaced, the character after
/// the cursor, then the one before it.
pub(crate) fn replaced_attrs(doc: &Document, ws_start: usize, point: usize) -> CharAttrs {
    let attrs = if ws_start < point {
        doc.attrs_at(ws_start)
    } else if point < doc.len_chars() {
        doc.attrs_at(point)
    } else if point > 0 {
        doc.attrs_at(point - 1)
    } else {
        CharAttrs::NONE
    };
    attrs.inheritable()
}

/// Indent the line opened by the break at `brk` to its left margin and
/// insert the fill prefix after the indentation. Leaves the cursor at the
/// start of the line's content and returns that offset.
///
/// Indentation and prefix go in before any marker sitting at the line
/// start, so markers that followed the replaced whitespace end up in front
/// of the content rather than stuck before the prefix.
pub(crate) fn finish_line(doc: &mut Document, brk: usize) -> usize {
    let line_start = brk + 1;
    let margin = doc
        .attrs_at(brk)
        .left_margin
        .unwrap_or(doc.settings().fill.left_margin);
    indent_line_to(doc, line_start, usize::from(margin));

    let mut content = line_start + usize::from(margin);
    if let Some(prefix) = doc.settings().fill.active_prefix().map(str::to_owned) {
        let n = prefix.chars().count();
        doc.insert_before_markers_and_inherit(content, &prefix);
        for offset in content..content + n {
            doc.update_attrs(offset, |a| *a = a.with_flags(CharFlags::FILL_PREFIX));
        }
        content += n;
    }
    doc.set_cursor(content);
    content
}

/// Replace the leading whitespace of the line at `line_start` with
/// `column` spaces.
fn indent_line_to(doc: &mut Document, line_start: usize, column: usize) {
    let end = leading_hspace_end(doc, line_start);
    if end - line_start == column && doc.slice(line_start..end).chars().all(|c| c == ' ') {
        return;
    }
    doc.remove(line_start..end);
    if column > 0 {
        doc.insert_before_markers_and_inherit(line_start, &" ".repeat(column));
    }
}
