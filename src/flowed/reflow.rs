//! Flowed soft breaks: a trailing space followed by a newline.
//!
//! A break inserted here degrades gracefully. Readers that understand
//! format=flowed see the trailing space and rejoin the lines; everyone else
//! still sees correctly wrapped text. Where a plain space would be wrong on
//! rejoin (scripts written without interword spaces), the break records the
//! whitespace it replaced in `fill_space` so [`unflow`](super::unflow_region)
//! can put back exactly that.

use crate::flowed::breaker::{BreakStrategy, finish_line, replaced_attrs, trailing_hspace_start};
use crate::text::{CharFlags, CharProps, Document, is_break, is_hspace};
use crate::unicode::{SpacingPolicy, WideCharSpacing};
use tracing::debug;

/// Inserts soft breaks as `" \n"`, never hard ones.
pub struct ReflowEngine {
    spacing: Box<dyn SpacingPolicy>,
}

impl Default for ReflowEngine {
    fn default() -> Self {
        Self {
            spacing: Box::new(WideCharSpacing::new()),
        }
    }
}

impl std::fmt::Debug for ReflowEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReflowEngine").finish_non_exhaustive()
    }
}

impl ReflowEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different interword-spacing test.
    #[must_use]
    pub fn with_spacing(spacing: impl SpacingPolicy + 'static) -> Self {
        Self {
            spacing: Box::new(spacing),
        }
    }

    /// Break the line at the cursor. Returns the offset of the new break.
    ///
    /// The horizontal whitespace before the cursor is replaced by one space
    /// and a break carrying that whitespace's attributes. The new line is
    /// then indented to its left margin and given the fill prefix.
    pub fn insert_break(&self, doc: &mut Document) -> usize {
        let point = doc.cursor();
        let ws_start = trailing_hspace_start(doc, point);
        let attrs = replaced_attrs(doc, ws_start, point);
        let replaced = doc.slice(ws_start..point);

        doc.insert_before_markers_with_props(point, " \n", &CharProps::inherit(attrs));
        doc.remove(ws_start..point);
        let brk = ws_start + 1;

        if self.rejoins_without_space(doc, brk) {
            doc.set_fill_space(brk, Some(replaced.clone()));
        }
        if doc.settings().fill.nobreak_invisible {
            doc.update_attrs(brk, |a| a.flags.remove(CharFlags::INVISIBLE));
        }
        finish_line(doc, brk);

        debug!(
            at = brk,
            replaced = replaced.len(),
            fill_space = doc.fill_space_at(brk).is_some(),
            "flowed break"
        );
        brk
    }

    /// Whether a later unflow must not assume a single space at `brk`.
    ///
    /// True when whitespace follows the break and the character after it,
    /// or the one before the break, joins without a space; or when the
    /// character right after the break does.
    fn rejoins_without_space(&self, doc: &Document, brk: usize) -> bool {
        let before = brk.checked_sub(2).and_then(|i| doc.char_at(i));
        let after = brk + 1;
        match doc.char_at(after) {
            Some(ch) if is_hspace(ch) => {
                let mut end = after;
                while doc.char_at(end).is_some_and(is_hspace) {
                    end += 1;
                }
                self.joins_without_space(before) || self.joins_without_space(doc.char_at(end))
            }
            next => self.joins_without_space(next),
        }
    }

    fn joins_without_space(&self, ch: Option<char>) -> bool {
        ch.is_some_and(|c| {
            !is_hspace(c) && !is_break(c) && !self.spacing.requires_interword_space(c)
        })
    }
}

impl BreakStrategy for ReflowEngine {
    fn insert_break(&self, doc: &mut Document) -> usize {
        Self::insert_break(self, doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FillOptions;
    use crate::text::CharAttrs;

    #[test]
    fn test_latin_break() {
        let mut doc = Document::with_text("word1 word2");
        doc.set_cursor(6);
        let brk = ReflowEngine::new().insert_break(&mut doc);
        assert_eq!(doc.text(), "word1 \nword2");
        assert_eq!(brk, 6);
        assert!(!doc.is_hard(6));
        assert_eq!(doc.fill_space_at(6), None);
        assert_eq!(doc.cursor(), 7);
    }

    #[test]
    fn test_no_whitespace_inserts_space_and_break() {
        let mut doc = Document::with_text("abcdef");
        doc.set_cursor(3);
        let brk = ReflowEngine::new().insert_break(&mut doc);
        assert_eq!(doc.text(), "abc \ndef");
        assert_eq!(brk, 4);
        assert_eq!(doc.len_chars(), 8);
    }

    #[test]
    fn test_document_edges() {
        let engine = ReflowEngine::new();
        let mut doc = Document::new();
        assert_eq!(engine.insert_break(&mut doc), 1);
        assert_eq!(doc.text(), " \n");

        let mut doc = Document::with_text("end  ");
        doc.set_cursor(5);
        assert_eq!(engine.insert_break(&mut doc), 4);
        assert_eq!(doc.text(), "end \n");
    }

    #[test]
    fn test_attributes_copied_from_whitespace() {
        let mut doc = Document::with_text("abc   def");
        let attrs = CharAttrs::invisible().with_left_margin(2);
        doc.set_attrs(3..6, attrs);
        doc.set_cursor(6);
        let brk = ReflowEngine::new().insert_break(&mut doc);
        assert_eq!(doc.text(), "abc \n  def");
        assert_eq!(doc.attrs_at(brk), attrs);
        assert_eq!(doc.attrs_at(brk - 1), attrs);
    }

    #[test]
    fn test_nobreak_invisible_strips_invisibility() {
        let fill = FillOptions::new().nobreak_invisible(true);
        let mut doc = Document::with_text("abc def").with_fill(fill);
        doc.set_attrs(3..4, CharAttrs::invisible());
        doc.set_cursor(4);
        let brk = ReflowEngine::new().insert_break(&mut doc);
        assert!(!doc.attrs_at(brk).is_invisible());
        assert!(doc.attrs_at(brk - 1).is_invisible());
    }

    #[test]
    fn test_wide_script_tags_fill_space() {
        let mut doc = Document::with_text("漢字かな");
        doc.set_cursor(2);
        let brk = ReflowEngine::new().insert_break(&mut doc);
        assert_eq!(doc.text(), "漢字 \nかな");
        assert_eq!(doc.fill_space_at(brk), Some(""));

        let mut doc = Document::with_text("漢字 かな");
        doc.set_cursor(3);
        let brk = ReflowEngine::new().insert_break(&mut doc);
        assert_eq!(doc.fill_space_at(brk), Some(" "));
    }

    #[test]
    fn test_following_whitespace_checks_both_neighbours() {
        let engine = ReflowEngine::new();

        // Whitespace after the break, wide character before it.
        let mut doc = Document::with_text("漢\t  b");
        doc.set_cursor(2);
        let brk = engine.insert_break(&mut doc);
        assert_eq!(doc.fill_space_at(brk), Some("\t"));
        assert_eq!(doc.text(), "漢 \nb");

        // Whitespace after the break, Latin on both sides.
        let mut doc = Document::with_text("a\t  b");
        doc.set_cursor(2);
        let brk = engine.insert_break(&mut doc);
        assert_eq!(doc.fill_space_at(brk), None);
    }

    #[test]
    fn test_custom_spacing_policy() {
        let engine = ReflowEngine::with_spacing(|ch: char| ch != 'x');
        let mut doc = Document::with_text("ab xy");
        doc.set_cursor(3);
        let brk = engine.insert_break(&mut doc);
        assert_eq!(doc.fill_space_at(brk), Some(" "));
    }

    #[test]
    fn test_fill_prefix_after_break() {
        let fill = FillOptions::new().fill_prefix("> ");
        let mut doc = Document::with_text("> one two").with_fill(fill);
        doc.set_cursor(6);
        ReflowEngine::new().insert_break(&mut doc);
        assert_eq!(doc.text(), "> one \n> two");
        assert_eq!(doc.cursor(), 9);
    }
}
