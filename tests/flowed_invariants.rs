//! Property-based tests for break annotation and reflow.
//!
//! Uses proptest to check the invariants that must hold for any document
//! and any sequence of edits.

use flowtext::{
    Document, FillOptions, FlowedBuffer, NewlineAnnotator, ReflowEngine, fill_region,
    unflow_region,
};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

/// Short texts over an alphabet rich in breaks and whitespace.
fn break_text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec!['a', 'b', ' ', '\t', '\n', '\n', '漢', 'か']),
        0..40,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

/// Single-spaced prose: words of Latin and wide characters.
fn prose() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z漢字か]{1,8}", 1..12).prop_map(|words| words.join(" "))
}

#[derive(Clone, Debug)]
enum Edit {
    Type(String),
    Newline,
    DeleteBackward(usize),
    Move(usize),
    DeleteRange(usize, usize),
}

fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        "[a-c \n]{1,5}".prop_map(Edit::Type),
        Just(Edit::Newline),
        (1usize..4).prop_map(Edit::DeleteBackward),
        (0usize..60).prop_map(Edit::Move),
        (0usize..60, 0usize..10).prop_map(|(s, n)| Edit::DeleteRange(s, s + n)),
    ]
}

/// Document with every `flags[i]` break (cycled) marked hard.
fn document(text: &str, flags: &[bool]) -> Document {
    let mut doc = Document::with_text(text);
    let breaks = doc.breaks(0..doc.len_chars());
    for (i, at) in breaks.into_iter().enumerate() {
        if flags.is_empty() {
            break;
        }
        doc.set_hard(at, flags[i % flags.len()]);
    }
    doc
}

fn override_map(doc: &Document) -> Vec<bool> {
    (0..doc.len_chars())
        .map(|i| doc.display_at(i).is_some())
        .collect()
}

fn assert_markers_consistent(doc: &Document) -> Result<(), TestCaseError> {
    for at in doc.breaks(0..doc.len_chars()) {
        prop_assert_eq!(doc.display_at(at).is_some(), doc.is_hard(at), "break at {}", at);
    }
    Ok(())
}

// ============================================================================
// Annotation Properties
// ============================================================================

proptest! {
    /// Annotating the same region twice yields the same override presence.
    #[test]
    fn annotate_is_idempotent(
        text in break_text(),
        flags in prop::collection::vec(any::<bool>(), 0..8),
        b in 0usize..45,
        e in 0usize..45,
    ) {
        let mut doc = document(&text, &flags);
        let annotator = NewlineAnnotator::new();
        annotator.annotate(&mut doc, b, e);
        let first = override_map(&doc);
        annotator.annotate(&mut doc, b, e);
        prop_assert_eq!(first, override_map(&doc));
    }

    /// After a covering annotation every break has an override iff hard.
    #[test]
    fn annotate_establishes_marker_invariant(
        text in break_text(),
        flags in prop::collection::vec(any::<bool>(), 1..8),
    ) {
        let mut doc = document(&text, &flags);
        let len = doc.len_chars();
        NewlineAnnotator::new().annotate(&mut doc, 0, len);
        assert_markers_consistent(&doc)?;
    }

    /// An empty region mutates nothing.
    #[test]
    fn annotate_empty_region_is_noop(
        text in break_text(),
        flags in prop::collection::vec(any::<bool>(), 1..8),
        at in 0usize..45,
    ) {
        let mut doc = document(&text, &flags);
        let before: Vec<_> = (0..doc.len_chars()).map(|i| doc.props(i).cloned()).collect();
        NewlineAnnotator::new().annotate(&mut doc, at, at);
        let after: Vec<_> = (0..doc.len_chars()).map(|i| doc.props(i).cloned()).collect();
        prop_assert_eq!(before, after);
    }

    /// Markers stay consistent through arbitrary editing sessions.
    #[test]
    fn tracked_edits_keep_markers_consistent(
        text in break_text(),
        edits in prop::collection::vec(edit(), 0..20),
    ) {
        let mut buf = FlowedBuffer::new(Document::with_text(&text));
        buf.enable_hard_newlines();
        for edit in edits {
            match edit {
                Edit::Type(s) => buf.insert(&s),
                Edit::Newline => buf.newline(),
                Edit::DeleteBackward(n) => {
                    buf.delete_backward(n);
                }
                Edit::Move(to) => buf.set_cursor(to),
                Edit::DeleteRange(s, e) => {
                    buf.delete_range(s..e);
                }
            }
            assert_markers_consistent(buf.document())?;
        }
    }
}

// ============================================================================
// Reflow Properties
// ============================================================================

proptest! {
    /// Reflow breaks are soft, follow one space, and consume the whitespace
    /// run in front of the cursor.
    #[test]
    fn reflow_break_is_soft_and_consumes_whitespace(
        text in break_text(),
        cursor in 0usize..45,
    ) {
        let mut doc = Document::with_text(&text);
        doc.set_cursor(cursor);
        let brk = ReflowEngine::new().insert_break(&mut doc);
        prop_assert_eq!(doc.char_at(brk), Some('\n'));
        prop_assert!(!doc.is_hard(brk));
        prop_assert_eq!(doc.char_at(brk - 1), Some(' '));
        if brk >= 2 {
            let prior = doc.char_at(brk - 2);
            prop_assert!(prior != Some(' ') && prior != Some('\t'));
        }
    }

    /// Filling prose with flowed breaks and unflowing it restores the text.
    #[test]
    fn fill_then_unflow_round_trips(text in prose(), column in 1usize..30) {
        let fill = FillOptions::new().fill_column(column).unwrap();
        let mut doc = Document::with_text(&text).with_fill(fill);
        let len = doc.len_chars();
        fill_region(&mut doc, 0..len, &ReflowEngine::new());
        for at in doc.breaks(0..doc.len_chars()) {
            prop_assert!(!doc.is_hard(at));
        }
        let len = doc.len_chars();
        unflow_region(&mut doc, 0..len);
        prop_assert_eq!(doc.text(), text);
    }
}

#[test]
fn reflow_without_whitespace_adds_two_chars() {
    let mut doc = Document::with_text("abcdef");
    doc.set_cursor(3);
    ReflowEngine::new().insert_break(&mut doc);
    assert_eq!(doc.len_chars(), 8);
    assert_eq!(doc.text(), "abc \ndef");
}
