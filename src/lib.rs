//! `flowtext` - hard and soft line breaks for editable text
//!
//! Keeps the RFC 2646 "format=flowed" distinction visible while a document
//! is edited: hard breaks get a marker glyph that is re-derived after every
//! edit, and line wrapping in selected modes inserts soft breaks as a
//! trailing space plus newline so they can be collapsed again later.
//!
//! # Examples
//!
//! ```
//! use flowtext::{Document, FlowedBuffer, ModeSet, ModeSource};
//!
//! let doc = Document::with_text("word1 word2").with_mode("text-mode");
//! let mut buf = FlowedBuffer::new(doc);
//! buf.enable_hard_newlines();
//! buf.enable_reflow(ModeSource::Fixed(ModeSet::parse("text-mode").unwrap()));
//!
//! buf.set_cursor(6);
//! buf.insert_break();
//! assert_eq!(buf.document().text(), "word1 \nword2");
//! ```

// Crate-level lint configuration
#![forbid(unsafe_code)]
#![allow(clippy::module_name_repetitions)] // Allow flowed::FlowedBuffer etc
#![allow(clippy::missing_errors_doc)] // Docs WIP
#![allow(clippy::missing_panics_doc)] // Docs WIP
#![allow(clippy::missing_const_for_fn)] // Many functions could be const, not critical
#![allow(clippy::doc_markdown)] // Allow technical names without backticks
#![allow(clippy::use_self)] // Allow explicit type names in impl blocks
#![allow(clippy::needless_pass_by_value)] // Allow pass by value for small Copy types
#![allow(clippy::branches_sharing_code)] // Code clarity over DRY in branching
#![allow(clippy::inherent_to_string)] // to_string methods are convenient
#![allow(clippy::should_implement_trait)] // from_str naming is intentional
#![allow(clippy::collapsible_if)] // Sometimes nested ifs are clearer
#![allow(clippy::items_after_statements)] // Common pattern in tests
#![allow(clippy::redundant_clone)] // Clones in tests for clarity are fine
#![allow(clippy::semicolon_if_nothing_returned)] // Style preference

pub mod config;
pub mod error;
pub mod flowed;
pub mod render;
pub mod text;
pub mod unicode;

// Re-export core types at crate root
pub use config::{
    DEFAULT_FILL_COLUMN, FillOptions, ModeSet, REFLOW_MODES_ENV, is_reflow_mode, reflow_modes,
    set_reflow_modes,
};
pub use error::{Error, Result};
pub use flowed::{
    AnnotateStats, BreakStrategy, ChangeTracker, FlowedBuffer, ModeDispatcher, ModeSource,
    NewlineAnnotator, PlainBreaker, ReflowEngine, fill_region, unflow_region,
};
pub use render::{RedrawDiff, Redisplay, render_text};
pub use text::{CharAttrs, CharFlags, CharProps, Document, EditRegion, RenderValue};
pub use unicode::{SpacingPolicy, WideCharSpacing, WidthMethod};
