//! Document storage: rope text with per-character metadata.
//!
//! Key types:
//!
//! - [`Document`]: editable text, cursor, markers and change queue
//! - [`CharProps`]: the metadata record kept for every character
//! - [`RenderValue`]: an identity-compared display override
//!
//! # Examples
//!
//! ```
//! use flowtext::Document;
//!
//! let mut doc = Document::with_text("Hello");
//! doc.set_cursor(5);
//! doc.insert_hard_break();
//! assert!(doc.is_hard(5));
//! assert_eq!(doc.take_changes().len(), 1);
//! ```

mod document;
mod props;
mod rope;

pub use document::{
    BREAK, DEFAULT_TAB_WIDTH, Document, DocumentSettings, EditRegion, Excursion, MarkerId,
    is_break, is_hspace,
};
pub use props::{CharAttrs, CharFlags, CharProps, RenderValue};
pub use rope::RopeWrapper;
