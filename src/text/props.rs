//! Per-character metadata carried alongside document text.

use bitflags::bitflags;
use std::fmt;
use std::sync::Arc;

bitflags! {
    /// Inherited character attributes that travel with text through edits.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
    pub struct CharFlags: u8 {
        /// Hidden from rendering.
        const INVISIBLE   = 0x01;
        /// Part of a fill prefix inserted by a wrap.
        const FILL_PREFIX = 0x02;
    }
}

/// Attributes a character inherits from its surroundings.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct CharAttrs {
    pub flags: CharFlags,
    /// Left-margin indentation column for lines started at this character.
    pub left_margin: Option<u16>,
}

impl CharAttrs {
    /// Plain attributes (visible, no margin).
    pub const NONE: Self = Self {
        flags: CharFlags::empty(),
        left_margin: None,
    };

    #[must_use]
    pub fn invisible() -> Self {
        Self {
            flags: CharFlags::INVISIBLE,
            left_margin: None,
        }
    }

    #[must_use]
    pub fn with_left_margin(mut self, column: u16) -> Self {
        self.left_margin = Some(column);
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: CharFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// The attributes new text copies from a neighbour. Fill-prefix
    /// membership belongs to the prefix characters alone.
    #[must_use]
    pub fn inheritable(mut self) -> Self {
        self.flags.remove(CharFlags::FILL_PREFIX);
        self
    }

    #[must_use]
    pub fn is_invisible(self) -> bool {
        self.flags.contains(CharFlags::INVISIBLE)
    }
}

/// What to draw in place of a raw character.
///
/// Each value is its own allocation. Equality is identity: two values built
/// from the same text compare unequal, so a renderer comparing old and new
/// values always sees a re-annotation as a change and redraws the glyph.
#[derive(Clone)]
pub struct RenderValue {
    text: Arc<str>,
}

impl RenderValue {
    /// Allocate a new render value.
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            text: Arc::from(text),
        }
    }

    /// Marker glyph followed by the break it decorates.
    #[must_use]
    pub fn marked_break(marker: char) -> Self {
        let mut text = String::with_capacity(marker.len_utf8() + 1);
        text.push(marker);
        text.push('\n');
        Self::new(&text)
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// True when both values are the same allocation.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.text, &other.text)
    }

    /// True when both values draw the same text, allocation aside.
    #[must_use]
    pub fn same_text(&self, other: &Self) -> bool {
        *self.text == *other.text
    }
}

impl PartialEq for RenderValue {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for RenderValue {}

impl fmt::Debug for RenderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RenderValue")
            .field(&&*self.text)
            .field(&Arc::as_ptr(&self.text))
            .finish()
    }
}

/// Metadata record for a single character.
///
/// `hard` is only meaningful on break characters. `display` is owned by the
/// newline annotator and `fill_space` by the reflow engine.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CharProps {
    pub hard: bool,
    pub display: Option<RenderValue>,
    pub fill_space: Option<String>,
    pub attrs: CharAttrs,
}

impl CharProps {
    /// Props for freshly inserted text carrying the given attributes.
    #[must_use]
    pub fn inherit(attrs: CharAttrs) -> Self {
        Self {
            attrs,
            ..Self::default()
        }
    }

    /// Props for a hard break.
    #[must_use]
    pub fn hard_break(attrs: CharAttrs) -> Self {
        Self {
            hard: true,
            attrs,
            ..Self::default()
        }
    }
}
