//! Which characters need an interword space when a wrapped line is rejoined.
//!
//! Scripts such as Chinese and Japanese are written without spaces between
//! words, so a break between two of their characters must collapse to
//! nothing. The reflow engine asks a [`SpacingPolicy`] instead of hard-coding
//! one script test; [`WideCharSpacing`] is the default.

use super::width::{WidthMethod, display_width_char_with_method};

/// Decides whether rejoining text across a break needs a space.
pub trait SpacingPolicy {
    /// False for characters that join their neighbours without a space.
    fn requires_interword_space(&self, ch: char) -> bool;
}

impl<F> SpacingPolicy for F
where
    F: Fn(char) -> bool,
{
    fn requires_interword_space(&self, ch: char) -> bool {
        self(ch)
    }
}

/// Treats double-width (East Asian wide and fullwidth) characters as not
/// needing interword spaces.
#[derive(Clone, Copy, Debug, Default)]
pub struct WideCharSpacing {
    method: WidthMethod,
}

impl WideCharSpacing {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific width method; `Unicode` also counts ambiguous-width
    /// characters as wide.
    #[must_use]
    pub fn with_method(method: WidthMethod) -> Self {
        Self { method }
    }
}

impl SpacingPolicy for WideCharSpacing {
    fn requires_interword_space(&self, ch: char) -> bool {
        display_width_char_with_method(ch, self.method) < 2
    }
}
