//! Unicode helpers: display width and interword-spacing classification.

mod spacing;
mod width;

pub use spacing::{SpacingPolicy, WideCharSpacing};
pub use width::{WidthMethod, display_width_char, display_width_char_with_method};
