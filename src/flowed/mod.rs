//! Hard/soft break handling in the style of RFC 2646 format=flowed.
//!
//! - [`NewlineAnnotator`] gives hard breaks a visible marker.
//! - [`ChangeTracker`] re-runs the annotator over every edited region.
//! - [`ReflowEngine`] inserts soft breaks as a trailing space plus newline.
//! - [`ModeDispatcher`] picks the reflow engine or the original break
//!   routine by document mode.
//! - [`fill_region`] and [`unflow_region`] wrap and unwrap paragraphs.
//! - [`FlowedBuffer`] ties them to a [`Document`](crate::text::Document).

mod annotate;
mod breaker;
mod buffer;
mod dispatch;
mod fill;
mod reflow;
mod tracker;

pub use annotate::{AnnotateStats, DEFAULT_MARKER, NewlineAnnotator};
pub use breaker::{BreakStrategy, PlainBreaker};
pub use buffer::FlowedBuffer;
pub use dispatch::{ModeDispatcher, ModeSource};
pub use fill::{auto_fill, fill_paragraph, fill_region, paragraph_bounds, unflow_region};
pub use reflow::ReflowEngine;
pub use tracker::ChangeTracker;
