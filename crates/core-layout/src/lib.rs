//! Responsive layout primitives shared by the widgets.
//!
//! A viewport width (CSS pixels) is bucketed into a [`ViewportClass`] through
//! [`Breakpoints`]; a [`PageSizeTable`] then says how many carousel cards fit at
//! once for that class. [`Viewport`] bundles the three so surfaces can reflow
//! against one consistent value.

pub mod breakpoints;
pub mod viewport;

pub use breakpoints::{Breakpoints, PageSizeTable, ViewportClass};
pub use viewport::Viewport;
