//! Touch Panel Field Engine
//!
//! Retained-mode collection of rectangular fields (labels, numeric and text
//! displays, buttons, progress bars) arranged into pages, overlaid by at most
//! one popup, driven by coordinate-based touches and value updates.
//!
//! # Architecture
//!
//! - [`field`]: the closed set of field kinds and their rendering contracts
//! - [`arena`]: fixed-capacity storage owning every field, addressed by [`FieldId`]
//! - [`window`]: ordered field chains with hit testing and redraw
//! - [`popup`]: windows stacked above the main page at a screen offset
//! - [`main_window`]: the persistent page + popup compositor
//! - [`canvas`]: the drawing backend boundary (embedded-graphics adapter)
//!
//! Nothing allocates: fields are built once at startup into the arena and
//! mutated in place for the rest of the session.
//!
//! # Example
//!
//! ```no_run
//! use panel_fields::prelude::*;
//!
//! let style = Style::DEFAULT;
//! let mut mw = MainWindow::new(480, 272, colour::BLACK);
//! let temp = mw
//!     .add_field(Field::float(&style, 40, 10, 120, TextAlignment::Left, 1, Some("T "), Some("C")))
//!     .unwrap();
//! mw.set_value(temp, 42.567_f32);
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::expect_used)]
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code

pub mod arena;
pub mod canvas;
pub mod colour;
pub mod error;
pub mod field;
pub mod main_window;
pub mod popup;
pub mod press;
pub mod style;
pub mod window;

#[cfg(test)]
mod test_support;

pub use arena::{FieldArena, FieldId, MAX_FIELDS};
pub use canvas::{Canvas, DrawTargetCanvas};
pub use colour::Colour;
pub use error::PanelError;
pub use field::{EventCode, Field, FieldKind, Param, Value};
pub use main_window::MainWindow;
pub use popup::{PopupId, PopupWindow};
pub use press::ButtonPress;
pub use style::{Icon, PixelNumber, Style, TextAlignment};
pub use window::{Chain, Window};

/// Glob import of the whole public API.
pub mod prelude {
    pub use crate::arena::*;
    pub use crate::canvas::*;
    pub use crate::colour::{self, Colour};
    pub use crate::error::*;
    pub use crate::field::*;
    pub use crate::main_window::*;
    pub use crate::popup::*;
    pub use crate::press::*;
    pub use crate::style::*;
    pub use crate::window::*;
}
