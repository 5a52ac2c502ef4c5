//! Popup windows
//!
//! Popups are built once at startup and attached to or detached from the
//! main window as needed. Their fields use popup-relative coordinates; the
//! screen origin is set when the popup is shown.

use embedded_graphics::{
    prelude::*,
    primitives::{ContainsPoint, Rectangle},
};

use crate::arena::FieldArena;
use crate::canvas::{inset, Canvas};
use crate::colour::Colour;
use crate::style::PixelNumber;
use crate::window::Window;

/// Maximum number of popups a main window can hold.
pub const MAX_POPUPS: usize = 16;

/// Handle to a popup registered with a main window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PopupId(pub(crate) u8);

impl PopupId {
    /// Position in registration order.
    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

/// A window with its own size and screen origin, drawn above the page.
pub struct PopupWindow {
    window: Window,
    width: PixelNumber,
    height: PixelNumber,
    origin: Point,
    border: Colour,
}

impl PopupWindow {
    pub(crate) fn new(width: PixelNumber, height: PixelNumber, background: Colour, border: Colour) -> Self {
        Self {
            window: Window::new(background),
            width,
            height,
            origin: Point::zero(),
            border,
        }
    }

    /// The popup's field chain.
    pub fn window(&self) -> &Window {
        &self.window
    }

    pub(crate) fn window_mut(&mut self) -> &mut Window {
        &mut self.window
    }

    /// Width in pixels.
    pub fn width(&self) -> PixelNumber {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> PixelNumber {
        self.height
    }

    /// Screen position of the top-left corner.
    pub fn origin(&self) -> Point {
        self.origin
    }

    pub(crate) fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    /// Screen rectangle covered by the popup.
    pub fn rect(&self) -> Rectangle {
        Rectangle::new(self.origin, Size::new(u32::from(self.width), u32::from(self.height)))
    }

    /// Whether the screen point `point` lies on the popup.
    pub fn contains(&self, point: Point) -> bool {
        self.rect().contains(point)
    }

    /// Paint the popup. A full refresh repaints the frame and background
    /// before the fields.
    pub(crate) fn refresh<C: Canvas>(&self, arena: &mut FieldArena, canvas: &mut C, full: bool) -> Result<usize, C::Error> {
        if full {
            let rect = self.rect();
            canvas.fill_rect(rect, self.border)?;
            canvas.fill_rect(inset(rect, 1), self.window.background())?;
        }
        self.window.refresh(arena, canvas, full, self.origin, None, &[])
    }
}
