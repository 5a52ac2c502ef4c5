//! Panel UI Testing Utilities
//!
//! Headless drawing backend for panel-fields UIs: an in-memory RGB565
//! framebuffer plus a log of every drawing call, with pixel, region and
//! text assertions.
//!
//! # Quick start
//!
//! ```no_run
//! use panel_fields::prelude::*;
//! use panel_testing::TestCanvas;
//!
//! let mut mw = MainWindow::new(480, 272, colour::BLACK);
//! let ready = mw
//!     .add_field(Field::static_text(&Style::DEFAULT, 10, 10, 200, TextAlignment::Left, "Ready"))
//!     .unwrap();
//!
//! let mut t = TestCanvas::new(480, 272);
//! mw.refresh(&mut t, true).unwrap();
//!
//! assert!(t.drew_text("Ready"));
//! let bounds = mw.field(ready).unwrap().bounds();
//! t.assert_region_contains(bounds, colour::WHITE).unwrap();
//! ```

#![warn(clippy::all)]
#![warn(clippy::dbg_macro)]
// Assertion helpers report mismatches as Result<(), String> so callers
// can add context before unwrapping.
#![warn(clippy::print_stdout)]
#![allow(clippy::module_name_repetitions)]
// Mismatch messages print colours and rectangles with {:?}.
#![allow(clippy::use_debug)]

use core::convert::Infallible;

use embedded_graphics::{
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{PointsIter, Rectangle},
};
use panel_fields::{canvas::mono_text_width, style::Font, window::overlaps, Canvas, Colour, DrawTargetCanvas, Icon};

// ─────────────────────────────────────────────────────────────────────────────
// Frame
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory RGB565 framebuffer. Pixels outside the frame are dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    size: Size,
    pixels: Vec<Rgb565>,
}

impl Frame {
    /// A frame of the given size cleared to `background`.
    pub fn new(width: u32, height: u32, background: Rgb565) -> Self {
        let len = usize::try_from(u64::from(width).saturating_mul(u64::from(height))).unwrap_or(0);
        Self {
            size: Size::new(width, height),
            pixels: vec![background; len],
        }
    }

    fn index(&self, p: Point) -> Option<usize> {
        let x = u32::try_from(p.x).ok()?;
        let y = u32::try_from(p.y).ok()?;
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let i = y.checked_mul(self.size.width)?.checked_add(x)?;
        usize::try_from(i).ok()
    }

    /// Colour at `(x, y)`, or `None` if out of bounds.
    pub fn get(&self, x: u32, y: u32) -> Option<Rgb565> {
        let p = Point::new(i32::try_from(x).ok()?, i32::try_from(y).ok()?);
        self.index(p).and_then(|i| self.pixels.get(i).copied())
    }
}

impl OriginDimensions for Frame {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for Frame {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, colour) in pixels {
            if let Some(px) = self.index(point).and_then(|i| self.pixels.get_mut(i)) {
                *px = colour;
            }
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// DrawOp
// ─────────────────────────────────────────────────────────────────────────────

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// `Canvas::fill_rect`.
    Fill {
        /// Filled area.
        rect: Rectangle,
        /// Fill colour.
        colour: Colour,
    },
    /// `Canvas::draw_text`.
    Text {
        /// The text drawn.
        text: String,
        /// Top-left corner of the first glyph.
        origin: Point,
        /// Area the text was clipped to.
        clip: Rectangle,
        /// Glyph colour.
        foreground: Colour,
    },
    /// `Canvas::draw_icon`.
    Icon {
        /// Area covered by the icon.
        rect: Rectangle,
    },
}

impl DrawOp {
    /// Screen area the call could have touched.
    pub fn area(&self) -> Rectangle {
        match self {
            DrawOp::Fill { rect, .. } | DrawOp::Icon { rect } => *rect,
            DrawOp::Text { clip, .. } => *clip,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TestCanvas
// ─────────────────────────────────────────────────────────────────────────────

/// Headless [`Canvas`] for UI tests.
///
/// Renders through the same embedded-graphics adapter as real hardware,
/// so pixel assertions see what a panel would show, and records each call
/// so tests can check *what* was redrawn on a partial refresh.
pub struct TestCanvas {
    inner: DrawTargetCanvas<Frame>,
    log: Vec<DrawOp>,
}

impl TestCanvas {
    /// A black frame with exact pixel dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_background(width, height, Rgb565::BLACK)
    }

    /// A frame filled with `background`.
    pub fn with_background(width: u32, height: u32, background: Rgb565) -> Self {
        Self {
            inner: DrawTargetCanvas::new(Frame::new(width, height, background)),
            log: Vec::new(),
        }
    }

    /// The framebuffer.
    pub fn frame(&self) -> &Frame {
        self.inner.inner()
    }

    // ── Framebuffer access ───────────────────────────────────────────────────

    /// Colour at `(x, y)`, or `None` if out of bounds.
    pub fn pixel_at(&self, x: u32, y: u32) -> Option<Rgb565> {
        self.frame().get(x, y)
    }

    // ── Pixel assertions ─────────────────────────────────────────────────────

    /// Assert that pixel `(x, y)` has the expected colour.
    pub fn assert_pixel(&self, x: u32, y: u32, expected: Rgb565) -> Result<(), String> {
        let actual = self
            .pixel_at(x, y)
            .ok_or_else(|| format!("Pixel ({x}, {y}) is out of bounds"))?;
        if actual == expected {
            Ok(())
        } else {
            Err(format!("assert_pixel({x}, {y}): expected {expected:?}, got {actual:?}"))
        }
    }

    /// Assert that every pixel inside `rect` has the given colour.
    pub fn assert_region_uniform(&self, rect: Rectangle, colour: Rgb565) -> Result<(), String> {
        for p in rect.points() {
            let (x, y) = coords(p).ok_or_else(|| format!("Region {rect:?} leaves the frame"))?;
            self.assert_pixel(x, y, colour)
                .map_err(|e| format!("assert_region_uniform failed in {rect:?}: {e}"))?;
        }
        Ok(())
    }

    /// Assert that `rect` contains at least one pixel of the given colour.
    pub fn assert_region_contains(&self, rect: Rectangle, colour: Rgb565) -> Result<(), String> {
        if self.pixel_count_of_colour(rect, colour) > 0 {
            Ok(())
        } else {
            Err(format!("assert_region_contains: no {colour:?} pixel found in {rect:?}"))
        }
    }

    /// Count the pixels in `rect` matching `colour`.
    pub fn pixel_count_of_colour(&self, rect: Rectangle, colour: Rgb565) -> usize {
        rect.points()
            .filter_map(coords)
            .filter(|&(x, y)| self.pixel_at(x, y) == Some(colour))
            .count()
    }

    // ── Draw log ─────────────────────────────────────────────────────────────

    /// Every drawing call since the last clear.
    pub fn ops(&self) -> &[DrawOp] {
        &self.log
    }

    /// Forget the logged drawing calls.
    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    /// Drain and return the draw log.
    pub fn take_log(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.log)
    }

    /// Every text line drawn, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.log
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Whether exactly `text` was drawn as one line.
    pub fn drew_text(&self, text: &str) -> bool {
        self.texts().contains(&text)
    }

    /// Whether any logged call touched a pixel of `rect`.
    pub fn touched(&self, rect: Rectangle) -> bool {
        self.log.iter().any(|op| overlaps(op.area(), rect))
    }
}

fn coords(p: Point) -> Option<(u32, u32)> {
    Some((u32::try_from(p.x).ok()?, u32::try_from(p.y).ok()?))
}

impl Canvas for TestCanvas {
    type Error = Infallible;

    fn fill_rect(&mut self, rect: Rectangle, colour: Colour) -> Result<(), Self::Error> {
        self.log.push(DrawOp::Fill { rect, colour });
        self.inner.fill_rect(rect, colour)
    }

    fn draw_text(
        &mut self,
        font: &'static Font,
        text: &str,
        origin: Point,
        clip: Rectangle,
        foreground: Colour,
        background: Option<Colour>,
    ) -> Result<(), Self::Error> {
        self.log.push(DrawOp::Text {
            text: text.to_string(),
            origin,
            clip,
            foreground,
        });
        self.inner.draw_text(font, text, origin, clip, foreground, background)
    }

    fn draw_icon(&mut self, icon: &Icon, top_left: Point) -> Result<(), Self::Error> {
        self.log.push(DrawOp::Icon {
            rect: Rectangle::new(top_left, Size::new(u32::from(icon.width), u32::from(icon.height))),
        });
        self.inner.draw_icon(icon, top_left)
    }

    fn text_width(&self, font: &Font, text: &str) -> u32 {
        mono_text_width(font, text)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
