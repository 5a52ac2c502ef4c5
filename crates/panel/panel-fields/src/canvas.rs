//! Drawing backend boundary
//!
//! Fields render through the small [`Canvas`] trait rather than a concrete
//! display driver. [`DrawTargetCanvas`] adapts any embedded-graphics
//! [`DrawTarget`] with RGB565 pixels, which covers hardware drivers, the
//! desktop simulator and in-memory test frames alike.

use embedded_graphics::{
    image::{Image, ImageRawBE},
    mono_font::MonoTextStyleBuilder,
    pixelcolor::Rgb565,
    prelude::*,
    primitives::Rectangle,
    text::{Baseline, Text, TextStyleBuilder},
};

use crate::colour::Colour;
use crate::style::{Font, Icon, TextAlignment};

/// Primitive drawing operations needed by the field engine.
pub trait Canvas {
    /// Error raised by the underlying device.
    type Error;

    /// Fill `rect` with a solid colour.
    fn fill_rect(&mut self, rect: Rectangle, colour: Colour) -> Result<(), Self::Error>;

    /// Draw one line of text with its top-left corner at `origin`.
    ///
    /// Nothing outside `clip` is touched. With `background` set the glyph
    /// cells are painted opaque, otherwise only the glyph pixels are drawn.
    fn draw_text(
        &mut self,
        font: &'static Font,
        text: &str,
        origin: Point,
        clip: Rectangle,
        foreground: Colour,
        background: Option<Colour>,
    ) -> Result<(), Self::Error>;

    /// Blit a bitmap icon with its top-left corner at `top_left`.
    fn draw_icon(&mut self, icon: &Icon, top_left: Point) -> Result<(), Self::Error>;

    /// Rendered width of `text` in pixels.
    fn text_width(&self, font: &Font, text: &str) -> u32 {
        mono_text_width(font, text)
    }
}

/// Width of `text` set in a fixed-pitch font.
pub fn mono_text_width(font: &Font, text: &str) -> u32 {
    let n = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
    if n == 0 {
        return 0;
    }
    n.saturating_mul(font.character_size.width)
        .saturating_add(n.saturating_sub(1).saturating_mul(font.character_spacing))
}

/// Top-left origin for `text` placed in `rect` at `align`, centred vertically.
pub fn aligned_origin<C: Canvas + ?Sized>(
    canvas: &C,
    font: &Font,
    text: &str,
    rect: Rectangle,
    align: TextAlignment,
) -> Point {
    let slack = rect.size.width.saturating_sub(canvas.text_width(font, text));
    let dx = match align {
        TextAlignment::Left => 0,
        TextAlignment::Centre => slack / 2,
        TextAlignment::Right => slack,
    };
    let dy = rect.size.height.saturating_sub(font.character_size.height) / 2;
    offset(rect.top_left, dx, dy)
}

/// `rect` shrunk by `by` pixels on every side.
pub fn inset(rect: Rectangle, by: u32) -> Rectangle {
    let shrink = by.saturating_mul(2);
    Rectangle::new(
        offset(rect.top_left, by, by),
        Size::new(
            rect.size.width.saturating_sub(shrink),
            rect.size.height.saturating_sub(shrink),
        ),
    )
}

/// `p` moved right by `dx` and down by `dy`, saturating at the i32 range.
pub fn offset(p: Point, dx: u32, dy: u32) -> Point {
    Point::new(p.x.saturating_add(to_i32(dx)), p.y.saturating_add(to_i32(dy)))
}

fn to_i32(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

/// [`Canvas`] over an embedded-graphics RGB565 draw target.
pub struct DrawTargetCanvas<D> {
    target: D,
}

impl<D> DrawTargetCanvas<D> {
    /// Wrap a draw target.
    pub fn new(target: D) -> Self {
        Self { target }
    }

    /// The wrapped draw target.
    pub fn inner(&self) -> &D {
        &self.target
    }

    /// Mutable access to the wrapped draw target.
    pub fn inner_mut(&mut self) -> &mut D {
        &mut self.target
    }

    /// Unwrap the draw target.
    pub fn into_inner(self) -> D {
        self.target
    }
}

impl<D> Canvas for DrawTargetCanvas<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    type Error = D::Error;

    fn fill_rect(&mut self, rect: Rectangle, colour: Colour) -> Result<(), Self::Error> {
        self.target.fill_solid(&rect, colour)
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
        let mut character_style = MonoTextStyleBuilder::new().font(font).text_color(foreground);
        if let Some(background) = background {
            character_style = character_style.background_color(background);
        }
        let text_style = TextStyleBuilder::new().baseline(Baseline::Top).build();
        Text::with_text_style(text, origin, character_style.build(), text_style)
            .draw(&mut self.target.clipped(&clip))?;
        Ok(())
    }

    fn draw_icon(&mut self, icon: &Icon, top_left: Point) -> Result<(), Self::Error> {
        let raw = ImageRawBE::<Rgb565>::new(icon.data, u32::from(icon.width));
        Image::new(&raw, top_left).draw(&mut self.target)
    }
}
