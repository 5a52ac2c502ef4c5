//! Progress bar

use embedded_graphics::{prelude::*, primitives::Rectangle};

use crate::canvas::{inset, offset, Canvas};
use crate::colour::Colour;
use crate::style::PixelNumber;

/// Horizontal bar inside a one-pixel frame, filled left to right.
///
/// Partial repaints only touch the band between the previous and the new
/// fill edge.
pub struct ProgressBar {
    height: PixelNumber,
    percent: u8,
    last_pixels: u32,
    painted: bool,
}

impl ProgressBar {
    pub(crate) fn new(height: PixelNumber) -> Self {
        Self {
            height,
            percent: 0,
            last_pixels: 0,
            painted: false,
        }
    }

    pub(crate) fn height(&self) -> PixelNumber {
        self.height
    }

    /// Fill level, 0 to 100.
    pub fn percent(&self) -> u8 {
        self.percent
    }

    pub(crate) fn set_percent(&mut self, percent: u8) {
        self.percent = percent.min(100);
    }

    /// Forget what is on screen; the next draw repaints frame and fill.
    pub(crate) fn invalidate(&mut self) {
        self.painted = false;
    }

    fn fill_pixels(&self, inner_width: u32) -> u32 {
        inner_width.saturating_mul(u32::from(self.percent)) / 100
    }

    pub(crate) fn draw<C: Canvas>(
        &mut self,
        canvas: &mut C,
        rect: Rectangle,
        full: bool,
        fg: Colour,
        bg: Colour,
    ) -> Result<(), C::Error> {
        let inner = inset(rect, 1);
        let pixels = self.fill_pixels(inner.size.width);
        let band = |from: u32, to: u32| {
            Rectangle::new(
                offset(inner.top_left, from, 0),
                Size::new(to.saturating_sub(from), inner.size.height),
            )
        };

        if full || !self.painted {
            canvas.fill_rect(rect, fg)?;
            if pixels < inner.size.width {
                canvas.fill_rect(band(pixels, inner.size.width), bg)?;
            }
        } else if pixels > self.last_pixels {
            canvas.fill_rect(band(self.last_pixels, pixels), fg)?;
        } else if pixels < self.last_pixels {
            canvas.fill_rect(band(pixels, self.last_pixels), bg)?;
        }

        self.last_pixels = pixels;
        self.painted = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colour::{BLACK, WHITE};
    use crate::test_support::{Op, RecordingCanvas};

    fn rect() -> Rectangle {
        // Inner width 100 so percent == pixels.
        Rectangle::new(Point::new(10, 10), Size::new(102, 12))
    }

    #[test]
    fn test_percent_clamped() {
        let mut bar = ProgressBar::new(12);
        bar.set_percent(250);
        assert_eq!(bar.percent(), 100);
    }

    #[test]
    fn test_first_draw_paints_frame_and_remainder() {
        let mut bar = ProgressBar::new(12);
        bar.set_percent(30);
        let mut canvas = RecordingCanvas::default();
        bar.draw(&mut canvas, rect(), false, WHITE, BLACK).unwrap();
        assert_eq!(
            canvas.ops,
            [
                Op::Fill { rect: rect(), colour: WHITE },
                Op::Fill {
                    rect: Rectangle::new(Point::new(41, 11), Size::new(70, 10)),
                    colour: BLACK
                },
            ]
        );
    }

    #[test]
    fn test_partial_draw_paints_only_delta() {
        let mut bar = ProgressBar::new(12);
        bar.set_percent(30);
        bar.draw(&mut RecordingCanvas::default(), rect(), true, WHITE, BLACK).unwrap();

        bar.set_percent(45);
        let mut canvas = RecordingCanvas::default();
        bar.draw(&mut canvas, rect(), false, WHITE, BLACK).unwrap();
        assert_eq!(
            canvas.ops,
            [Op::Fill {
                rect: Rectangle::new(Point::new(41, 11), Size::new(15, 10)),
                colour: WHITE
            }]
        );

        bar.set_percent(40);
        let mut canvas = RecordingCanvas::default();
        bar.draw(&mut canvas, rect(), false, WHITE, BLACK).unwrap();
        assert_eq!(
            canvas.ops,
            [Op::Fill {
                rect: Rectangle::new(Point::new(51, 11), Size::new(5, 10)),
                colour: BLACK
            }]
        );
    }

    #[test]
    fn test_unchanged_percent_draws_nothing() {
        let mut bar = ProgressBar::new(12);
        bar.set_percent(50);
        bar.draw(&mut RecordingCanvas::default(), rect(), true, WHITE, BLACK).unwrap();
        let mut canvas = RecordingCanvas::default();
        bar.draw(&mut canvas, rect(), false, WHITE, BLACK).unwrap();
        assert!(canvas.ops.is_empty());
    }

    #[test]
    fn test_full_bar_has_no_remainder() {
        let mut bar = ProgressBar::new(12);
        bar.set_percent(100);
        let mut canvas = RecordingCanvas::default();
        bar.draw(&mut canvas, rect(), true, WHITE, BLACK).unwrap();
        assert_eq!(canvas.ops.len(), 1);
    }

    #[test]
    fn test_invalidate_forces_repaint() {
        let mut bar = ProgressBar::new(12);
        bar.set_percent(20);
        bar.draw(&mut RecordingCanvas::default(), rect(), true, WHITE, BLACK).unwrap();
        bar.invalidate();
        let mut canvas = RecordingCanvas::default();
        bar.draw(&mut canvas, rect(), false, WHITE, BLACK).unwrap();
        assert_eq!(canvas.ops.len(), 2);
    }
}
