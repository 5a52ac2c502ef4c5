//! 16-bit panel colours

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

/// Native colour of the panel (5-6-5 bit RGB).
pub type Colour = Rgb565;

/// Convert 8-bit-per-channel RGB to the panel colour space.
pub const fn from_rgb(r: u8, g: u8, b: u8) -> Colour {
    Rgb565::new(r >> 3, g >> 2, b >> 3)
}

/// Pure red.
pub const RED: Colour = from_rgb(255, 0, 0);
/// Dark yellow.
pub const YELLOW: Colour = from_rgb(128, 128, 0);
/// Pure green.
pub const GREEN: Colour = from_rgb(0, 255, 0);
/// Dark cyan.
pub const TURQUOISE: Colour = from_rgb(0, 128, 128);
/// Pure blue.
pub const BLUE: Colour = from_rgb(0, 0, 255);
/// Dark magenta.
pub const MAGENTA: Colour = from_rgb(128, 0, 128);
/// White.
pub const WHITE: Colour = Rgb565::WHITE;
/// Black.
pub const BLACK: Colour = Rgb565::BLACK;

/// Linear blend between `from` and `to`, `step` of `steps` of the way along.
///
/// `steps == 0` returns `from`.
pub fn blend(from: Colour, to: Colour, step: u32, steps: u32) -> Colour {
    if steps == 0 {
        return from;
    }
    let step = step.min(steps);
    let mix = |a: u8, b: u8| -> u8 {
        let weighted = u32::from(a)
            .saturating_mul(steps.saturating_sub(step))
            .saturating_add(u32::from(b).saturating_mul(step));
        let v = weighted.checked_div(steps).unwrap_or(0);
        u8::try_from(v).unwrap_or(u8::MAX)
    };
    Rgb565::new(
        mix(from.r(), to.r()),
        mix(from.g(), to.g()),
        mix(from.b(), to.b()),
    )
}
