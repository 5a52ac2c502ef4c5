//! Construction-time style and shared field types
//!
//! [`Style`] replaces a process-wide "current default colours and font":
//! page-building code threads an explicit value through every field
//! constructor instead. Once a field is built its colours only change
//! through its own setters.

use embedded_graphics::mono_font::{iso_8859_1::FONT_10X20, MonoFont};

use crate::colour::{self, Colour};

/// Coordinate and extent type used throughout the panel.
pub type PixelNumber = u16;

/// Fixed-pitch bitmap font used to render field text.
pub type Font = MonoFont<'static>;

/// Rows per band of a button's background gradient.
pub const BUTTON_GRAD_STEP: u32 = 12;

/// Where text is anchored within a field's width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TextAlignment {
    /// Flush with the left edge.
    #[default]
    Left,
    /// Centred.
    Centre,
    /// Flush with the right edge.
    Right,
}

/// Bitmap icon: `width * height` big-endian RGB565 pixels, one row at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Icon {
    /// Width in pixels.
    pub width: PixelNumber,
    /// Height in pixels.
    pub height: PixelNumber,
    /// Pixel data.
    pub data: &'static [u8],
}

impl Icon {
    /// Create an icon over raw pixel data.
    pub const fn new(width: PixelNumber, height: PixelNumber, data: &'static [u8]) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    /// Whether `data` holds exactly `width * height` pixels.
    pub fn is_well_formed(&self) -> bool {
        usize::from(self.width)
            .saturating_mul(usize::from(self.height))
            .saturating_mul(2)
            == self.data.len()
    }
}

/// Button colour set, normal and pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonColours {
    /// One-pixel outline.
    pub border: Colour,
    /// Bottom colour of the unpressed gradient.
    pub gradient: Colour,
    /// Top colour of the pressed gradient.
    pub pressed_background: Colour,
    /// Bottom colour of the pressed gradient.
    pub pressed_gradient: Colour,
}

/// Default colours, font and margins consulted by field constructors.
#[derive(Clone, Copy)]
pub struct Style {
    /// Text font.
    pub font: &'static Font,
    /// Text colour.
    pub foreground: Colour,
    /// Fill colour.
    pub background: Colour,
    /// Colours for buttons.
    pub button: ButtonColours,
    /// Vertical padding between a text button's border and its caption.
    pub text_margin: PixelNumber,
    /// Vertical padding between an icon button's border and its icon.
    pub icon_margin: PixelNumber,
}

impl Style {
    /// White text on black, grey buttons, 10x20 font.
    pub const DEFAULT: Self = Self {
        font: &FONT_10X20,
        foreground: colour::WHITE,
        background: colour::BLACK,
        button: ButtonColours {
            border: colour::WHITE,
            gradient: colour::from_rgb(64, 64, 64),
            pressed_background: colour::from_rgb(16, 128, 16),
            pressed_gradient: colour::from_rgb(48, 160, 48),
        },
        text_margin: 1,
        icon_margin: 1,
    };

    /// Same style with another font.
    pub const fn with_font(mut self, font: &'static Font) -> Self {
        self.font = font;
        self
    }

    /// Same style with other foreground and background colours.
    pub const fn with_colours(mut self, foreground: Colour, background: Colour) -> Self {
        self.foreground = foreground;
        self.background = background;
        self
    }

    /// Same style with other button border/gradient/pressed colours.
    pub const fn with_button_colours(mut self, button: ButtonColours) -> Self {
        self.button = button;
        self
    }

    /// Same style with other button margins.
    pub const fn with_margins(mut self, text_margin: PixelNumber, icon_margin: PixelNumber) -> Self {
        self.text_margin = text_margin;
        self.icon_margin = icon_margin;
        self
    }

    /// Height of one line of text in this style's font.
    pub fn font_height(&self) -> PixelNumber {
        font_height(self.font)
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl core::fmt::Debug for Style {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Style")
            .field("font_height", &self.font_height())
            .field("foreground", &self.foreground)
            .field("background", &self.background)
            .field("button", &self.button)
            .field("text_margin", &self.text_margin)
            .field("icon_margin", &self.icon_margin)
            .finish()
    }
}

/// Line height of `font` in pixels.
pub fn font_height(font: &Font) -> PixelNumber {
    PixelNumber::try_from(font.character_size.height).unwrap_or(PixelNumber::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::mono_font::iso_8859_1::FONT_6X10;

    #[test]
    fn test_default_style() {
        let style = Style::default();
        assert_eq!(style.font_height(), 20);
        assert_eq!(style.foreground, colour::WHITE);
        assert_eq!(style.text_margin, 1);
    }

    #[test]
    fn test_with_methods_leave_original_untouched() {
        let base = Style::DEFAULT;
        let derived = base
            .with_font(&FONT_6X10)
            .with_colours(colour::RED, colour::BLUE)
            .with_margins(4, 2);
        assert_eq!(derived.font_height(), 10);
        assert_eq!(derived.foreground, colour::RED);
        assert_eq!(derived.background, colour::BLUE);
        assert_eq!((derived.text_margin, derived.icon_margin), (4, 2));
        assert_eq!(base.font_height(), 20);
        assert_eq!(base.background, colour::BLACK);
    }

    #[test]
    fn test_icon_well_formed() {
        static DATA: [u8; 8] = [0; 8];
        assert!(Icon::new(2, 2, &DATA).is_well_formed());
        assert!(!Icon::new(3, 2, &DATA).is_well_formed());
    }

    #[cfg(feature = "defmt")]
    #[test]
    fn test_colour_types_are_loggable() {
        fn loggable<T: defmt::Format>() {}
        loggable::<ButtonColours>();
        loggable::<TextAlignment>();
    }

    #[test]
    fn test_alignment_default_left() {
        assert_eq!(TextAlignment::default(), TextAlignment::Left);
    }
}
