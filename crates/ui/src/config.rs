//! Layout configuration and colour palette
//!
//! [`LayoutConfig`] holds the display geometry and the spacing metrics the
//! page builders work from. Two presets match the panels the firmware ships
//! for; with the `serde` feature a configuration can also be loaded from
//! JSON. [`Palette`] names the colours of each kind of field and turns them
//! into the [`Style`] values the field constructors consume.

use embedded_graphics::mono_font::iso_8859_1::{FONT_10X20, FONT_6X10, FONT_8X13};
use panel_fields::colour::{self, Colour};
use panel_fields::style::{ButtonColours, Font};
use panel_fields::{PixelNumber, Style};

/// Bitmap font sizes available to a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FontChoice {
    /// 6x10.
    Small,
    /// 8x13.
    #[default]
    Medium,
    /// 10x20.
    Large,
}

impl FontChoice {
    /// The font table for this size.
    pub fn font(self) -> &'static Font {
        match self {
            FontChoice::Small => &FONT_6X10,
            FontChoice::Medium => &FONT_8X13,
            FontChoice::Large => &FONT_10X20,
        }
    }
}

/// Display geometry and layout metrics, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LayoutConfig {
    /// Display width.
    pub display_width: PixelNumber,
    /// Display height.
    pub display_height: PixelNumber,
    /// Gap between the screen edge and the outermost fields.
    pub margin: PixelNumber,
    /// Horizontal gap between neighbouring fields.
    pub field_spacing: PixelNumber,
    /// Vertical distance between successive rows.
    pub row_height: PixelNumber,
    /// Gap between a popup's border and its fields, left and right.
    pub popup_side_margin: PixelNumber,
    /// Gap between a popup's border and its fields, top and bottom.
    pub popup_top_margin: PixelNumber,
    /// Gap between neighbouring buttons in a popup.
    pub popup_field_spacing: PixelNumber,
    /// Height of the print progress bar.
    pub progress_bar_height: PixelNumber,
    /// Width of the label column of the temperature grid.
    pub temp_label_width: PixelNumber,
    /// Width of each heater column of the temperature grid.
    pub temp_column_width: PixelNumber,
    /// Width of the status field in the title bar.
    pub status_width: PixelNumber,
    /// Width of the timestamp column of the message log.
    pub message_time_width: PixelNumber,
    /// Keyboard key width.
    pub key_width: PixelNumber,
    /// Horizontal distance between neighbouring keyboard keys.
    pub key_step: PixelNumber,
    /// Padding between a button's border and its caption.
    pub text_margin: PixelNumber,
    /// Font for every field.
    pub font: FontChoice,
}

impl LayoutConfig {
    /// 4.3" 480x272 panel.
    pub const DISPLAY_480X272: Self = Self {
        display_width: 480,
        display_height: 272,
        margin: 4,
        field_spacing: 6,
        row_height: 26,
        popup_side_margin: 6,
        popup_top_margin: 6,
        popup_field_spacing: 6,
        progress_bar_height: 10,
        temp_label_width: 96,
        temp_column_width: 84,
        status_width: 120,
        message_time_width: 56,
        key_width: 30,
        key_step: 36,
        text_margin: 3,
        font: FontChoice::Medium,
    };

    /// 5"/7" 800x480 panel.
    pub const DISPLAY_800X480: Self = Self {
        display_width: 800,
        display_height: 480,
        margin: 6,
        field_spacing: 10,
        row_height: 40,
        popup_side_margin: 10,
        popup_top_margin: 10,
        popup_field_spacing: 10,
        progress_bar_height: 16,
        temp_label_width: 150,
        temp_column_width: 140,
        status_width: 200,
        message_time_width: 80,
        key_width: 50,
        key_step: 60,
        text_margin: 4,
        font: FontChoice::Large,
    };

    /// The font table for this layout.
    pub fn font(&self) -> &'static Font {
        self.font.font()
    }

    /// Height of a text button in this layout.
    pub fn button_height(&self) -> PixelNumber {
        panel_fields::style::font_height(self.font())
            .saturating_add(self.text_margin.saturating_mul(2))
            .saturating_add(2)
    }

    /// Top of content row `n`, counted from the top margin.
    pub fn row(&self, n: u16) -> PixelNumber {
        self.margin.saturating_add(n.saturating_mul(self.row_height))
    }

    /// Top of the tab bar along the bottom edge.
    pub fn tab_row(&self) -> PixelNumber {
        self.display_height
            .saturating_sub(self.margin)
            .saturating_sub(self.button_height())
    }

    /// Width available between the side margins.
    pub fn content_width(&self) -> PixelNumber {
        self.display_width.saturating_sub(self.margin.saturating_mul(2))
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::DISPLAY_480X272
    }
}

/// Colours of each kind of field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Page background.
    pub background: Colour,
    /// Value text.
    pub text: Colour,
    /// Label text.
    pub label_text: Colour,
    /// Informational text.
    pub info_text: Colour,
    /// Title bar text.
    pub title_bar_text: Colour,
    /// Title bar background.
    pub title_bar_background: Colour,
    /// Button captions.
    pub button_text: Colour,
    /// Top colour of the button gradient.
    pub button_background: Colour,
    /// Button border and gradients.
    pub button: ButtonColours,
    /// Popup background.
    pub popup_background: Colour,
    /// Popup frame.
    pub popup_border: Colour,
    /// Popup text.
    pub popup_text: Colour,
    /// Top colour of popup button gradients.
    pub popup_button_background: Colour,
    /// Progress bar fill.
    pub progress_bar: Colour,
    /// Warning text.
    pub error_text: Colour,
    /// Warning background.
    pub error_background: Colour,
    /// Pause button.
    pub pause_button_background: Colour,
    /// Resume button.
    pub resume_button_background: Colour,
    /// Cancel and factory reset buttons.
    pub reset_button_background: Colour,
}

impl Palette {
    /// Light text on a dark panel.
    pub const DARK: Self = Self {
        background: colour::BLACK,
        text: colour::WHITE,
        label_text: colour::from_rgb(200, 200, 200),
        info_text: colour::from_rgb(120, 200, 255),
        title_bar_text: colour::WHITE,
        title_bar_background: colour::from_rgb(32, 32, 96),
        button_text: colour::WHITE,
        button_background: colour::from_rgb(48, 48, 64),
        button: ButtonColours {
            border: colour::WHITE,
            gradient: colour::from_rgb(16, 16, 24),
            pressed_background: colour::from_rgb(16, 128, 16),
            pressed_gradient: colour::from_rgb(8, 64, 8),
        },
        popup_background: colour::from_rgb(32, 32, 48),
        popup_border: colour::WHITE,
        popup_text: colour::WHITE,
        popup_button_background: colour::from_rgb(64, 64, 96),
        progress_bar: colour::GREEN,
        error_text: colour::WHITE,
        error_background: colour::RED,
        pause_button_background: colour::from_rgb(255, 128, 0),
        resume_button_background: colour::from_rgb(0, 160, 0),
        reset_button_background: colour::from_rgb(192, 0, 0),
    };

    /// Build the style set for `config`.
    pub fn styles(&self, config: &LayoutConfig) -> Styles {
        let base = Style::DEFAULT
            .with_font(config.font())
            .with_margins(config.text_margin, 1)
            .with_button_colours(self.button);
        let button = base.with_colours(self.button_text, self.button_background);
        Styles {
            text: base.with_colours(self.text, self.background),
            label: base.with_colours(self.label_text, self.background),
            info: base.with_colours(self.info_text, self.background),
            title_bar: base.with_colours(self.title_bar_text, self.title_bar_background),
            button,
            popup_text: base.with_colours(self.popup_text, self.popup_background),
            popup_button: base.with_colours(self.button_text, self.popup_button_background),
            progress: base.with_colours(self.progress_bar, self.background),
            error: base.with_colours(self.error_text, self.error_background),
            pause_button: button.with_colours(self.button_text, self.pause_button_background),
            resume_button: button.with_colours(self.button_text, self.resume_button_background),
            reset_button: button.with_colours(self.button_text, self.reset_button_background),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::DARK
    }
}

/// One [`Style`] per kind of field, derived from a [`Palette`].
#[derive(Debug, Clone, Copy)]
pub struct Styles {
    /// Value fields.
    pub text: Style,
    /// Labels.
    pub label: Style,
    /// Informational text.
    pub info: Style,
    /// Title bar.
    pub title_bar: Style,
    /// Page buttons.
    pub button: Style,
    /// Popup text.
    pub popup_text: Style,
    /// Popup buttons.
    pub popup_button: Style,
    /// Progress bar.
    pub progress: Style,
    /// Warnings.
    pub error: Style,
    /// Pause button.
    pub pause_button: Style,
    /// Resume button.
    pub resume_button: Style,
    /// Cancel and factory reset buttons.
    pub reset_button: Style,
}

#[cfg(test)]
#[allow(clippy::indexing_slicing, clippy::arithmetic_side_effects)] // Tests index known-length fixtures
mod tests {
    use super::*;

    #[test]
    fn test_default_is_small_panel() {
        assert_eq!(LayoutConfig::default(), LayoutConfig::DISPLAY_480X272);
    }

    #[test]
    fn test_button_height_and_tab_row() {
        let c = LayoutConfig::DISPLAY_480X272;
        // 13 px font + 2 * 3 margin + 2 border.
        assert_eq!(c.button_height(), 21);
        assert_eq!(c.tab_row(), 272 - 4 - 21);

        let c = LayoutConfig::DISPLAY_800X480;
        assert_eq!(c.button_height(), 30);
        assert_eq!(c.tab_row(), 480 - 6 - 30);
    }

    #[test]
    fn test_content_rows_clear_the_tab_bar() {
        for c in [LayoutConfig::DISPLAY_480X272, LayoutConfig::DISPLAY_800X480] {
            assert!(c.row(8) + c.button_height() <= c.tab_row());
        }
    }

    #[test]
    fn test_styles_use_layout_font() {
        let c = LayoutConfig::DISPLAY_800X480;
        let s = Palette::DARK.styles(&c);
        assert_eq!(s.button.font_height(), 20);
        assert_eq!(s.button.text_margin, 4);
        assert_eq!(s.error.background, colour::RED);
        assert_eq!(s.pause_button.button, Palette::DARK.button);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_json_round_trip() {
        let json = serde_json::to_string(&LayoutConfig::DISPLAY_800X480).unwrap();
        let back: LayoutConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, LayoutConfig::DISPLAY_800X480);
    }
}
