//! Buttons: single buttons with a text/char/icon/number face, and rows of
//! character buttons packed into one field.

use core::fmt;

use embedded_graphics::{prelude::*, primitives::Rectangle};

use super::text::{text_buf, Number};
use super::{compose_line, EventCode, HasEvent, Param, TextBuf, TextContent, Value};
use crate::canvas::{aligned_origin, inset, offset, Canvas};
use crate::colour::{blend, Colour};
use crate::style::{font_height, ButtonColours, Font, Icon, PixelNumber, Style, TextAlignment, BUTTON_GRAD_STEP};

/// What a single button shows.
pub enum ButtonFace {
    /// Caption text.
    Text(TextBuf),
    /// A single character.
    Char(char),
    /// A bitmap.
    Icon(Icon),
    /// Integer value with optional label and units.
    Integer {
        /// Text before the value.
        label: Option<&'static str>,
        /// Text after the value.
        units: Option<&'static str>,
        /// Current value.
        value: i32,
    },
    /// Fixed-point value with optional units.
    Float {
        /// Text after the value.
        units: Option<&'static str>,
        /// Current value.
        value: f32,
        /// Digits after the decimal point.
        decimals: u8,
    },
}

impl ButtonFace {
    /// Text capability; icons have none.
    pub fn text_content(&self) -> Option<&dyn TextContent> {
        match self {
            ButtonFace::Icon(_) => None,
            _ => Some(self),
        }
    }
}

impl TextContent for ButtonFace {
    fn write_text(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        match self {
            ButtonFace::Text(s) => out.write_str(s),
            ButtonFace::Char(c) => out.write_char(*c),
            ButtonFace::Icon(_) => Ok(()),
            ButtonFace::Integer { label, units, value } => {
                if let Some(label) = label {
                    out.write_str(label)?;
                }
                write!(out, "{value}")?;
                if let Some(units) = units {
                    out.write_str(units)?;
                }
                Ok(())
            }
            ButtonFace::Float {
                units,
                value,
                decimals,
            } => {
                write!(
                    out,
                    "{}",
                    Number::Float {
                        value: *value,
                        decimals: *decimals
                    }
                )?;
                if let Some(units) = units {
                    out.write_str(units)?;
                }
                Ok(())
            }
        }
    }
}

/// A single touchable button.
pub struct Button {
    font: &'static Font,
    colours: ButtonColours,
    text_margin: PixelNumber,
    icon_margin: PixelNumber,
    event: EventCode,
    param: Param,
    pressed: bool,
    face: ButtonFace,
}

impl Button {
    pub(crate) fn new(style: &Style, face: ButtonFace, event: EventCode, param: Param) -> Self {
        Self {
            font: style.font,
            colours: style.button,
            text_margin: style.text_margin,
            icon_margin: style.icon_margin,
            event,
            param,
            pressed: false,
            face,
        }
    }

    /// What the button shows.
    pub fn face(&self) -> &ButtonFace {
        &self.face
    }

    /// Whether the button is drawn pressed.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Border, gradient and pressed colours.
    pub fn colours(&self) -> ButtonColours {
        self.colours
    }

    pub(crate) fn height(&self) -> PixelNumber {
        match &self.face {
            ButtonFace::Icon(icon) => icon
                .height
                .saturating_add(self.icon_margin.saturating_mul(2))
                .saturating_add(2),
            _ => font_height(self.font)
                .saturating_add(self.text_margin.saturating_mul(2))
                .saturating_add(2),
        }
    }

    pub(crate) fn set_value(&mut self, value: Value<'_>) -> bool {
        match (&mut self.face, value) {
            (ButtonFace::Text(buf), Value::Text(s)) => *buf = text_buf(s),
            (ButtonFace::Integer { value: v, .. }, Value::Integer(i)) => *v = i,
            #[allow(clippy::cast_possible_truncation)]
            (ButtonFace::Integer { value: v, .. }, Value::Float(f)) => *v = f as i32,
            (ButtonFace::Float { value: v, .. }, Value::Float(f)) => *v = f,
            #[allow(clippy::cast_precision_loss)]
            (ButtonFace::Float { value: v, .. }, Value::Integer(i)) => *v = i as f32,
            _ => return false,
        }
        true
    }

    pub(crate) fn set_label(&mut self, text: &'static str) -> bool {
        match &mut self.face {
            ButtonFace::Integer { label, .. } => {
                *label = Some(text);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn increment(&mut self, amount: i32) -> bool {
        match &mut self.face {
            ButtonFace::Integer { value, .. } => *value = value.saturating_add(amount),
            #[allow(clippy::cast_precision_loss)]
            ButtonFace::Float { value, .. } => *value += amount as f32,
            _ => return false,
        }
        true
    }

    pub(crate) fn integer_value(&self) -> Option<i32> {
        match self.face {
            ButtonFace::Integer { value, .. } => Some(value),
            _ => None,
        }
    }

    pub(crate) fn float_value(&self) -> Option<f32> {
        match self.face {
            ButtonFace::Float { value, .. } => Some(value),
            _ => None,
        }
    }

    pub(crate) fn set_event(&mut self, event: EventCode, param: Param) {
        self.event = event;
        self.param = param;
    }

    pub(crate) fn draw<C: Canvas>(&self, canvas: &mut C, rect: Rectangle, fg: Colour, bg: Colour) -> Result<(), C::Error> {
        draw_outline(canvas, rect, bg, &self.colours, self.pressed)?;
        match &self.face {
            ButtonFace::Icon(icon) => {
                let slack_x = rect.size.width.saturating_sub(u32::from(icon.width)) / 2;
                let slack_y = rect.size.height.saturating_sub(u32::from(icon.height)) / 2;
                let top_left = offset(rect.top_left, slack_x, slack_y);
                canvas.draw_icon(icon, top_left)
            }
            face => draw_caption(canvas, self.font, face, inset(rect, 1), fg),
        }
    }
}

impl HasEvent for Button {
    fn event(&self) -> EventCode {
        self.event
    }

    fn param(&self, _index: usize) -> Param {
        self.param
    }

    fn press(&mut self, pressed: bool, _index: usize) -> bool {
        if self.pressed == pressed {
            return false;
        }
        self.pressed = pressed;
        true
    }
}

/// A row of equally spaced one-character buttons held in one field.
///
/// Tracks which sub-button is pressed instead of a single flag.
pub struct ButtonRow {
    font: &'static Font,
    colours: ButtonColours,
    text_margin: PixelNumber,
    event: EventCode,
    chars: &'static str,
    button_width: PixelNumber,
    step: PixelNumber,
    count: u8,
    which_pressed: Option<u8>,
}

impl ButtonRow {
    pub(crate) fn new(
        style: &Style,
        chars: &'static str,
        button_width: PixelNumber,
        step: PixelNumber,
        event: EventCode,
    ) -> Self {
        let count = u8::try_from(chars.chars().count()).unwrap_or(u8::MAX);
        Self {
            font: style.font,
            colours: style.button,
            text_margin: style.text_margin,
            event,
            chars,
            button_width,
            step,
            count,
            which_pressed: None,
        }
    }

    /// Number of buttons in the row.
    pub fn count(&self) -> usize {
        usize::from(self.count)
    }

    /// Horizontal distance between the left edges of adjacent buttons.
    pub fn step(&self) -> PixelNumber {
        self.step
    }

    /// Index of the pressed sub-button, if any.
    pub fn which_pressed(&self) -> Option<usize> {
        self.which_pressed.map(usize::from)
    }

    /// Total width covered by the row.
    pub(crate) fn span(&self) -> PixelNumber {
        match self.count.checked_sub(1) {
            None => 0,
            Some(gaps) => self
                .step
                .saturating_mul(PixelNumber::from(gaps))
                .saturating_add(self.button_width),
        }
    }

    pub(crate) fn height(&self) -> PixelNumber {
        font_height(self.font)
            .saturating_add(self.text_margin.saturating_mul(2))
            .saturating_add(2)
    }

    pub(crate) fn set_event(&mut self, event: EventCode) {
        self.event = event;
    }

    fn char_at(&self, index: usize) -> Option<char> {
        self.chars.chars().nth(index)
    }

    pub(crate) fn draw<C: Canvas>(&self, canvas: &mut C, rect: Rectangle, fg: Colour, bg: Colour) -> Result<(), C::Error> {
        for (i, c) in self.chars.chars().take(self.count()).enumerate() {
            let left = u32::from(self.step).saturating_mul(u32::try_from(i).unwrap_or(0));
            let button = Rectangle::new(
                offset(rect.top_left, left, 0),
                Size::new(u32::from(self.button_width), rect.size.height),
            );
            let pressed = self.which_pressed() == Some(i);
            draw_outline(canvas, button, bg, &self.colours, pressed)?;
            draw_caption(canvas, self.font, &ButtonFace::Char(c), inset(button, 1), fg)?;
        }
        Ok(())
    }
}

impl HasEvent for ButtonRow {
    fn event(&self) -> EventCode {
        self.event
    }

    fn param(&self, index: usize) -> Param {
        self.char_at(index).map_or_else(Param::default, Param::from)
    }

    fn press(&mut self, pressed: bool, index: usize) -> bool {
        let next = if pressed { u8::try_from(index).ok() } else { None };
        if self.which_pressed == next {
            return false;
        }
        self.which_pressed = next;
        true
    }

    fn hit_index(&self, dx: PixelNumber) -> usize {
        if self.step == 0 || self.count == 0 {
            return 0;
        }
        let last = usize::from(self.count).saturating_sub(1);
        usize::from(dx.checked_div(self.step).unwrap_or(0)).min(last)
    }
}

/// Border in the border colour, then a banded vertical gradient inside it.
fn draw_outline<C: Canvas>(
    canvas: &mut C,
    rect: Rectangle,
    background: Colour,
    colours: &ButtonColours,
    pressed: bool,
) -> Result<(), C::Error> {
    canvas.fill_rect(rect, colours.border)?;
    let (from, to) = if pressed {
        (colours.pressed_background, colours.pressed_gradient)
    } else {
        (background, colours.gradient)
    };
    gradient_fill(canvas, inset(rect, 1), from, to)
}

fn gradient_fill<C: Canvas>(canvas: &mut C, rect: Rectangle, from: Colour, to: Colour) -> Result<(), C::Error> {
    let height = rect.size.height;
    if height == 0 || rect.size.width == 0 {
        return Ok(());
    }
    let bands = height.div_ceil(BUTTON_GRAD_STEP);
    for band in 0..bands {
        let top = band.saturating_mul(BUTTON_GRAD_STEP);
        let band_height = BUTTON_GRAD_STEP.min(height.saturating_sub(top));
        let colour = blend(from, to, band, bands.saturating_sub(1));
        let strip = Rectangle::new(
            offset(rect.top_left, 0, top),
            Size::new(rect.size.width, band_height),
        );
        canvas.fill_rect(strip, colour)?;
    }
    Ok(())
}

fn draw_caption<C: Canvas>(
    canvas: &mut C,
    font: &'static Font,
    face: &ButtonFace,
    rect: Rectangle,
    fg: Colour,
) -> Result<(), C::Error> {
    let line = compose_line(face);
    if line.is_empty() {
        return Ok(());
    }
    let origin = aligned_origin(canvas, font, &line, rect, TextAlignment::Centre);
    canvas.draw_text(font, &line, origin, rect, fg, None)
}

#[cfg(test)]
#[allow(clippy::indexing_slicing, clippy::arithmetic_side_effects)] // Tests index known-length fixtures
mod tests {
    use super::*;
    use crate::field::Field;
    use crate::style::Style;
    use crate::test_support::{Op, RecordingCanvas};

    const EV: EventCode = EventCode(7);

    fn row() -> Field {
        // 8 buttons, 18 wide at a step of 20, from x = 20: spans [20, 178].
        Field::char_button_row(&Style::DEFAULT, 20, 50, 18, 20, "ABCDEFGH", EV)
    }

    #[test]
    fn test_text_button_height_uses_margins() {
        let style = Style::DEFAULT.with_margins(3, 0);
        let f = Field::text_button(&style, 0, 0, 60, "Go", EV, 0);
        assert_eq!(f.height(), 20 + 2 * 3 + 2);
    }

    #[test]
    fn test_icon_button_height_uses_icon() {
        static PIXELS: [u8; 2 * 4 * 6] = [0; 48];
        let icon = Icon::new(4, 6, &PIXELS);
        let style = Style::DEFAULT.with_margins(3, 2);
        let f = Field::icon_button(&style, 0, 0, 60, icon, EV, 0);
        assert_eq!(f.height(), 6 + 2 * 2 + 2);
    }

    #[test]
    fn test_press_marks_changed_only_on_flip() {
        let mut f = Field::text_button(&Style::DEFAULT, 0, 0, 60, "Go", EV, 0);
        f.refresh(&mut RecordingCanvas::default(), true, Point::zero()).unwrap();
        f.press(false, 0);
        assert!(!f.is_changed());
        f.press(true, 0);
        assert!(f.is_changed());
        assert!(f.is_pressed());
        f.refresh(&mut RecordingCanvas::default(), false, Point::zero()).unwrap();
        f.press(true, 0);
        assert!(!f.is_changed());
    }

    #[test]
    fn test_char_button_param_is_char_code() {
        let f = Field::char_button(&Style::DEFAULT, 0, 0, 20, 'Q', EV);
        assert_eq!(f.event_source().unwrap().param(0), Param::Integer('Q' as i32));
    }

    #[test]
    fn test_integer_button_value_and_increment() {
        let mut f = Field::integer_button(&Style::DEFAULT, 0, 0, 100, Some("Speed "), Some("%"));
        f.set_value(100);
        f.increment(-5);
        assert_eq!(f.integer_value(), Some(95));
        let line = compose_line(f.text_content().unwrap());
        assert_eq!(line.as_str(), "Speed 95%");
    }

    #[test]
    fn test_float_button_text() {
        let mut f = Field::float_button(&Style::DEFAULT, 0, 0, 100, 2, Some("mm"));
        f.set_value(0.5_f32);
        f.increment(1);
        assert_eq!(f.float_value(), Some(1.5));
        assert_eq!(compose_line(f.text_content().unwrap()).as_str(), "1.50mm");
    }

    #[test]
    fn test_set_event_replaces_code_and_param() {
        let mut f = Field::integer_button(&Style::DEFAULT, 0, 0, 100, None, None);
        assert_eq!(f.event(), EventCode::NULL);
        f.set_event(EV, "M220 S");
        assert_eq!(f.event(), EV);
        assert_eq!(f.event_source().unwrap().param(0), Param::Text("M220 S"));
    }

    #[test]
    fn test_row_width_spans_all_buttons() {
        let f = row();
        assert_eq!(f.width(), 20 * 7 + 18);
        assert_eq!(f.bounds().top_left, Point::new(20, 50));
    }

    #[test]
    fn test_row_hit_index() {
        let f = row();
        let source = f.event_source().unwrap();
        assert_eq!(source.hit_index(97 - 20), 3);
        assert_eq!(source.hit_index(0), 0);
        assert_eq!(source.hit_index(1000), 7);
    }

    #[test]
    fn test_row_params_follow_chars() {
        let f = row();
        let source = f.event_source().unwrap();
        assert_eq!(source.param(0), Param::Integer('A' as i32));
        assert_eq!(source.param(7), Param::Integer('H' as i32));
        assert_eq!(source.param(8), Param::Integer(0));
    }

    #[test]
    fn test_row_which_pressed() {
        let mut f = row();
        f.refresh(&mut RecordingCanvas::default(), true, Point::zero()).unwrap();
        f.press(true, 3);
        assert!(f.is_changed());
        assert!(f.is_pressed());
        f.refresh(&mut RecordingCanvas::default(), false, Point::zero()).unwrap();
        f.press(true, 3);
        assert!(!f.is_changed());
        f.press(false, 3);
        assert!(f.is_changed());
        assert!(!f.is_pressed());
    }

    #[test]
    fn test_row_draws_every_caption() {
        let mut f = row();
        let mut canvas = RecordingCanvas::default();
        f.refresh(&mut canvas, true, Point::zero()).unwrap();
        let captions: std::vec::Vec<_> = canvas
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(captions, ["A", "B", "C", "D", "E", "F", "G", "H"]);
    }

    #[test]
    fn test_pressed_button_uses_pressed_colours() {
        let style = Style::DEFAULT;
        let mut f = Field::text_button(&style, 0, 0, 60, "Go", EV, 0);
        f.press(true, 0);
        let mut canvas = RecordingCanvas::default();
        f.refresh(&mut canvas, true, Point::zero()).unwrap();
        assert!(canvas
            .ops
            .iter()
            .any(|op| matches!(op, Op::Fill { colour, .. } if *colour == style.button.pressed_background)));
    }

    #[test]
    fn test_gradient_band_count() {
        let mut canvas = RecordingCanvas::default();
        let rect = Rectangle::new(Point::zero(), Size::new(10, 25));
        gradient_fill(&mut canvas, rect, crate::colour::BLACK, crate::colour::WHITE).unwrap();
        assert_eq!(canvas.ops.len(), 3);
        assert!(matches!(
            canvas.ops.last(),
            Some(Op::Fill { rect, colour }) if rect.size.height == 1 && *colour == crate::colour::WHITE
        ));
    }
}
