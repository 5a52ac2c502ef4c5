//! Text-bearing fields: labels, text values, floats and integers

use core::fmt;

use embedded_graphics::primitives::Rectangle;

use super::{compose_line, TextBuf, TextContent, Value};
use crate::canvas::{aligned_origin, Canvas};
use crate::colour::Colour;
use crate::style::{Font, TextAlignment};

/// Optional label followed by replaceable text.
pub struct TextField {
    pub(crate) font: &'static Font,
    pub(crate) align: TextAlignment,
    pub(crate) label: Option<&'static str>,
    text: TextBuf,
}

impl TextField {
    pub(crate) fn new(font: &'static Font, align: TextAlignment, label: Option<&'static str>, text: &str) -> Self {
        Self {
            font,
            align,
            label,
            text: text_buf(text),
        }
    }

    /// Prefix drawn before the text.
    pub fn label(&self) -> Option<&'static str> {
        self.label
    }

    /// Current text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn set_value(&mut self, value: Value<'_>) -> bool {
        match value {
            Value::Text(s) => {
                self.text = text_buf(s);
                true
            }
            Value::Float(_) | Value::Integer(_) => false,
        }
    }
}

impl TextContent for TextField {
    fn write_text(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        if let Some(label) = self.label {
            out.write_str(label)?;
        }
        out.write_str(&self.text)
    }
}

/// Typed numeric state of a numeric field or button.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Fixed-point value shown with `decimals` digits.
    Float {
        /// Value shown.
        value: f32,
        /// Digits after the decimal point.
        decimals: u8,
    },
    /// Whole number.
    Integer(i32),
}

impl Number {
    pub(crate) fn set(&mut self, value: Value<'_>) -> bool {
        match (self, value) {
            (Number::Float { value: v, .. }, Value::Float(f)) => *v = f,
            #[allow(clippy::cast_precision_loss)]
            (Number::Float { value: v, .. }, Value::Integer(i)) => *v = i as f32,
            (Number::Integer(v), Value::Integer(i)) => *v = i,
            #[allow(clippy::cast_possible_truncation)]
            (Number::Integer(v), Value::Float(f)) => *v = f as i32,
            (_, Value::Text(_)) => return false,
        }
        true
    }

    pub(crate) fn increment(&mut self, amount: i32) {
        match self {
            #[allow(clippy::cast_precision_loss)]
            Number::Float { value, .. } => *value += amount as f32,
            Number::Integer(v) => *v = v.saturating_add(amount),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Number::Float { value, decimals } => write!(f, "{:.*}", usize::from(decimals), value),
            Number::Integer(v) => write!(f, "{v}"),
        }
    }
}

/// Label, number, units.
pub struct NumericField {
    pub(crate) font: &'static Font,
    pub(crate) align: TextAlignment,
    pub(crate) label: Option<&'static str>,
    units: Option<&'static str>,
    pub(crate) number: Number,
}

impl NumericField {
    pub(crate) fn new(
        font: &'static Font,
        align: TextAlignment,
        label: Option<&'static str>,
        units: Option<&'static str>,
        number: Number,
    ) -> Self {
        Self {
            font,
            align,
            label,
            units,
            number,
        }
    }

    /// Current value.
    pub fn number(&self) -> Number {
        self.number
    }

    pub(crate) fn set_value(&mut self, value: Value<'_>) -> bool {
        self.number.set(value)
    }
}

impl TextContent for NumericField {
    fn write_text(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        if let Some(label) = self.label {
            out.write_str(label)?;
        }
        write!(out, "{}", self.number)?;
        if let Some(units) = self.units {
            out.write_str(units)?;
        }
        Ok(())
    }
}

/// Copy `s` into field storage, truncated at a character boundary.
pub fn text_buf(s: &str) -> TextBuf {
    let mut buf = TextBuf::new();
    for c in s.chars() {
        if buf.push(c).is_err() {
            break;
        }
    }
    buf
}

/// Clear the field to its background and print its line at the alignment anchor.
pub(crate) fn draw_line_field<C: Canvas>(
    canvas: &mut C,
    font: &'static Font,
    align: TextAlignment,
    content: &dyn TextContent,
    rect: Rectangle,
    fg: Colour,
    bg: Colour,
) -> Result<(), C::Error> {
    canvas.fill_rect(rect, bg)?;
    let line = compose_line(content);
    let origin = aligned_origin(canvas, font, &line, rect, align);
    canvas.draw_text(font, &line, origin, rect, fg, Some(bg))
}
