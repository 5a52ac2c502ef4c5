//! Field kinds and their rendering contracts
//!
//! A [`Field`] is a positioned, coloured rectangle with a visibility flag and
//! a dirty (`changed`) flag. What it renders is one of a closed set of
//! kinds ([`FieldKind`]); what it can do beyond drawing is expressed by two
//! capability traits:
//!
//! - [`HasEvent`]: touching the field produces an event code + parameter
//! - [`TextContent`]: the field's content renders as a single line of text
//!
//! A field never draws itself unconditionally: [`Field::refresh`] paints only
//! when asked for a full redraw or when `changed` is set, and clears
//! `changed` afterwards. Visibility and popup obscuration are the owning
//! window's business.

mod button;
mod progress;
mod text;

use core::fmt;

use embedded_graphics::{prelude::*, primitives::Rectangle};

use crate::canvas::Canvas;
use crate::colour::Colour;
use crate::style::{font_height, Icon, PixelNumber, Style, TextAlignment};

pub use button::{Button, ButtonFace, ButtonRow};
pub use progress::ProgressBar;
pub use text::{text_buf, Number, NumericField, TextField};

/// Capacity of a field's dynamic text (text values, button captions).
pub const TEXT_CAPACITY: usize = 40;

/// Capacity of the line composed at draw time (label + value + units).
pub const LINE_CAPACITY: usize = 96;

/// Owned, bounded field text.
pub type TextBuf = heapless::String<TEXT_CAPACITY>;

/// Small integer identifying what a touch means. Zero means "no event".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EventCode(pub u8);

impl EventCode {
    /// The "no event" code. Always a safe no-op branch for callers.
    pub const NULL: Self = Self(0);

    /// Whether this is the "no event" code.
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

/// Event parameter, fixed per field at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    /// Integer parameter, also used for character codes.
    Integer(i32),
    /// Text parameter, usually a command string.
    Text(&'static str),
}

impl Param {
    /// Integer value, or 0 for a text parameter.
    pub fn as_integer(self) -> i32 {
        match self {
            Param::Integer(i) => i,
            Param::Text(_) => 0,
        }
    }

    /// Text value, or `None` for an integer parameter.
    pub fn as_text(self) -> Option<&'static str> {
        match self {
            Param::Integer(_) => None,
            Param::Text(s) => Some(s),
        }
    }
}

impl Default for Param {
    fn default() -> Self {
        Param::Integer(0)
    }
}

impl From<i32> for Param {
    fn from(value: i32) -> Self {
        Param::Integer(value)
    }
}

impl From<char> for Param {
    fn from(value: char) -> Self {
        Param::Integer(char_code(value))
    }
}

impl From<&'static str> for Param {
    fn from(value: &'static str) -> Self {
        Param::Text(value)
    }
}

impl From<Option<&'static str>> for Param {
    fn from(value: Option<&'static str>) -> Self {
        value.map_or_else(Param::default, Param::Text)
    }
}

/// A value written into a field with [`Field::set_value`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    /// Floating-point value.
    Float(f32),
    /// Integer value.
    Integer(i32),
    /// Text value.
    Text(&'a str),
}

impl From<f32> for Value<'_> {
    fn from(value: f32) -> Self {
        Value::Float(value)
    }
}

impl From<i32> for Value<'_> {
    fn from(value: i32) -> Self {
        Value::Integer(value)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(value: &'a str) -> Self {
        Value::Text(value)
    }
}

/// Capability of fields that produce events when touched.
pub trait HasEvent {
    /// Event code raised by a touch.
    fn event(&self) -> EventCode;

    /// Parameter of sub-button `index` (always 0 for single buttons).
    fn param(&self, index: usize) -> Param;

    /// Set the pressed state of sub-button `index`.
    ///
    /// Returns `true` only when the visible pressed state actually flipped.
    fn press(&mut self, pressed: bool, index: usize) -> bool;

    /// Sub-button hit by a touch `dx` pixels right of the field's left edge.
    fn hit_index(&self, _dx: PixelNumber) -> usize {
        0
    }
}

/// Capability of fields whose content renders as one line of text.
///
/// The line is composed from typed state every time it is drawn; nothing
/// keeps a formatted copy.
pub trait TextContent {
    /// Write the line as it should appear on screen.
    fn write_text(&self, out: &mut dyn fmt::Write) -> fmt::Result;
}

/// The closed set of field kinds.
pub enum FieldKind {
    /// Label plus free text.
    Text(TextField),
    /// Label, number and units.
    Numeric(NumericField),
    /// Single button.
    Button(Button),
    /// Row of character buttons sharing one field.
    ButtonRow(ButtonRow),
    /// Progress bar.
    Progress(ProgressBar),
}

impl FieldKind {
    /// Short name used in log events.
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Text(_) => "text",
            FieldKind::Numeric(_) => "numeric",
            FieldKind::Button(_) => "button",
            FieldKind::ButtonRow(_) => "button-row",
            FieldKind::Progress(_) => "progress-bar",
        }
    }
}

/// One positioned, styled, interactive-or-passive rectangular widget.
pub struct Field {
    x: PixelNumber,
    y: PixelNumber,
    width: PixelNumber,
    foreground: Colour,
    background: Colour,
    visible: bool,
    changed: bool,
    kind: FieldKind,
}

impl Field {
    fn with_kind(style: &Style, x: PixelNumber, y: PixelNumber, width: PixelNumber, kind: FieldKind) -> Self {
        Self {
            x,
            y,
            width,
            foreground: style.foreground,
            background: style.background,
            visible: true,
            changed: true,
            kind,
        }
    }

    /// Fixed text with no label.
    pub fn static_text(
        style: &Style,
        x: PixelNumber,
        y: PixelNumber,
        width: PixelNumber,
        align: TextAlignment,
        text: &str,
    ) -> Self {
        Self::with_kind(style, x, y, width, FieldKind::Text(TextField::new(style.font, align, None, text)))
    }

    /// Label followed by replaceable text.
    pub fn text(
        style: &Style,
        x: PixelNumber,
        y: PixelNumber,
        width: PixelNumber,
        align: TextAlignment,
        label: Option<&'static str>,
        text: &str,
    ) -> Self {
        Self::with_kind(style, x, y, width, FieldKind::Text(TextField::new(style.font, align, label, text)))
    }

    /// Label, float value shown with `decimals` places, units suffix.
    #[allow(clippy::too_many_arguments)]
    pub fn float(
        style: &Style,
        x: PixelNumber,
        y: PixelNumber,
        width: PixelNumber,
        align: TextAlignment,
        decimals: u8,
        label: Option<&'static str>,
        units: Option<&'static str>,
    ) -> Self {
        let number = Number::Float { value: 0.0, decimals };
        Self::with_kind(
            style,
            x,
            y,
            width,
            FieldKind::Numeric(NumericField::new(style.font, align, label, units, number)),
        )
    }

    /// Label, integer value, units suffix.
    pub fn integer(
        style: &Style,
        x: PixelNumber,
        y: PixelNumber,
        width: PixelNumber,
        align: TextAlignment,
        label: Option<&'static str>,
        units: Option<&'static str>,
    ) -> Self {
        Self::with_kind(
            style,
            x,
            y,
            width,
            FieldKind::Numeric(NumericField::new(style.font, align, label, units, Number::Integer(0))),
        )
    }

    /// Button captioned with text.
    pub fn text_button(
        style: &Style,
        x: PixelNumber,
        y: PixelNumber,
        width: PixelNumber,
        text: &str,
        event: EventCode,
        param: impl Into<Param>,
    ) -> Self {
        let face = ButtonFace::Text(text::text_buf(text));
        Self::with_kind(style, x, y, width, FieldKind::Button(Button::new(style, face, event, param.into())))
    }

    /// Button captioned with one character; its integer parameter is the character code.
    pub fn char_button(
        style: &Style,
        x: PixelNumber,
        y: PixelNumber,
        width: PixelNumber,
        c: char,
        event: EventCode,
    ) -> Self {
        let face = ButtonFace::Char(c);
        Self::with_kind(style, x, y, width, FieldKind::Button(Button::new(style, face, event, Param::from(c))))
    }

    /// Button showing an icon.
    pub fn icon_button(
        style: &Style,
        x: PixelNumber,
        y: PixelNumber,
        width: PixelNumber,
        icon: Icon,
        event: EventCode,
        param: impl Into<Param>,
    ) -> Self {
        let face = ButtonFace::Icon(icon);
        Self::with_kind(style, x, y, width, FieldKind::Button(Button::new(style, face, event, param.into())))
    }

    /// Button showing label, integer value and units. Event is set later with [`Field::set_event`].
    pub fn integer_button(
        style: &Style,
        x: PixelNumber,
        y: PixelNumber,
        width: PixelNumber,
        label: Option<&'static str>,
        units: Option<&'static str>,
    ) -> Self {
        let face = ButtonFace::Integer {
            label,
            units,
            value: 0,
        };
        Self::with_kind(
            style,
            x,
            y,
            width,
            FieldKind::Button(Button::new(style, face, EventCode::NULL, Param::default())),
        )
    }

    /// Button showing a float value with `decimals` places and units.
    pub fn float_button(
        style: &Style,
        x: PixelNumber,
        y: PixelNumber,
        width: PixelNumber,
        decimals: u8,
        units: Option<&'static str>,
    ) -> Self {
        let face = ButtonFace::Float {
            units,
            value: 0.0,
            decimals,
        };
        Self::with_kind(
            style,
            x,
            y,
            width,
            FieldKind::Button(Button::new(style, face, EventCode::NULL, Param::default())),
        )
    }

    /// Row of equally spaced one-character buttons held in a single field.
    ///
    /// Button `i` starts `i * step` pixels right of `x` and is
    /// `button_width` wide; its integer parameter is the code of the i-th
    /// character of `chars`.
    pub fn char_button_row(
        style: &Style,
        x: PixelNumber,
        y: PixelNumber,
        button_width: PixelNumber,
        step: PixelNumber,
        chars: &'static str,
        event: EventCode,
    ) -> Self {
        let row = ButtonRow::new(style, chars, button_width, step, event);
        let width = row.span();
        Self::with_kind(style, x, y, width, FieldKind::ButtonRow(row))
    }

    /// Bar filled in proportion to a percentage.
    pub fn progress_bar(
        style: &Style,
        x: PixelNumber,
        y: PixelNumber,
        width: PixelNumber,
        height: PixelNumber,
    ) -> Self {
        Self::with_kind(style, x, y, width, FieldKind::Progress(ProgressBar::new(height)))
    }

    // ── Geometry ─────────────────────────────────────────────────────────────

    /// Left edge in window coordinates.
    pub fn x(&self) -> PixelNumber {
        self.x
    }

    /// Top edge in window coordinates.
    pub fn y(&self) -> PixelNumber {
        self.y
    }

    /// Width in pixels.
    pub fn width(&self) -> PixelNumber {
        self.width
    }

    /// Height derived from the field kind (font, margins, icon or bar height).
    pub fn height(&self) -> PixelNumber {
        match &self.kind {
            FieldKind::Text(t) => font_height(t.font),
            FieldKind::Numeric(n) => font_height(n.font),
            FieldKind::Button(b) => b.height(),
            FieldKind::ButtonRow(r) => r.height(),
            FieldKind::Progress(p) => p.height(),
        }
    }

    /// Bounding box `[x, x+width-1] × [y, y+height-1]` in window coordinates.
    pub fn bounds(&self) -> Rectangle {
        self.bounds_at(Point::zero())
    }

    /// Bounding box translated by `offset`.
    pub fn bounds_at(&self, offset: Point) -> Rectangle {
        Rectangle::new(
            Point::new(
                i32::from(self.x).saturating_add(offset.x),
                i32::from(self.y).saturating_add(offset.y),
            ),
            Size::new(u32::from(self.width), u32::from(self.height())),
        )
    }

    // ── Flags ────────────────────────────────────────────────────────────────

    /// Whether the field is shown. Ignores popups.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the next partial refresh repaints the field.
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Mark the field for repaint on the next partial refresh.
    pub fn set_changed(&mut self) {
        self.changed = true;
        if let FieldKind::Progress(p) = &mut self.kind {
            p.invalidate();
        }
    }

    /// Show or hide the field.
    ///
    /// A hidden field that becomes visible is marked changed, since its
    /// value may have moved on while it was hidden. Repeating the current
    /// state is a no-op.
    pub fn show(&mut self, visible: bool) {
        if self.visible == visible {
            return;
        }
        self.visible = visible;
        if visible {
            self.changed = true;
            if let FieldKind::Progress(p) = &mut self.kind {
                p.invalidate();
            }
        }
    }

    // ── Kind access ──────────────────────────────────────────────────────────

    /// The kind-specific state.
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Whether touches can hit this field.
    pub fn is_button(&self) -> bool {
        self.event_source().is_some()
    }

    /// The field's event capability, if it has one.
    pub fn event_source(&self) -> Option<&dyn HasEvent> {
        match &self.kind {
            FieldKind::Button(b) => Some(b),
            FieldKind::ButtonRow(r) => Some(r),
            _ => None,
        }
    }

    fn event_source_mut(&mut self) -> Option<&mut dyn HasEvent> {
        match &mut self.kind {
            FieldKind::Button(b) => Some(b),
            FieldKind::ButtonRow(r) => Some(r),
            _ => None,
        }
    }

    /// The field's text capability, if it has one.
    pub fn text_content(&self) -> Option<&dyn TextContent> {
        match &self.kind {
            FieldKind::Text(t) => Some(t),
            FieldKind::Numeric(n) => Some(n),
            FieldKind::Button(b) => b.face().text_content(),
            FieldKind::ButtonRow(_) | FieldKind::Progress(_) => None,
        }
    }

    /// Event code, or [`EventCode::NULL`] for passive fields.
    pub fn event(&self) -> EventCode {
        self.event_source().map_or(EventCode::NULL, |source| source.event())
    }

    /// Whether the field (or any sub-button of a row) is pressed.
    pub fn is_pressed(&self) -> bool {
        match &self.kind {
            FieldKind::Button(b) => b.is_pressed(),
            FieldKind::ButtonRow(r) => r.which_pressed().is_some(),
            _ => false,
        }
    }

    // ── Mutators ─────────────────────────────────────────────────────────────

    /// Text or fill colour.
    pub fn foreground(&self) -> Colour {
        self.foreground
    }

    /// Background colour.
    pub fn background(&self) -> Colour {
        self.background
    }

    /// Change both colours. Marks the field changed when either differs.
    pub fn set_colours(&mut self, foreground: Colour, background: Colour) {
        if self.foreground != foreground || self.background != background {
            self.foreground = foreground;
            self.background = background;
            self.changed = true;
            if let FieldKind::Progress(p) = &mut self.kind {
                p.invalidate();
            }
        }
    }

    /// Store a new value. Always marks the field changed, even when the
    /// value is equal to the stored one.
    ///
    /// Floats and integers convert between each other; text only goes into
    /// text fields and text buttons.
    pub fn set_value<'a>(&mut self, value: impl Into<Value<'a>>) {
        let value = value.into();
        let accepted = match &mut self.kind {
            FieldKind::Text(t) => t.set_value(value),
            FieldKind::Numeric(n) => n.set_value(value),
            FieldKind::Button(b) => b.set_value(value),
            FieldKind::ButtonRow(_) | FieldKind::Progress(_) => false,
        };
        if accepted {
            self.changed = true;
        } else {
            tracing::warn!(kind = self.kind.name(), "value does not fit field kind; ignored");
        }
    }

    /// Replace the text of a text field or text button.
    pub fn set_text(&mut self, text: &str) {
        self.set_value(Value::Text(text));
    }

    /// Replace the label of a text, numeric or integer-button field.
    pub fn set_label(&mut self, label: &'static str) {
        let accepted = match &mut self.kind {
            FieldKind::Text(t) => {
                t.label = Some(label);
                true
            }
            FieldKind::Numeric(n) => {
                n.label = Some(label);
                true
            }
            FieldKind::Button(b) => b.set_label(label),
            _ => false,
        };
        if accepted {
            self.changed = true;
        } else {
            tracing::warn!(kind = self.kind.name(), "field has no label; ignored");
        }
    }

    /// Add `amount` to a numeric field or numeric button.
    pub fn increment(&mut self, amount: i32) {
        let accepted = match &mut self.kind {
            FieldKind::Numeric(n) => {
                n.number.increment(amount);
                true
            }
            FieldKind::Button(b) => b.increment(amount),
            _ => false,
        };
        if accepted {
            self.changed = true;
        } else {
            tracing::warn!(kind = self.kind.name(), "field is not numeric; increment ignored");
        }
    }

    /// Integer value of an integer field or integer button.
    pub fn integer_value(&self) -> Option<i32> {
        match &self.kind {
            FieldKind::Numeric(n) => match n.number {
                Number::Integer(v) => Some(v),
                Number::Float { .. } => None,
            },
            FieldKind::Button(b) => b.integer_value(),
            _ => None,
        }
    }

    /// Float value of a float field or float button.
    pub fn float_value(&self) -> Option<f32> {
        match &self.kind {
            FieldKind::Numeric(n) => match n.number {
                Number::Float { value, .. } => Some(value),
                Number::Integer(_) => None,
            },
            FieldKind::Button(b) => b.float_value(),
            _ => None,
        }
    }

    /// Set a progress bar's percentage (clamped to 100).
    pub fn set_percent(&mut self, percent: u8) {
        if let FieldKind::Progress(p) = &mut self.kind {
            p.set_percent(percent);
            self.changed = true;
        } else {
            tracing::warn!(kind = self.kind.name(), "not a progress bar; percent ignored");
        }
    }

    /// Percentage of a progress bar.
    pub fn percent(&self) -> Option<u8> {
        match &self.kind {
            FieldKind::Progress(p) => Some(p.percent()),
            _ => None,
        }
    }

    /// Change the event raised by a button. Button rows keep their
    /// per-character parameters and take only the code.
    pub fn set_event(&mut self, event: EventCode, param: impl Into<Param>) {
        let accepted = match &mut self.kind {
            FieldKind::Button(b) => {
                b.set_event(event, param.into());
                true
            }
            FieldKind::ButtonRow(r) => {
                r.set_event(event);
                true
            }
            _ => false,
        };
        if !accepted {
            tracing::warn!(kind = self.kind.name(), "not a button; event ignored");
        }
    }

    /// Press or release sub-button `index`. Marks the field changed only
    /// when the pressed state actually flips.
    pub fn press(&mut self, pressed: bool, index: usize) {
        if let Some(source) = self.event_source_mut() {
            if source.press(pressed, index) {
                self.changed = true;
            }
        }
    }

    // ── Rendering ────────────────────────────────────────────────────────────

    /// Paint the field at `offset` if `full` is set or the field changed,
    /// then clear `changed`.
    pub fn refresh<C: Canvas>(&mut self, canvas: &mut C, full: bool, offset: Point) -> Result<(), C::Error> {
        if !(full || self.changed) {
            return Ok(());
        }
        let rect = self.bounds_at(offset);
        let (fg, bg) = (self.foreground, self.background);
        match &mut self.kind {
            FieldKind::Text(t) => text::draw_line_field(canvas, t.font, t.align, &*t, rect, fg, bg)?,
            FieldKind::Numeric(n) => text::draw_line_field(canvas, n.font, n.align, &*n, rect, fg, bg)?,
            FieldKind::Button(b) => b.draw(canvas, rect, fg, bg)?,
            FieldKind::ButtonRow(r) => r.draw(canvas, rect, fg, bg)?,
            FieldKind::Progress(p) => p.draw(canvas, rect, full, fg, bg)?,
        }
        self.changed = false;
        Ok(())
    }
}

/// Compose a field's line of text into a bounded buffer, truncating on overflow.
pub fn compose_line(content: &dyn TextContent) -> heapless::String<LINE_CAPACITY> {
    let mut line = heapless::String::new();
    // Truncation is the only failure mode and is intended.
    let _ = content.write_text(&mut Truncating(&mut line));
    line
}

/// `fmt::Write` adapter that drops whatever does not fit.
struct Truncating<'a, const N: usize>(&'a mut heapless::String<N>);

impl<const N: usize> fmt::Write for Truncating<'_, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

fn char_code(c: char) -> i32 {
    i32::try_from(u32::from(c)).unwrap_or(0)
}
