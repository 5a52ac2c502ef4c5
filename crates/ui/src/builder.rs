//! Field builders
//!
//! Helpers that place buttons on a column grid and lay out rows of popup
//! buttons, so page code reads as a list of rows rather than pixel sums.

use panel_fields::prelude::*;

use crate::config::{LayoutConfig, Palette, Styles};
use crate::events::Event;

/// Everything a builder needs: geometry, colours and the derived styles.
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    /// Geometry.
    pub config: LayoutConfig,
    /// Colours.
    pub palette: Palette,
    /// Styles derived from `palette` and `config`.
    pub styles: Styles,
}

impl Layout {
    /// Derive the styles for `config` and `palette`.
    pub fn new(config: LayoutConfig, palette: Palette) -> Self {
        Self {
            config,
            palette,
            styles: palette.styles(&config),
        }
    }

    /// Width of one column when the screen is split into `cols` columns.
    pub fn column_width(&self, cols: u16) -> PixelNumber {
        let c = &self.config;
        let cols = cols.max(1);
        c.content_width()
            .saturating_add(c.field_spacing)
            .checked_div(cols)
            .unwrap_or(0)
            .saturating_sub(c.field_spacing)
    }

    /// Left edge of column `col` of `cols`.
    pub fn column_x(&self, col: u16, cols: u16) -> PixelNumber {
        let step = self.column_width(cols).saturating_add(self.config.field_spacing);
        col.saturating_mul(step).saturating_add(self.config.margin)
    }

    /// Height of a single-row popup bar.
    pub fn popup_bar_height(&self) -> PixelNumber {
        self.config
            .button_height()
            .saturating_add(self.config.popup_top_margin.saturating_mul(2))
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(LayoutConfig::default(), Palette::default())
    }
}

/// Horizontal slots for `count` buttons spread over `total_width` pixels
/// starting at `left`, separated by `spacing`. Yields `(x, width)`.
pub fn row_slots(
    left: PixelNumber,
    total_width: PixelNumber,
    spacing: PixelNumber,
    count: usize,
) -> impl Iterator<Item = (PixelNumber, PixelNumber)> {
    let n = PixelNumber::try_from(count.max(1)).unwrap_or(PixelNumber::MAX);
    let step = total_width.saturating_add(spacing).checked_div(n).unwrap_or(0);
    let width = step.saturating_sub(spacing);
    (0..n)
        .take(count)
        .map(move |i| (left.saturating_add(i.saturating_mul(step)), width))
}

/// Text button in column `col` of a `cols`-column grid at height `y`.
#[allow(clippy::too_many_arguments)]
pub fn add_text_button(
    mw: &mut MainWindow,
    layout: &Layout,
    style: &Style,
    y: PixelNumber,
    col: u16,
    cols: u16,
    text: &str,
    event: Event,
    param: impl Into<Param>,
) -> Result<FieldId, PanelError> {
    let x = layout.column_x(col, cols);
    let width = layout.column_width(cols);
    mw.add_field(Field::text_button(style, x, y, width, text, event.code(), param))
}

/// Integer button in column `col` of a `cols`-column grid. Its parameter is 0.
#[allow(clippy::too_many_arguments)]
pub fn add_integer_button(
    mw: &mut MainWindow,
    layout: &Layout,
    style: &Style,
    y: PixelNumber,
    col: u16,
    cols: u16,
    label: Option<&'static str>,
    units: Option<&'static str>,
    event: Event,
) -> Result<FieldId, PanelError> {
    let x = layout.column_x(col, cols);
    let width = layout.column_width(cols);
    let mut field = Field::integer_button(style, x, y, width, label, units);
    field.set_event(event.code(), 0);
    mw.add_field(field)
}

/// Popup row of text buttons with string parameters, one per caption.
#[allow(clippy::too_many_arguments)]
pub fn create_string_button_row(
    mw: &mut MainWindow,
    popup: PopupId,
    style: &Style,
    top: PixelNumber,
    left: PixelNumber,
    total_width: PixelNumber,
    spacing: PixelNumber,
    texts: &[&'static str],
    params: &[&'static str],
    event: Event,
) -> Result<(), PanelError> {
    for ((x, width), (text, param)) in row_slots(left, total_width, spacing, texts.len()).zip(texts.iter().zip(params)) {
        mw.add_popup_field(popup, Field::text_button(style, x, top, width, text, event.code(), *param))?;
    }
    Ok(())
}

/// Popup row of text buttons with integer parameters. A zero parameter
/// raises `zero_event` instead of `event` when one is given.
#[allow(clippy::too_many_arguments)]
pub fn create_int_button_row(
    mw: &mut MainWindow,
    popup: PopupId,
    style: &Style,
    top: PixelNumber,
    left: PixelNumber,
    total_width: PixelNumber,
    spacing: PixelNumber,
    texts: &[&'static str],
    params: &[i32],
    event: Event,
    zero_event: Option<Event>,
) -> Result<(), PanelError> {
    for ((x, width), (text, &param)) in row_slots(left, total_width, spacing, texts.len()).zip(texts.iter().zip(params)) {
        let ev = match zero_event {
            Some(zero) if param == 0 => zero,
            _ => event,
        };
        mw.add_popup_field(popup, Field::text_button(style, x, top, width, text, ev.code(), param))?;
    }
    Ok(())
}

/// Single-row popup of string-parameter buttons.
pub fn create_string_popup_bar(
    mw: &mut MainWindow,
    layout: &Layout,
    width: PixelNumber,
    texts: &[&'static str],
    params: &[&'static str],
    event: Event,
) -> Result<PopupId, PanelError> {
    let c = &layout.config;
    let popup = add_popup(mw, layout, width, layout.popup_bar_height())?;
    create_string_button_row(
        mw,
        popup,
        &layout.styles.popup_button,
        c.popup_top_margin,
        c.popup_side_margin,
        width.saturating_sub(c.popup_side_margin.saturating_mul(2)),
        c.popup_field_spacing,
        texts,
        params,
        event,
    )?;
    Ok(popup)
}

/// Single-row popup of integer-parameter buttons.
#[allow(clippy::too_many_arguments)]
pub fn create_int_popup_bar(
    mw: &mut MainWindow,
    layout: &Layout,
    width: PixelNumber,
    texts: &[&'static str],
    params: &[i32],
    event: Event,
    zero_event: Option<Event>,
) -> Result<PopupId, PanelError> {
    let c = &layout.config;
    let popup = add_popup(mw, layout, width, layout.popup_bar_height())?;
    create_int_button_row(
        mw,
        popup,
        &layout.styles.popup_button,
        c.popup_top_margin,
        c.popup_side_margin,
        width.saturating_sub(c.popup_side_margin.saturating_mul(2)),
        c.popup_field_spacing,
        texts,
        params,
        event,
        zero_event,
    )?;
    Ok(popup)
}

/// Empty popup in the palette's popup colours.
pub fn add_popup(
    mw: &mut MainWindow,
    layout: &Layout,
    width: PixelNumber,
    height: PixelNumber,
) -> Result<PopupId, PanelError> {
    mw.add_popup(width, height, layout.palette.popup_background, layout.palette.popup_border)
}

/// Add a field that starts hidden.
pub fn add_hidden(mw: &mut MainWindow, mut field: Field) -> Result<FieldId, PanelError> {
    field.show(false);
    mw.add_field(field)
}
