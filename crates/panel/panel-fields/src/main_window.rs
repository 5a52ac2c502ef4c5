//! The persistent page + popup compositor
//!
//! [`MainWindow`] owns every field (in its arena), the base window showing
//! the current page, and the pre-built popups. At most one popup is active.
//!
//! # Redraw protocol
//!
//! A refresh repaints only what is stale:
//!
//! - fields whose `changed` flag is set
//! - everything, after a page switch or when asked for a full refresh
//! - areas recorded as damaged (a dismissed popup, a hidden field) are
//!   cleared to their background and every field over them is redrawn
//!
//! Base fields under the active popup are neither drawn nor hit-tested.
//! Their `changed` flags survive until they are uncovered.

use embedded_graphics::{prelude::*, primitives::Rectangle};
use heapless::Vec;

use crate::arena::{FieldArena, FieldId};
use crate::canvas::Canvas;
use crate::colour::Colour;
use crate::error::PanelError;
use crate::field::{EventCode, Field, Param, Value};
use crate::popup::{PopupId, PopupWindow, MAX_POPUPS};
use crate::press::ButtonPress;
use crate::style::PixelNumber;
use crate::window::{is_obscured, overlaps, Chain, Damage, Window};

/// Damaged areas remembered between refreshes before falling back to a
/// full repaint.
pub const MAX_DAMAGE: usize = 8;

/// The page shown on the display plus the popups that can cover it.
///
/// Owns every field. Tracks which areas need repainting between refreshes.
pub struct MainWindow {
    arena: FieldArena,
    base: Window,
    popups: Vec<PopupWindow, MAX_POPUPS>,
    active: Option<PopupId>,
    size: Size,
    damage: Vec<Damage, MAX_DAMAGE>,
    full_pending: bool,
    popup_pending: bool,
}

impl MainWindow {
    /// Empty main window covering a `width` x `height` display.
    ///
    /// The first refresh is always full.
    pub fn new(width: PixelNumber, height: PixelNumber, background: Colour) -> Self {
        Self {
            arena: FieldArena::new(),
            base: Window::new(background),
            popups: Vec::new(),
            active: None,
            size: Size::new(u32::from(width), u32::from(height)),
            damage: Vec::new(),
            full_pending: true,
            popup_pending: false,
        }
    }

    /// Every field, pages and popups alike.
    pub fn arena(&self) -> &FieldArena {
        &self.arena
    }

    /// Display size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Page background colour.
    pub fn background(&self) -> Colour {
        self.base.background()
    }

    /// The field behind `id`.
    pub fn field(&self, id: FieldId) -> Option<&Field> {
        self.arena.get(id)
    }

    /// Direct field access.
    ///
    /// Hiding a field through this bypasses damage tracking; use
    /// [`MainWindow::show`] for visibility changes.
    pub fn field_mut(&mut self, id: FieldId) -> Option<&mut Field> {
        self.arena.get_mut(id)
    }

    // ── Construction ─────────────────────────────────────────────────────────

    /// Store `field` and append it to the current chain.
    pub fn add_field(&mut self, field: Field) -> Result<FieldId, PanelError> {
        if self.base.is_full() {
            return Err(PanelError::ChainFull);
        }
        let id = self.arena.insert(field)?;
        self.base.add(id)?;
        Ok(id)
    }

    /// Register an empty popup. Its fields are added with
    /// [`MainWindow::add_popup_field`] in popup-relative coordinates.
    pub fn add_popup(
        &mut self,
        width: PixelNumber,
        height: PixelNumber,
        background: Colour,
        border: Colour,
    ) -> Result<PopupId, PanelError> {
        let id = u8::try_from(self.popups.len()).map_err(|_| PanelError::TooManyPopups)?;
        self.popups
            .push(PopupWindow::new(width, height, background, border))
            .map_err(|_| PanelError::TooManyPopups)?;
        Ok(PopupId(id))
    }

    /// Add a field to `popup`, in popup coordinates.
    pub fn add_popup_field(&mut self, popup: PopupId, field: Field) -> Result<FieldId, PanelError> {
        let window = self
            .popups
            .get_mut(popup.index())
            .ok_or(PanelError::UnknownPopup(popup.0))?
            .window_mut();
        if window.is_full() {
            return Err(PanelError::ChainFull);
        }
        let id = self.arena.insert(field)?;
        window.add(id)?;
        Ok(id)
    }

    /// The popup behind `popup`.
    pub fn popup(&self, popup: PopupId) -> Option<&PopupWindow> {
        self.popups.get(popup.index())
    }

    // ── Pages ────────────────────────────────────────────────────────────────

    /// The current page chain. Clone it to keep a handle to the page.
    pub fn root(&self) -> &Chain {
        self.base.root()
    }

    /// Switch to another page chain. The next refresh is full.
    pub fn set_root(&mut self, root: Chain) {
        tracing::debug!(fields = root.len(), "page switch");
        self.base.set_root(root);
        self.full_pending = true;
    }

    // ── Field state ──────────────────────────────────────────────────────────

    /// Show or hide a field.
    ///
    /// Hiding a field on screen records its area as damaged so the next
    /// refresh clears it.
    pub fn show(&mut self, id: FieldId, visible: bool) {
        let Some(field) = self.arena.get(id) else {
            return;
        };
        if field.is_visible() && !visible {
            let bounds = field.bounds();
            if self.base.contains(id) {
                let background = self.base.background();
                self.record_damage(bounds, background);
            } else if self
                .active_popup()
                .is_some_and(|p| p.window().contains(id))
            {
                self.popup_pending = true;
            }
        }
        if let Some(field) = self.arena.get_mut(id) {
            field.show(visible);
        }
    }

    /// Force a field to repaint on the next refresh.
    pub fn redraw(&mut self, id: FieldId) {
        if let Some(field) = self.arena.get_mut(id) {
            field.set_changed();
        }
    }

    /// Set or clear the pressed state of the button a press refers to.
    pub fn press(&mut self, press: ButtonPress, pressed: bool) {
        if let Some(field) = press.field().and_then(|id| self.arena.get_mut(id)) {
            field.press(pressed, press.index());
        }
    }

    /// Store a new value in a field. See [`Field::set_value`].
    pub fn set_value<'a>(&mut self, id: FieldId, value: impl Into<Value<'a>>) {
        if let Some(field) = self.arena.get_mut(id) {
            field.set_value(value);
        }
    }

    /// Replace the text of a text field or text button.
    pub fn set_text(&mut self, id: FieldId, text: &str) {
        self.set_value(id, Value::Text(text));
    }

    /// Replace the label of a text or numeric field.
    pub fn set_label(&mut self, id: FieldId, label: &'static str) {
        if let Some(field) = self.arena.get_mut(id) {
            field.set_label(label);
        }
    }

    /// Add `amount` to a numeric field or button.
    pub fn increment(&mut self, id: FieldId, amount: i32) {
        if let Some(field) = self.arena.get_mut(id) {
            field.increment(amount);
        }
    }

    /// Change a field's colours.
    pub fn set_colours(&mut self, id: FieldId, foreground: Colour, background: Colour) {
        if let Some(field) = self.arena.get_mut(id) {
            field.set_colours(foreground, background);
        }
    }

    /// Set a progress bar's fill level.
    pub fn set_percent(&mut self, id: FieldId, percent: u8) {
        if let Some(field) = self.arena.get_mut(id) {
            field.set_percent(percent);
        }
    }

    /// Change the event a button raises.
    pub fn set_event(&mut self, id: FieldId, event: EventCode, param: impl Into<Param>) {
        if let Some(field) = self.arena.get_mut(id) {
            field.set_event(event, param);
        }
    }

    // ── Popups ───────────────────────────────────────────────────────────────

    /// Show `popup` with its top-left corner at `origin`, replacing any
    /// popup already shown.
    pub fn set_popup(&mut self, popup: PopupId, origin: Point) -> Result<(), PanelError> {
        if popup.index() >= self.popups.len() {
            return Err(PanelError::UnknownPopup(popup.0));
        }
        if self.active.is_some() {
            self.clear_popup();
        }
        if let Some(p) = self.popups.get_mut(popup.index()) {
            p.set_origin(origin);
        }
        self.active = Some(popup);
        self.popup_pending = true;
        tracing::debug!(popup = popup.0, x = origin.x, y = origin.y, "popup shown");
        Ok(())
    }

    /// Remove the active popup. The area it covered is repainted on the
    /// next refresh.
    pub fn clear_popup(&mut self) {
        let Some(popup) = self.active.take() else {
            return;
        };
        if let Some(rect) = self.popups.get(popup.index()).map(PopupWindow::rect) {
            let background = self.base.background();
            self.record_damage(rect, background);
        }
        self.popup_pending = false;
        tracing::debug!(popup = popup.0, "popup cleared");
    }

    /// Handle of the popup being shown.
    pub fn active_popup_id(&self) -> Option<PopupId> {
        self.active
    }

    /// The popup being shown.
    pub fn active_popup(&self) -> Option<&PopupWindow> {
        self.active.and_then(|id| self.popups.get(id.index()))
    }

    fn active_rect(&self) -> Option<Rectangle> {
        self.active_popup().map(PopupWindow::rect)
    }

    /// Whether a popup is active and `point` lies within it.
    pub fn popup_contains(&self, point: Point) -> bool {
        self.active_popup().is_some_and(|p| p.contains(point))
    }

    /// Whether a popup is active and overlaps `id`'s bounding box.
    pub fn obscured_by_popup(&self, id: FieldId) -> bool {
        self.arena
            .get(id)
            .is_some_and(|field| is_obscured(field, self.active_rect()))
    }

    /// Visible flag set and not under the active popup.
    pub fn visible(&self, id: FieldId) -> bool {
        self.arena
            .get(id)
            .is_some_and(|field| field.is_visible() && !is_obscured(field, self.active_rect()))
    }

    // ── Hit testing ──────────────────────────────────────────────────────────

    /// Button under a touch at `(x, y)`.
    ///
    /// Inside the active popup, the popup's own fields are searched in
    /// popup coordinates. Elsewhere the first visible, unobscured button
    /// of the current page wins.
    pub fn find_event(&self, x: i32, y: i32) -> ButtonPress {
        let point = Point::new(x, y);
        if let Some(popup) = self.active_popup() {
            if popup.contains(point) {
                let origin = popup.origin();
                let local = Point::new(x.saturating_sub(origin.x), y.saturating_sub(origin.y));
                return popup.window().find(&self.arena, local, None);
            }
        }
        self.base.find(&self.arena, point, self.active_rect())
    }

    /// Base page button under a touch outside the active popup.
    ///
    /// Obscuration is ignored, so a tap just outside a popup reaches a
    /// button partly covered by it. Touches inside the popup miss.
    pub fn find_event_outside_popup(&self, x: i32, y: i32) -> ButtonPress {
        let point = Point::new(x, y);
        if self.popup_contains(point) {
            return ButtonPress::NONE;
        }
        self.base.find(&self.arena, point, None)
    }

    // ── Rendering ────────────────────────────────────────────────────────────

    /// Repaint stale fields, then the active popup over them.
    pub fn refresh<C: Canvas>(&mut self, canvas: &mut C, full: bool) -> Result<(), C::Error> {
        let full = full || self.full_pending;
        let popup_rect = self.active_rect();
        let mut popup_full = full || self.popup_pending;

        if full {
            canvas.fill_rect(Rectangle::new(Point::zero(), self.size), self.base.background())?;
        } else {
            for damage in &self.damage {
                canvas.fill_rect(damage.rect, damage.colour)?;
                if popup_rect.is_some_and(|p| overlaps(p, damage.rect)) {
                    popup_full = true;
                }
            }
        }

        let damage: &[Damage] = if full { &[] } else { &self.damage };
        let mut drawn = self
            .base
            .refresh(&mut self.arena, canvas, full, Point::zero(), popup_rect, damage)?;

        if let Some(popup) = self.active.and_then(|id| self.popups.get(id.index())) {
            drawn = drawn.saturating_add(popup.refresh(&mut self.arena, canvas, popup_full)?);
        }

        tracing::trace!(full, popup_full, drawn, damaged = self.damage.len(), "refresh");
        self.damage.clear();
        self.full_pending = false;
        self.popup_pending = false;
        Ok(())
    }

    fn record_damage(&mut self, rect: Rectangle, colour: Colour) {
        if self.full_pending {
            return;
        }
        if self.damage.push(Damage { rect, colour }).is_err() {
            self.damage.clear();
            self.full_pending = true;
        }
    }
}
