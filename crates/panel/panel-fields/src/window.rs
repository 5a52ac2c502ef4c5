//! Field chains with hit testing and redraw
//!
//! A [`Window`] does not own fields. It holds an ordered [`Chain`] of
//! [`FieldId`]s into the main window's arena. Order matters twice: hit
//! testing returns the first match, and later fields paint over earlier
//! ones.
//!
//! Pages are chains too. A chain can be cloned, extended and swapped back
//! in, so every page can share a common prefix (tab bar, status line)
//! without the common fields being stored more than once.

use embedded_graphics::{
    prelude::*,
    primitives::{ContainsPoint, Rectangle},
};
use heapless::Vec;

use crate::arena::{FieldArena, FieldId};
use crate::canvas::Canvas;
use crate::colour::Colour;
use crate::error::PanelError;
use crate::field::Field;
use crate::press::ButtonPress;
use crate::style::PixelNumber;

/// Maximum number of fields in one chain.
pub const MAX_CHAIN: usize = 128;

/// Ordered field handles making up a window's content or a page.
pub type Chain = Vec<FieldId, MAX_CHAIN>;

/// Screen area that must be repainted in `colour` on the next refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Damage {
    /// Screen area.
    pub rect: Rectangle,
    /// Fill colour.
    pub colour: Colour,
}

/// An ordered chain of fields on a background colour.
pub struct Window {
    root: Chain,
    background: Colour,
}

impl Window {
    /// Empty window on `background`.
    pub const fn new(background: Colour) -> Self {
        Self {
            root: Vec::new(),
            background,
        }
    }

    /// Background colour.
    pub fn background(&self) -> Colour {
        self.background
    }

    /// The current chain.
    pub fn root(&self) -> &Chain {
        &self.root
    }

    /// Swap in another chain.
    pub fn set_root(&mut self, root: Chain) {
        self.root = root;
    }

    /// Append a field handle. No duplicate detection.
    pub fn add(&mut self, id: FieldId) -> Result<(), PanelError> {
        self.root.push(id).map_err(|_| PanelError::ChainFull)
    }

    /// Whether the chain has no room left.
    pub fn is_full(&self) -> bool {
        self.root.is_full()
    }

    /// Whether `id` is in the chain.
    pub fn contains(&self, id: FieldId) -> bool {
        self.root.contains(&id)
    }

    /// First visible button in chain order whose box contains `point`.
    ///
    /// Fields overlapping `obscurer` are skipped. For a button row the
    /// sub-index comes from the horizontal offset into the row.
    pub fn find(&self, arena: &FieldArena, point: Point, obscurer: Option<Rectangle>) -> ButtonPress {
        for &id in &self.root {
            let Some(field) = arena.get(id) else { continue };
            let Some(source) = field.event_source() else {
                continue;
            };
            if !field.is_visible() || is_obscured(field, obscurer) || !field.bounds().contains(point) {
                continue;
            }
            let dx = PixelNumber::try_from(point.x.saturating_sub(i32::from(field.x()))).unwrap_or(0);
            return ButtonPress::new(id, source.hit_index(dx));
        }
        ButtonPress::NONE
    }

    /// Repaint eligible fields at `offset`, returning how many were drawn.
    ///
    /// A field is eligible when visible and not under `obscurer`. It is
    /// drawn when `full` is set, when it is changed, or when it overlaps a
    /// damaged area (in which case it is drawn in full).
    pub(crate) fn refresh<C: Canvas>(
        &self,
        arena: &mut FieldArena,
        canvas: &mut C,
        full: bool,
        offset: Point,
        obscurer: Option<Rectangle>,
        damage: &[Damage],
    ) -> Result<usize, C::Error> {
        let mut drawn: usize = 0;
        for &id in &self.root {
            let Some(field) = arena.get_mut(id) else { continue };
            if !field.is_visible() || is_obscured(field, obscurer) {
                continue;
            }
            let bounds = field.bounds_at(offset);
            let damaged = damage.iter().any(|d| overlaps(d.rect, bounds));
            if full || damaged || field.is_changed() {
                field.refresh(canvas, full || damaged, offset)?;
                drawn = drawn.saturating_add(1);
            }
        }
        Ok(drawn)
    }
}

/// Whether `field` intersects the obscuring rectangle, if there is one.
pub(crate) fn is_obscured(field: &Field, obscurer: Option<Rectangle>) -> bool {
    obscurer.is_some_and(|r| overlaps(r, field.bounds()))
}

/// Whether two rectangles share at least one pixel.
pub fn overlaps(a: Rectangle, b: Rectangle) -> bool {
    let (Some(a_end), Some(b_end)) = (a.bottom_right(), b.bottom_right()) else {
        return false;
    };
    a.top_left.x <= b_end.x && b.top_left.x <= a_end.x && a.top_left.y <= b_end.y && b.top_left.y <= a_end.y
}

#[cfg(test)]
#[allow(clippy::indexing_slicing, clippy::arithmetic_side_effects)] // Tests index known-length fixtures
mod tests {
    use super::*;
    use crate::colour;
    use crate::field::EventCode;
    use crate::style::{Style, TextAlignment};
    use crate::test_support::RecordingCanvas;

    fn rect(x: i32, y: i32, w: u32, h: u32) -> Rectangle {
        Rectangle::new(Point::new(x, y), Size::new(w, h))
    }

    fn window_with(arena: &mut FieldArena, fields: impl IntoIterator<Item = Field>) -> (Window, std::vec::Vec<FieldId>) {
        let mut w = Window::new(colour::BLACK);
        let mut ids = std::vec::Vec::new();
        for f in fields {
            let id = arena.insert(f).unwrap();
            w.add(id).unwrap();
            ids.push(id);
        }
        (w, ids)
    }

    fn button(x: PixelNumber, code: u8) -> Field {
        Field::text_button(&Style::DEFAULT, x, 10, 50, "b", EventCode(code), 0)
    }

    #[test]
    fn test_overlaps() {
        assert!(overlaps(rect(0, 0, 10, 10), rect(9, 9, 5, 5)));
        assert!(!overlaps(rect(0, 0, 10, 10), rect(10, 0, 5, 5)));
        assert!(!overlaps(rect(0, 0, 0, 10), rect(0, 0, 5, 5)));
    }

    #[test]
    fn test_find_first_match_wins() {
        let mut arena = FieldArena::new();
        let (w, ids) = window_with(&mut arena, [button(0, 1), button(20, 2)]);
        let hit = w.find(&arena, Point::new(30, 15), None);
        assert_eq!(hit.field(), Some(ids[0]));
        assert_eq!(hit.event(&arena), EventCode(1));
    }

    #[test]
    fn test_find_skips_passive_and_hidden() {
        let mut arena = FieldArena::new();
        let label = Field::static_text(&Style::DEFAULT, 0, 10, 100, TextAlignment::Left, "x");
        let (w, ids) = window_with(&mut arena, [label, button(0, 1), button(0, 2)]);
        arena.get_mut(ids[1]).unwrap().show(false);
        let hit = w.find(&arena, Point::new(5, 15), None);
        assert_eq!(hit.field(), Some(ids[2]));
    }

    #[test]
    fn test_find_skips_obscured() {
        let mut arena = FieldArena::new();
        let (w, _) = window_with(&mut arena, [button(0, 1)]);
        let hit = w.find(&arena, Point::new(5, 15), Some(rect(40, 0, 100, 100)));
        assert!(!hit.is_valid());
    }

    #[test]
    fn test_find_miss_is_invalid() {
        let mut arena = FieldArena::new();
        let (w, _) = window_with(&mut arena, [button(0, 1)]);
        assert_eq!(w.find(&arena, Point::new(200, 200), None), ButtonPress::NONE);
    }

    #[test]
    fn test_refresh_partial_draws_only_changed() {
        let mut arena = FieldArena::new();
        let (w, ids) = window_with(&mut arena, [button(0, 1), button(60, 2)]);
        let mut canvas = RecordingCanvas::default();
        assert_eq!(w.refresh(&mut arena, &mut canvas, false, Point::zero(), None, &[]).unwrap(), 2);
        assert_eq!(w.refresh(&mut arena, &mut canvas, false, Point::zero(), None, &[]).unwrap(), 0);
        arena.get_mut(ids[1]).unwrap().set_changed();
        assert_eq!(w.refresh(&mut arena, &mut canvas, false, Point::zero(), None, &[]).unwrap(), 1);
        assert_eq!(w.refresh(&mut arena, &mut canvas, true, Point::zero(), None, &[]).unwrap(), 2);
    }

    #[test]
    fn test_refresh_redraws_damaged() {
        let mut arena = FieldArena::new();
        let (w, _) = window_with(&mut arena, [button(0, 1), button(60, 2)]);
        let mut canvas = RecordingCanvas::default();
        w.refresh(&mut arena, &mut canvas, true, Point::zero(), None, &[]).unwrap();
        let damage = [Damage {
            rect: rect(70, 12, 5, 5),
            colour: colour::BLACK,
        }];
        let drawn = w.refresh(&mut arena, &mut canvas, false, Point::zero(), None, &damage).unwrap();
        assert_eq!(drawn, 1);
    }

    #[test]
    fn test_obscured_field_keeps_changed() {
        let mut arena = FieldArena::new();
        let (w, ids) = window_with(&mut arena, [button(0, 1)]);
        let mut canvas = RecordingCanvas::default();
        let drawn = w
            .refresh(&mut arena, &mut canvas, true, Point::zero(), Some(rect(0, 5, 10, 10)), &[])
            .unwrap();
        assert_eq!(drawn, 0);
        assert!(arena.get(ids[0]).unwrap().is_changed());
    }

    #[test]
    fn test_cloned_chain_extends_without_touching_original() {
        let mut arena = FieldArena::new();
        let (mut w, _) = window_with(&mut arena, [button(0, 1)]);
        let common = w.root().clone();
        let extra = arena.insert(button(100, 2)).unwrap();
        w.add(extra).unwrap();
        let page = w.root().clone();
        assert_eq!(common.len(), 1);
        assert_eq!(page.len(), 2);
        w.set_root(common);
        assert!(!w.contains(extra));
    }
}
